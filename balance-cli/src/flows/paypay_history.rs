//! Print recent PayPay balance history

use std::io::Write;

use anyhow::Context;
use balance_paypay::PayPayApi;

pub async fn run<A, W>(api: &mut A, refresh_token: &str, size: u32, out: &mut W) -> anyhow::Result<()>
where
    A: PayPayApi + ?Sized,
    W: Write,
{
    api.refresh_token(refresh_token)
        .await
        .context("Failed to refresh PayPay token")?;

    let history = api
        .get_history(size)
        .await
        .context("Failed to get balance history")?;

    serde_json::to_writer_pretty(&mut *out, &history)?;
    writeln!(out)?;
    Ok(())
}
