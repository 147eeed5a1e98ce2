//! Print the PayPay wallet balances

use std::io::Write;

use anyhow::Context;
use balance_paypay::{investment_valuation, PayPayApi};
use tracing::debug;

/// Refresh the token, then print total, usable, money light, money and point,
/// one value per line. With `investment`, the investment valuation follows as
/// a sixth line.
pub async fn run<A, W>(
    api: &mut A,
    refresh_token: &str,
    investment: bool,
    out: &mut W,
) -> anyhow::Result<()>
where
    A: PayPayApi + ?Sized,
    W: Write,
{
    api.refresh_token(refresh_token)
        .await
        .context("Failed to refresh PayPay token")?;

    let snapshot = api.get_balance().await.context("Failed to get balance")?;
    debug!(?snapshot, "PayPay balance");

    for value in snapshot.lines() {
        writeln!(out, "{}", value)?;
    }

    if investment {
        let history = api
            .get_point_history()
            .await
            .context("Failed to get point history")?;
        writeln!(out, "{}", investment_valuation(&history)?)?;
    }

    out.flush()?;
    Ok(())
}
