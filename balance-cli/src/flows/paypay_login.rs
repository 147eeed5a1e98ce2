//! Exchange a one-time login link for PayPay tokens

use std::io::{BufRead, Write};

use anyhow::Context;
use balance_core::write_exports;
use balance_paypay::{parse_login_id, PayPayApi, PayPayCredentials};
use tracing::info;

pub const PROMPT: &str = "Received ID: ";

/// Prompt for the login id, log in, and write the four export lines
///
/// The caller has already started the login, so the provider has sent the
/// one-time link. `prompt` is stderr in the binary.
pub async fn run<A, R, P, W>(
    api: &mut A,
    input: &mut R,
    prompt: &mut P,
    out: &mut W,
) -> anyhow::Result<PayPayCredentials>
where
    A: PayPayApi + ?Sized,
    R: BufRead,
    P: Write,
    W: Write,
{
    write!(prompt, "{}", PROMPT)?;
    prompt.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read login id")?;
    let login_id = parse_login_id(&line)?;

    let credentials = api.login(&login_id).await.context("PayPay login failed")?;
    info!("PayPay login succeeded");

    write_exports(out, &credentials)?;
    out.flush()?;
    Ok(credentials)
}
