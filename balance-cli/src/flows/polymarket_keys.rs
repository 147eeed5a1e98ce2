//! Create or derive Polymarket CLOB API credentials

use std::io::Write;

use anyhow::Context;
use balance_core::write_exports;
use balance_polymarket::{ApiCredentials, ApiKeyProvider};
use tracing::info;

/// Obtain credentials and write the three export lines
///
/// Provider errors are returned, never swallowed.
pub async fn run<P, W>(provider: &mut P, out: &mut W) -> anyhow::Result<ApiCredentials>
where
    P: ApiKeyProvider + ?Sized,
    W: Write,
{
    let credentials = provider
        .create_or_derive_api_credentials()
        .await
        .context("Failed to get Polymarket API credentials")?;
    info!("Polymarket API credentials ready");

    write_exports(out, &credentials)?;
    out.flush()?;
    Ok(credentials)
}
