//! List the assets held in one source

use std::io::Write;

use anyhow::Context;
use balance_core::{total_value, AssetSource};
use tracing::info;

/// Fetch every asset of `source` and write them as a JSON array
pub async fn run<W: Write>(source: &dyn AssetSource, out: &mut W) -> anyhow::Result<()> {
    let name = source.source();
    let assets = source
        .fetch_assets()
        .await
        .with_context(|| format!("Failed to fetch {} assets", name))?;

    info!("{} total: {} JPY", name, total_value(&assets));

    serde_json::to_writer_pretty(&mut *out, &assets)?;
    writeln!(out)?;
    Ok(())
}
