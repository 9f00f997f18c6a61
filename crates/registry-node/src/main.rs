//! # Registry Node
//!
//! Loads configuration, applies genesis, then replays the JSON batch file
//! named by the first argument.

use anyhow::{Context, Result};
use registry_node::{init_tracing, load_batch, replay, GenesisConfig, Ledger, NodeConfig};
use tracing::info;

fn main() -> Result<()> {
    let config = NodeConfig::from_env().context("Failed to read configuration")?;
    init_tracing(&config)?;
    config.validate()?;

    let ledger = Ledger::from_config(&config).context("Failed to create ledger")?;
    if let Some(path) = &config.genesis_file {
        let genesis = GenesisConfig::load(path)
            .with_context(|| format!("Failed to load genesis from {}", path.display()))?;
        ledger.apply_genesis(&genesis)?;
    }

    let Some(batch_path) = std::env::args().nth(1) else {
        info!("No batch file given, nothing to replay");
        return Ok(());
    };
    let entries =
        load_batch(&batch_path).with_context(|| format!("Failed to load batch {}", batch_path))?;
    info!(entries = entries.len(), path = %batch_path, "replaying batch");

    let summary = replay(&ledger, entries);
    info!(
        committed = summary.committed,
        rejected = summary.rejected,
        epoch = summary.final_epoch,
        height = ledger.height(),
        "batch replayed"
    );
    Ok(())
}
