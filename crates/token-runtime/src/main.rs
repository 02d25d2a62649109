//! Stable Token runtime entry point.

use anyhow::{Context, Result};
use token_runtime::{init_logging, walkthrough, TokenConfig};
use tracing::{info, warn};

fn main() -> Result<()> {
    let config = TokenConfig::from_env().context("Failed to load token configuration")?;
    init_logging(&config).context("Failed to initialize logging")?;

    info!(
        "Starting {} ({}) runtime, deployer {}",
        config.name, config.symbol, config.deployer
    );

    let report = walkthrough::run(&config).context("Walkthrough failed")?;
    for step in report.failures() {
        warn!("Refused: {} ({})", step.step, step.detail.join(", "));
    }

    let rendered =
        serde_json::to_string_pretty(&report).context("Failed to render walkthrough report")?;
    println!("{rendered}");

    info!(
        "Final supply {} across {} implementation(s)",
        report.total_supply,
        report.implementations.len()
    );
    Ok(())
}
