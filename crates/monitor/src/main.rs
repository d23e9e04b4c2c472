//! Driver Stress Monitor - Main Entry Point
//!
//! Usage: `stress-monitor [CONFIG_FILE]`

use anyhow::Context;
use monitor::{init_logging, run, MonitorConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1);
    let config = MonitorConfig::load(path.as_deref()).context("loading configuration")?;

    init_logging(&config.log_level)?;

    info!("=== Driver Stress Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let summary = run(config).await.context("monitor failed")?;
    info!(
        frames = summary.frames,
        rejected = summary.frames_rejected,
        "Session complete"
    );

    Ok(())
}
