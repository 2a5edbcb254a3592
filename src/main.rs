use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use series_tracker::config::AppConfig;
use series_tracker::tui;

#[tokio::main]
async fn main() -> Result<()> {
    // The TUI owns the terminal, so log output stays on stderr and is
    // off unless RUST_LOG asks for it.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    tui::run_tui(config).await
}
