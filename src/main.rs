//! Fieldops - dispatch field agents to client visits and track them to completion

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldops=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Fieldops v{}", env!("CARGO_PKG_VERSION"));

    // Run CLI
    fieldops::cli::run()?;

    Ok(())
}
