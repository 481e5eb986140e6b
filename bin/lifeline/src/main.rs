//! Entrypoint.

use driver::Driver;

use clap::Parser;
use config::Opts;
use dotenvy::dotenv;
use tokio::sync::broadcast;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        dotenvy::from_filename(custom_env_file)?;
    } else {
        // Try the default .env file, and ignore if it doesn't exist.
        dotenv().ok();
    }

    let opts = Opts::parse();
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
    info!("📡 Lifeline vault monitor starting...");

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl-C, shutting down after the current cycle");
                let _ = shutdown_tx.send(());
            }
            Err(err) => warn!(error = %err, "Failed to install Ctrl-C handler"),
        }
    });

    Driver::new(opts).await?.start_with_shutdown(Some(shutdown_rx)).await
}
