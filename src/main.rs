#![allow(clippy::result_large_err)]

use clap::Parser;
use dotenvy::dotenv;
use inventario::{cli, config::store::load_settings, errors::Result, store};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // 1. Initialize tracing (as early as possible); pages go to stdout, logs to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file, non-fatal: variables can be set externally
    dotenv().ok();
    debug!("Attempted to load .env file.");

    let args = cli::Cli::parse();

    // 3. Load settings (file, then environment overrides)
    let settings = load_settings(&args.config)
        .inspect_err(|e| error!("Failed to load settings: {e}"))?;
    debug!("Using settings: {settings:?}");

    // 4. Connect the store selected by the settings
    let gateway = store::connect(&settings)
        .await
        .inspect(|_| info!("Connected to the {:?} store.", settings.backend))
        .inspect_err(|e| error!("Failed to connect to the store: {e}"))?;

    // 5. Run the command
    match cli::run(args.command, gateway.as_ref()).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!("Command failed: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
