mod cli;
mod commands;
mod constants;
mod error;
mod models;
mod server;
mod services;
mod utils;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(e) = cli::run().await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}
