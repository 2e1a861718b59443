use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;
use crate::error::Result;

#[derive(Parser)]
#[command(name = "tradetape")]
#[command(version, about = "Trade tape ingestion and aggregation service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest a delimited trade-tape file into the store
    Ingest {
        /// Path to the CSV file to ingest
        file: PathBuf,

        /// Field delimiter
        #[arg(short, long, default_value_t = ',')]
        delimiter: char,

        /// Treat the first row as data instead of a header
        #[arg(long)]
        no_header: bool,
    },
    /// Start the HTTP API server
    Serve {
        /// Port to listen on (default: $PORT, then 8080)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show what the store currently holds
    Status,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            file,
            delimiter,
            no_header,
        } => commands::ingest::run(file, delimiter, !no_header).await,
        Commands::Serve { port } => commands::serve::run(port).await,
        Commands::Status => commands::status::run().await,
    }
}
