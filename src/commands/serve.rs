use crate::error::Result;
use crate::server;
use crate::services::Database;
use crate::utils::{database_path, server_port};

/// Start the HTTP API server.
pub async fn run(port: Option<u16>) -> Result<()> {
    let port = match port {
        Some(port) => port,
        None => server_port()?,
    };

    println!("🚀 Starting tradetape server on port {}", port);

    let db = Database::connect(&database_path()).await?;
    server::serve(db, port).await
}
