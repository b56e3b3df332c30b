//! Waymate API server binary.

use std::net::SocketAddr;

use api_server::{config::Config, create_app, create_state, init_tracing};
use data_store::MongoStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(database = %config.database_name, "Starting Waymate API server");

    let store = MongoStore::connect(&config.mongodb_uri, &config.database_name).await?;

    let state = create_state(config.clone(), store);
    let app = create_app(state);

    let addr: SocketAddr = config.server_addr().parse()?;

    tracing::info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
