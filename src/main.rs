//! Payroll Engine HTTP server.

use std::env;

use payroll_engine::api::{create_router, AppState};
use payroll_engine::config::ConfigLoader;
use tracing::info;

const DEFAULT_CONFIG_PATH: &str = "./config/payroll.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let config_path =
        env::var("PAYROLL_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = ConfigLoader::load(&config_path)?.into_config();
    let bind_address = config.server.bind_address.clone();

    let app = create_router(AppState::in_memory(config));
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(%bind_address, config = %config_path, "Payroll engine listening");

    axum::serve(listener, app).await?;
    Ok(())
}
