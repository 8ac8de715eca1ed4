//! Payroll engine server.
//!
//! Reads `PAYROLL_CONFIG_DIR` (default `./config/ke`) and `PAYROLL_BIND_ADDR`
//! (default `0.0.0.0:3000`) from the environment.

use std::net::SocketAddr;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("payroll_engine=info".parse()?),
        )
        .init();

    let config_dir =
        std::env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| "./config/ke".to_string());
    let addr: SocketAddr = std::env::var("PAYROLL_BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        jurisdiction = %config.jurisdiction().code,
        rows = config.rows().len(),
        "Loaded statutory rates"
    );

    let app = create_router(AppState::new(config));

    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
