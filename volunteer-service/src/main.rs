use log::{error, info};
use std::net::SocketAddr;

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod routes;
mod upload;

#[cfg(test)]
mod tests;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Volunteer Network Service");

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    // The listener starts whether or not the database connection came up
    let app = routes::create_router(&config).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Volunteer network server is running on port: {}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}
