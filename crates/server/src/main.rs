mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod utils;

use config::Config;
use database::db::create_connection;
use log::info;
use routes::{AppState, router};
use std::sync::Arc;
use utils::{clock::SystemClock, shutdown::shutdown_signal};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().expect("Failed to load configuration");

    let db = create_connection(&config.database_url, config.database_max_connections)
        .await
        .expect("Failed to connect to database");

    let state = AppState {
        db,
        clock: Arc::new(SystemClock::new(config.utc_offset)),
        strict_query_params: config.strict_query_params,
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listener");
    info!("Running axum on http://{}", config.bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server stopped");
}
