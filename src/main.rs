// src/main.rs
mod routes;
mod handlers;
mod models;
mod database;
mod state;
mod dtos;
mod error;
mod clock;
mod config;
mod services;
mod sheets;
mod storage;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing_subscriber::fmt::init as tracing_init;
use tokio::net::TcpListener;
use dotenvy::dotenv;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::sheets::http::{build_client, HttpSheetStore};
use crate::storage::{memory::MemoryKeyValueStore, KeyValueStore};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_init();

    // Load environment variables
    dotenv().ok();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{}", e);
            return;
        }
    };

    // Local state: Postgres when configured, otherwise process memory
    let kv: Arc<dyn KeyValueStore> = match &config.database_url {
        Some(url) => match database::create_pool(url).await {
            Ok(pool) => Arc::new(database::PgKeyValueStore::new(pool)),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create database pool");
                return;
            }
        },
        None => {
            tracing::warn!("DATABASE_URL not set, quota counters and caches are kept in memory");
            Arc::new(MemoryKeyValueStore::new())
        }
    };

    let client = match build_client(config.store_timeout) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build store client");
            return;
        }
    };

    // Create application state
    let app_state = state::AppState::new(
        Arc::new(HttpSheetStore::new(client.clone(), &config.trip_store_url)),
        Arc::new(HttpSheetStore::new(client, &config.cash_store_url)),
        &config.cash_sheet,
        kv,
        Arc::new(SystemClock),
        config.limits,
    );

    let app = routes::build_app(app_state);

    // Start server with HOST/PORT env and graceful port selection
    let host: IpAddr = config.host.parse().unwrap_or(IpAddr::from([127, 0, 0, 1]));
    let base_port = config.port;

    // Try base_port..base_port+20 to avoid crash when address is in use
    let listener = {
        let mut bound = None;
        for offset in 0u16..=20 {
            let port = base_port.saturating_add(offset);
            let addr = SocketAddr::from((host, port));
            match TcpListener::bind(addr).await {
                Ok(l) => { bound = Some((l, addr)); break; }
                Err(e) => {
                    if offset == 0 { tracing::warn!(%addr, error=%e, "Port in use, trying next"); }
                }
            }
        }
        match bound {
            Some((l, addr)) => {
                tracing::info!("Server running on {}", addr);
                l
            }
            None => {
                tracing::error!("Failed to bind to any port starting at {} on {}", base_port, host);
                return;
            }
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error=%e, "Server error");
    }
}
