// src/main.rs
use std::net::SocketAddr;

use axum::{routing::get, Router};
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing_subscriber::fmt::init as tracing_init;

use firstchoice_backend::{cache, config::Config, database, routes, state::AppState};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_init();

    // Load environment variables
    dotenv().ok();
    let config = Config::from_env();

    // Create database pool and schema
    let db_pool = database::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    database::init_schema(&db_pool)
        .await
        .expect("Failed to initialize schema");

    // Create application state and prime the dashboard cache
    let app_state = AppState::new(db_pool.clone(), config.clone());
    app_state.dashboard_cache.refresh(&db_pool).await;
    cache::spawn_daily_refresh(app_state.dashboard_cache.clone(), db_pool);

    let app = Router::new()
        .route("/", get(|| async { "FirstChoice API" }))
        .route("/health", get(health_check))
        .merge(routes::create_router())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Try base_port..base_port+20 to avoid crash when address is in use
    let listener = {
        let mut bound = None;
        for offset in 0u16..=20 {
            let port = config.port.saturating_add(offset);
            let addr = SocketAddr::from((config.host, port));
            match TcpListener::bind(addr).await {
                Ok(l) => {
                    bound = Some((l, addr));
                    break;
                }
                Err(e) => {
                    if offset == 0 {
                        tracing::warn!(%addr, error=%e, "Port in use, trying next");
                    }
                }
            }
        }
        match bound {
            Some((l, addr)) => {
                tracing::info!("Server running on {}", addr);
                l
            }
            None => {
                tracing::error!(
                    "Failed to bind to any port starting at {} on {}",
                    config.port,
                    config.host
                );
                return;
            }
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error=%e, "Server error");
    }
}

async fn health_check() -> &'static str {
    "OK"
}
