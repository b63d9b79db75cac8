// src/state.rs
use sqlx::SqlitePool;

use crate::cache::DashboardCache;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub dashboard_cache: DashboardCache,
    pub config: Config,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: Config) -> Self {
        AppState {
            db_pool,
            dashboard_cache: DashboardCache::new(),
            config,
        }
    }
}
