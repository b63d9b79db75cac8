// src/cache.rs
use std::sync::Arc;

use chrono::{Duration as ChronoDuration, NaiveTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Snapshot of the three entity counts shown on the dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityCounts {
    pub category_count: i64,
    pub product_count: i64,
    pub customer_count: i64,
}

/// Owned, cloneable handle to the dashboard count cache.
///
/// Refresh replaces the whole snapshot in one write, so readers never see
/// a half-updated set of counts. Refreshed at startup, daily at 00:05 UTC,
/// and after mutating catalog/billing operations.
#[derive(Clone)]
pub struct DashboardCache {
    inner: Arc<RwLock<EntityCounts>>,
}

impl DashboardCache {
    pub fn new() -> Self {
        DashboardCache {
            inner: Arc::new(RwLock::new(EntityCounts::default())),
        }
    }

    pub async fn snapshot(&self) -> EntityCounts {
        self.inner.read().await.clone()
    }

    /// Re-counts all three collections and swaps the snapshot in.
    /// Failures are logged and leave the previous snapshot in place.
    pub async fn refresh(&self, pool: &SqlitePool) {
        match Self::count_all(pool).await {
            Ok(counts) => {
                *self.inner.write().await = counts;
            }
            Err(e) => {
                error!(?e, "Failed to refresh dashboard counts");
            }
        }
    }

    async fn count_all(pool: &SqlitePool) -> Result<EntityCounts, sqlx::Error> {
        let (category_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(pool)
            .await?;
        let (product_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(pool)
            .await?;
        let (customer_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(pool)
            .await?;

        Ok(EntityCounts {
            category_count,
            product_count,
            customer_count,
        })
    }
}

impl Default for DashboardCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the daily refresh task (00:05 UTC, matching the legacy cron slot).
pub fn spawn_daily_refresh(cache: DashboardCache, pool: SqlitePool) {
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let target_time = NaiveTime::from_hms_opt(0, 5, 0).unwrap_or(NaiveTime::MIN);
            let today_target = now.date_naive().and_time(target_time).and_utc();
            let next_run = if today_target > now {
                today_target
            } else {
                today_target + ChronoDuration::days(1)
            };
            let wait = (next_run - now)
                .to_std()
                .unwrap_or(std::time::Duration::from_secs(60));

            tokio::time::sleep(wait).await;
            cache.refresh(&pool).await;
            info!("Dashboard counts refreshed on schedule");
        }
    });
}
