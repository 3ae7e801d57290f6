use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::models::SeasonConfig;

#[derive(Debug, Clone)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.cached_at
    }

    pub fn is_stale(&self, ttl: Duration) -> bool {
        match chrono::Duration::from_std(ttl) {
            // Negative ages (clock skew) count as fresh
            Ok(ttl) => self.age() > ttl,
            Err(_) => false,
        }
    }
}

/// In-memory copy of the current season configuration.
///
/// Every request reads the current season; this keeps that to one query
/// per TTL window. Mutations that change the season call `invalidate`.
pub struct SeasonCache {
    ttl: Duration,
    slot: RwLock<Option<CachedData<Option<SeasonConfig>>>>,
}

impl SeasonCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Current season, served from memory while fresh.
    pub async fn current(&self, pool: &SqlitePool) -> Result<Option<SeasonConfig>> {
        {
            let slot = self.slot.read().await;
            if let Some(cached) = slot.as_ref() {
                if !cached.is_stale(self.ttl) {
                    return Ok(cached.data.clone());
                }
            }
        }

        let season = load_current_season(pool).await?;
        debug!(
            season_id = season.as_ref().map(|s| s.id),
            "Loaded current season config"
        );
        *self.slot.write().await = Some(CachedData::new(season.clone()));
        Ok(season)
    }

    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }
}

/// Read the configured current season straight from the database.
pub async fn load_current_season(pool: &SqlitePool) -> Result<Option<SeasonConfig>> {
    let season = sqlx::query_as::<_, SeasonConfig>(
        "SELECT s.id, s.code, s.name, s.year, s.phase, s.max_players,
                s.week1_date, s.week2_date, s.week3_date, s.draft_date,
                s.session_times, s.courts, s.team_male_quota, s.team_non_male_quota
         FROM app_config c
         JOIN seasons s ON s.id = c.current_season_id
         WHERE c.id = 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(season)
}

// ============================================================================
// Tests
// ============================================================================
