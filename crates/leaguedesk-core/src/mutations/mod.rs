//! Validated, transactional writes.
//!
//! Every handler follows the same order: access guard, validation (reads
//! only), one transaction for all writes, then an audit event. A rejected
//! batch leaves the database untouched.

mod draft;
mod players;
mod roster;
mod season;
mod signup;
mod staff;
mod waitlist;

use std::collections::BTreeSet;
use std::fmt::Display;

use sqlx::SqlitePool;

use crate::error::{LeagueError, Result};

pub use roster::MAX_TEAM_NUMBER;

/// Reject a batch naming the same id twice.
pub(crate) fn ensure_unique<T>(ids: impl IntoIterator<Item = T>, what: &str) -> Result<()>
where
    T: Ord + Display,
{
    let mut seen = BTreeSet::new();
    for id in ids {
        if seen.contains(&id) {
            return Err(LeagueError::validation(format!("duplicate {} {}", what, id)));
        }
        seen.insert(id);
    }
    Ok(())
}

/// Users with a signup for the season.
pub(crate) async fn signed_up_users(pool: &SqlitePool, season_id: i64) -> Result<BTreeSet<i64>> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT user_id FROM signups WHERE season_id = ?")
        .bind(season_id)
        .fetch_all(pool)
        .await?;
    Ok(ids.into_iter().collect())
}

pub(crate) async fn ensure_signed_up(pool: &SqlitePool, season_id: i64, user_ids: &[i64]) -> Result<()> {
    let signed_up = signed_up_users(pool, season_id).await?;
    match user_ids.iter().find(|id| !signed_up.contains(id)) {
        Some(id) => Err(LeagueError::validation(format!(
            "user {} has not signed up for this season",
            id
        ))),
        None => Ok(()),
    }
}

/// Reject ids with no user record.
pub(crate) async fn ensure_users_exist(pool: &SqlitePool, user_ids: &[i64]) -> Result<()> {
    let known: BTreeSet<i64> = sqlx::query_scalar::<_, i64>("SELECT id FROM users")
        .fetch_all(pool)
        .await?
        .into_iter()
        .collect();
    match user_ids.iter().find(|id| !known.contains(id)) {
        Some(id) => Err(LeagueError::validation(format!("user {} does not exist", id))),
        None => Ok(()),
    }
}

pub(crate) async fn season_division_ids(pool: &SqlitePool, season_id: i64) -> Result<BTreeSet<i64>> {
    let ids = sqlx::query_scalar::<_, i64>("SELECT id FROM divisions WHERE season_id = ?")
        .bind(season_id)
        .fetch_all(pool)
        .await?;
    Ok(ids.into_iter().collect())
}

pub(crate) async fn ensure_divisions(pool: &SqlitePool, season_id: i64, division_ids: &[i64]) -> Result<()> {
    let known = season_division_ids(pool, season_id).await?;
    match division_ids.iter().find(|id| !known.contains(id)) {
        Some(id) => Err(LeagueError::validation(format!(
            "division {} is not part of this season",
            id
        ))),
        None => Ok(()),
    }
}

/// Comma-separated ids for audit details.
pub(crate) fn id_list(ids: impl IntoIterator<Item = i64>) -> String {
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
