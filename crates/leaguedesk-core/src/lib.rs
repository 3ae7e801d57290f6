//! Core library for the leaguedesk league administration service.
//!
//! This crate holds everything that does not depend on the HTTP surface:
//!
//! - `models`: seasons, players, divisions, teams, signups, roster rows
//! - `identity`: session lookup against the external auth service
//! - `access`: role lookups and the per-request `RequestContext`
//! - `queries` / `mutations` / `reports`: reads and validated writes
//! - `pdf`: the tryout sheet layout engine
//!
//! All data operations hang off the [`League`] handle, which owns the
//! connection pool and the audit sink.

pub mod access;
pub mod audit;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod models;
pub mod mutations;
pub mod pdf;
pub mod queries;
pub mod reports;
pub mod tryouts;
pub mod utils;

use std::sync::Arc;

use sqlx::SqlitePool;

pub use access::{RequestContext, Role, RoleSet};
pub use audit::{AuditEvent, AuditSink, DbAuditSink};
pub use cache::SeasonCache;
pub use config::Config;
pub use error::{LeagueError, Result};

/// Handle for all league data operations.
/// Clone is cheap - the pool and the audit sink are reference counted.
#[derive(Clone)]
pub struct League {
    pool: SqlitePool,
    audit: Arc<dyn AuditSink>,
}

impl League {
    pub fn new(pool: SqlitePool, audit: Arc<dyn AuditSink>) -> Self {
        Self { pool, audit }
    }

    /// League backed by the pool, auditing into the same database.
    pub fn with_db_audit(pool: SqlitePool) -> Self {
        let audit = Arc::new(DbAuditSink::new(pool.clone()));
        Self { pool, audit }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub(crate) fn audit(&self, event: AuditEvent) {
        self.audit.record(event);
    }
}
