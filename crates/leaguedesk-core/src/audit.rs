//! Audit trail of who changed what.
//!
//! Recording is fire-and-forget: a failed audit write is logged and never
//! fails the mutation that produced it.

use std::sync::Mutex;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::utils::truncate_string;

/// Longest detail string kept in the audit log.
const MAX_DETAIL_LENGTH: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub user_id: Option<i64>,
    pub action: String,
    pub detail: String,
}

impl AuditEvent {
    pub fn new(user_id: i64, action: &str, detail: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            action: action.to_string(),
            detail: truncate_string(&detail.into(), MAX_DETAIL_LENGTH),
        }
    }
}

pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Writes audit events to the `audit_log` table from a background task.
pub struct DbAuditSink {
    pool: SqlitePool,
}

impl DbAuditSink {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AuditSink for DbAuditSink {
    fn record(&self, event: AuditEvent) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let result = sqlx::query("INSERT INTO audit_log (user_id, action, detail) VALUES (?, ?, ?)")
                .bind(event.user_id)
                .bind(&event.action)
                .bind(&event.detail)
                .execute(&pool)
                .await;
            if let Err(e) = result {
                warn!(action = %event.action, error = %e, "Failed to write audit event");
            }
        });
    }
}

/// Keeps audit events in memory; used where no database sink is wanted.
#[derive(Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
