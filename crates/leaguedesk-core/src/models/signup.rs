use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Request body for a season signup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SignupRequest {
    pub pair_pick_id: Option<i64>,
    pub pair_reason: Option<String>,
    pub age: Option<i64>,
    pub experience: Option<String>,
}

/// Where a signup landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "id", rename_all = "snake_case")]
pub enum SignupOutcome {
    Registered(i64),
    Waitlisted(i64),
}

/// A signup joined with the player's name and draft state.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SignupSummary {
    pub signup_id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub preferred_name: Option<String>,
    pub email: String,
    pub male: bool,
    pub pair_name: Option<String>,
    pub pair_reason: Option<String>,
    pub drafted: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WaitlistEntry {
    pub id: i64,
    pub season_id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub approved: Option<bool>,
    pub created_at: String,
}

impl WaitlistEntry {
    pub fn is_pending(&self) -> bool {
        self.approved.is_none()
    }
}
