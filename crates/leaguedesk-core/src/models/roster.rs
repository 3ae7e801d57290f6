//! Tryout roster rows and the batch inputs that move players between slots.

use serde::{Deserialize, Serialize};

use super::player::NOT_MALE_LABEL;

/// Where a player sits on a tryout roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "week", rename_all = "snake_case")]
pub enum RosterSlot {
    /// Week 1: open tryouts, players spread over sessions and courts.
    Week1 { session: u32, court: u32 },
    /// Week 2: players placed on provisional teams within a division.
    Week2 {
        division_id: i64,
        division_name: String,
        division_level: i64,
        team: u32,
    },
}

/// One player's line on a tryout sheet. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRow {
    pub user_id: i64,
    /// Number evaluators call the player by
    pub label: String,
    pub name: String,
    /// Pair partner's name, empty when there is no pair pick
    pub pair: String,
    pub positions: String,
    pub height: String,
    pub gender: String,
    pub last_season: String,
    pub last_division: String,
    /// No draft in any earlier season
    pub blank_history: bool,
    pub slot: RosterSlot,
}

impl RosterRow {
    pub fn has_pair(&self) -> bool {
        !self.pair.trim().is_empty()
    }

    pub fn is_setter(&self) -> bool {
        self.positions.contains("Setter")
    }

    pub fn is_not_male(&self) -> bool {
        self.gender == NOT_MALE_LABEL
    }
}

/// Move a player to a week 1 session/court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Week1Assignment {
    pub user_id: i64,
    pub session: u32,
    pub court: u32,
}

/// Move a player to a week 2 division team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Week2Assignment {
    pub user_id: i64,
    pub division_id: i64,
    pub team: u32,
}

/// An evaluator's division placement for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct EvaluationInput {
    pub player_id: i64,
    pub division_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct DraftPickInput {
    pub team_id: i64,
    pub user_id: i64,
}

#[cfg(test)]
pub(crate) fn week1_row(user_id: i64, session: u32, court: u32, name: &str) -> RosterRow {
    RosterRow {
        user_id,
        label: user_id.to_string(),
        name: name.to_string(),
        pair: String::new(),
        positions: "Hitter".to_string(),
        height: "5'10\"".to_string(),
        gender: "Male".to_string(),
        last_season: "Spring 2025".to_string(),
        last_division: "Blue".to_string(),
        blank_history: false,
        slot: RosterSlot::Week1 { session, court },
    }
}

#[cfg(test)]
pub(crate) fn week2_row(user_id: i64, division_id: i64, level: i64, team: u32) -> RosterRow {
    RosterRow {
        slot: RosterSlot::Week2 {
            division_id,
            division_name: format!("Division {}", level),
            division_level: level,
            team,
        },
        ..week1_row(user_id, 1, 1, &format!("Player {}", user_id))
    }
}
