//! Data models for league entities.
//!
//! - `SeasonConfig`, `SeasonPhase`: the current season and its schedule
//! - `Player`, `PlayerUpdate`: user records and partial edits
//! - `Division`, `Team`, `DraftTeam`: season structure and the draft board
//! - `SignupSummary`, `WaitlistEntry`: registration state
//! - `RosterRow`, `RosterSlot`: tryout sheet rows and batch assignments

pub mod player;
pub mod roster;
pub mod season;
pub mod signup;
pub mod team;

pub use player::{AccountRole, Player, PlayerUpdate};
pub use roster::{
    DraftPickInput, EvaluationInput, RosterRow, RosterSlot, Week1Assignment, Week2Assignment,
};
pub use season::{SeasonConfig, SeasonPhase};
pub use signup::{SignupOutcome, SignupRequest, SignupSummary, WaitlistEntry};
pub use team::{Division, DraftPickView, DraftTeam, Team};
