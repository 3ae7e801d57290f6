use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A division within a season. Level 1 is the highest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Division {
    pub id: i64,
    pub season_id: i64,
    pub name: String,
    pub level: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Team {
    pub id: i64,
    pub season_id: i64,
    pub division_id: i64,
    pub number: i64,
    pub name: String,
    pub captain_id: Option<i64>,
}

impl Team {
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("Team {}", self.number)
        } else {
            self.name.clone()
        }
    }
}

/// One drafted player as shown on the draft board.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DraftPickView {
    pub team_id: i64,
    pub user_id: i64,
    pub name: String,
    pub male: bool,
    pub round: i64,
    pub overall: i64,
}

/// A team with its picks in draft order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftTeam {
    pub team_id: i64,
    pub team_name: String,
    pub number: i64,
    pub division_id: i64,
    pub division_name: String,
    pub captain_name: Option<String>,
    pub picks: Vec<DraftPickView>,
}

impl DraftTeam {
    pub fn male_count(&self) -> usize {
        self.picks.iter().filter(|p| p.male).count()
    }

    pub fn non_male_count(&self) -> usize {
        self.picks.len() - self.male_count()
    }
}
