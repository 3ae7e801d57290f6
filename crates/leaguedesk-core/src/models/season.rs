use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Where a season is in its yearly cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonPhase {
    Setup,
    RegistrationOpen,
    Tryouts,
    Draft,
    Regular,
    Complete,
}

impl SeasonPhase {
    /// Parse the stored phase name. Unknown values are treated as `Setup`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "registration_open" => SeasonPhase::RegistrationOpen,
            "tryouts" => SeasonPhase::Tryouts,
            "draft" => SeasonPhase::Draft,
            "regular" => SeasonPhase::Regular,
            "complete" => SeasonPhase::Complete,
            _ => SeasonPhase::Setup,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonPhase::Setup => "setup",
            SeasonPhase::RegistrationOpen => "registration_open",
            SeasonPhase::Tryouts => "tryouts",
            SeasonPhase::Draft => "draft",
            SeasonPhase::Regular => "regular",
            SeasonPhase::Complete => "complete",
        }
    }
}

impl std::fmt::Display for SeasonPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeasonPhase::Setup => write!(f, "Setup"),
            SeasonPhase::RegistrationOpen => write!(f, "Registration Open"),
            SeasonPhase::Tryouts => write!(f, "Tryouts"),
            SeasonPhase::Draft => write!(f, "Draft"),
            SeasonPhase::Regular => write!(f, "Regular Season"),
            SeasonPhase::Complete => write!(f, "Complete"),
        }
    }
}

/// A row from the `seasons` table: identity plus the schedule strings
/// shown on tryout sheets.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SeasonConfig {
    pub id: i64,
    /// Short code used in filenames, e.g. "fall"
    pub code: String,
    pub name: String,
    pub year: i64,
    pub phase: String,
    pub max_players: Option<i64>,
    pub week1_date: Option<String>,
    pub week2_date: Option<String>,
    pub week3_date: Option<String>,
    pub draft_date: Option<String>,
    /// Comma-separated tryout session start times, e.g. "6:00pm,7:30pm"
    pub session_times: String,
    pub courts: i64,
    pub team_male_quota: i64,
    pub team_non_male_quota: i64,
}

impl SeasonConfig {
    pub fn phase(&self) -> SeasonPhase {
        SeasonPhase::parse(&self.phase)
    }

    /// e.g. "Fall 2025"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.year)
    }

    pub fn session_times(&self) -> Vec<String> {
        self.session_times
            .split(',')
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect()
    }

    pub fn session_count(&self) -> u32 {
        self.session_times().len() as u32
    }

    /// Start time of a 1-based session number, if scheduled.
    pub fn session_time(&self, session: u32) -> Option<String> {
        if session == 0 {
            return None;
        }
        self.session_times().into_iter().nth(session as usize - 1)
    }

    pub fn court_count(&self) -> u32 {
        self.courts.max(0) as u32
    }
}

#[cfg(test)]
pub(crate) fn sample_season() -> SeasonConfig {
    SeasonConfig {
        id: 1,
        code: "fall".to_string(),
        name: "Fall".to_string(),
        year: 2025,
        phase: "tryouts".to_string(),
        max_players: Some(96),
        week1_date: Some("2025-09-06".to_string()),
        week2_date: Some("2025-09-13".to_string()),
        week3_date: None,
        draft_date: None,
        session_times: "6:00pm, 7:30pm".to_string(),
        courts: 4,
        team_male_quota: 6,
        team_non_male_quota: 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_parse() {
        assert_eq!(SeasonPhase::parse("registration_open"), SeasonPhase::RegistrationOpen);
        assert_eq!(SeasonPhase::parse("TRYOUTS"), SeasonPhase::Tryouts);
        assert_eq!(SeasonPhase::parse(" draft "), SeasonPhase::Draft);
        assert_eq!(SeasonPhase::parse("bogus"), SeasonPhase::Setup);
    }

    #[test]
    fn test_phase_round_trips_through_storage_name() {
        for phase in [
            SeasonPhase::Setup,
            SeasonPhase::RegistrationOpen,
            SeasonPhase::Tryouts,
            SeasonPhase::Draft,
            SeasonPhase::Regular,
            SeasonPhase::Complete,
        ] {
            assert_eq!(SeasonPhase::parse(phase.as_str()), phase);
        }
    }

    #[test]
    fn test_session_times() {
        let season = sample_season();
        assert_eq!(season.session_times(), vec!["6:00pm", "7:30pm"]);
        assert_eq!(season.session_count(), 2);
        assert_eq!(season.session_time(2).as_deref(), Some("7:30pm"));
        assert_eq!(season.session_time(0), None);
        assert_eq!(season.session_time(3), None);
        assert_eq!(season.display_name(), "Fall 2025");
    }
}
