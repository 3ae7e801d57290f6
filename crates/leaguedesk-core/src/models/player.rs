use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::format_height;

/// Gender label that triggers the gender highlight on tryout sheets.
pub const NOT_MALE_LABEL: &str = "Not Male";
pub const MALE_LABEL: &str = "Male";

/// Account-level role stored on the user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Admin,
    Director,
    Player,
}

impl AccountRole {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => AccountRole::Admin,
            "director" => AccountRole::Director,
            _ => AccountRole::Player,
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountRole::Admin => write!(f, "Admin"),
            AccountRole::Director => write!(f, "Director"),
            AccountRole::Player => write!(f, "Player"),
        }
    }
}

/// A row from the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Player {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub preferred_name: Option<String>,
    pub male: bool,
    pub height_inches: Option<i64>,
    pub skill_setter: bool,
    pub skill_hitter: bool,
    pub skill_other: bool,
    pub picture: Option<String>,
    pub role: String,
}

impl Player {
    pub fn account_role(&self) -> AccountRole {
        AccountRole::parse(&self.role)
    }

    /// Preferred first name (when set) followed by the last name.
    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name, self.preferred_name.as_deref())
    }

    pub fn positions_label(&self) -> String {
        positions_label(self.skill_setter, self.skill_hitter, self.skill_other)
    }

    pub fn gender_label(&self) -> &'static str {
        gender_label(self.male)
    }

    pub fn height_label(&self) -> String {
        format_height(self.height_inches)
    }
}

/// "Preferred Last" when a non-empty preferred name differs from the
/// first name, otherwise "First Last".
pub fn display_name(first: &str, last: &str, preferred: Option<&str>) -> String {
    let first = preferred
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(first);
    format!("{} {}", first.trim(), last.trim()).trim().to_string()
}

/// Comma-separated position labels for the three skill flags.
pub fn positions_label(setter: bool, hitter: bool, other: bool) -> String {
    let mut labels = Vec::with_capacity(3);
    if setter {
        labels.push("Setter");
    }
    if hitter {
        labels.push("Hitter");
    }
    if other {
        labels.push("Other");
    }
    labels.join(", ")
}

pub fn gender_label(male: bool) -> &'static str {
    if male {
        MALE_LABEL
    } else {
        NOT_MALE_LABEL
    }
}

/// Partial update of a player record. `None` leaves a field unchanged;
/// an empty `preferred_name` or `picture` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PlayerUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub preferred_name: Option<String>,
    pub male: Option<bool>,
    pub height_inches: Option<i64>,
    pub skill_setter: Option<bool>,
    pub skill_hitter: Option<bool>,
    pub skill_other: Option<bool>,
    pub picture: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Robert", "Smith", None), "Robert Smith");
        assert_eq!(display_name("Robert", "Smith", Some("Bobby")), "Bobby Smith");
        assert_eq!(display_name("Robert", "Smith", Some("  ")), "Robert Smith");
    }

    #[test]
    fn test_positions_label() {
        assert_eq!(positions_label(true, true, false), "Setter, Hitter");
        assert_eq!(positions_label(false, false, true), "Other");
        assert_eq!(positions_label(false, false, false), "");
    }

    #[test]
    fn test_gender_label() {
        assert_eq!(gender_label(true), "Male");
        assert_eq!(gender_label(false), "Not Male");
    }

    #[test]
    fn test_account_role_parse() {
        assert_eq!(AccountRole::parse("admin"), AccountRole::Admin);
        assert_eq!(AccountRole::parse("Director"), AccountRole::Director);
        assert_eq!(AccountRole::parse("player"), AccountRole::Player);
        assert_eq!(AccountRole::parse(""), AccountRole::Player);
    }
}
