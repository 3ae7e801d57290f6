//! Read side: per-page data fetches that join roster, signup, draft and
//! user records for a season.

use std::collections::BTreeMap;

use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::db::{season_key, season_order};
use crate::error::{LeagueError, Result};
use crate::models::player::{display_name, gender_label, positions_label};
use crate::models::{
    Division, DraftPickView, DraftTeam, RosterRow, RosterSlot, SignupSummary, Team, WaitlistEntry,
};
use crate::utils::format_height;
use crate::League;

/// Columns shared by both tryout-week roster queries.
const ROSTER_PLAYER_COLUMNS: &str = "
    u.id AS user_id, u.first_name, u.last_name, u.preferred_name, u.male, u.height_inches,
    u.skill_setter, u.skill_hitter, u.skill_other,
    p.first_name AS pair_first_name, p.last_name AS pair_last_name,
    p.preferred_name AS pair_preferred_name";

#[derive(Debug, FromRow)]
struct RosterPlayerRecord {
    user_id: i64,
    first_name: String,
    last_name: String,
    preferred_name: Option<String>,
    male: bool,
    height_inches: Option<i64>,
    skill_setter: bool,
    skill_hitter: bool,
    skill_other: bool,
    pair_first_name: Option<String>,
    pair_last_name: Option<String>,
    pair_preferred_name: Option<String>,
}

#[derive(Debug, FromRow)]
struct Week1Record {
    #[sqlx(flatten)]
    player: RosterPlayerRecord,
    session_number: i64,
    court_number: i64,
}

#[derive(Debug, FromRow)]
struct Week2Record {
    #[sqlx(flatten)]
    player: RosterPlayerRecord,
    division_id: i64,
    division_name: String,
    division_level: i64,
    team_number: i64,
}

/// Most recent earlier-season draft for a player.
#[derive(Debug, Clone, FromRow)]
struct HistoryRecord {
    user_id: i64,
    season_name: String,
    season_year: i64,
    division_name: String,
}

impl RosterPlayerRecord {
    fn into_row(self, label: String, history: Option<&HistoryRecord>, slot: RosterSlot) -> RosterRow {
        let pair = match (&self.pair_first_name, &self.pair_last_name) {
            (Some(first), Some(last)) => {
                display_name(first, last, self.pair_preferred_name.as_deref())
            }
            _ => String::new(),
        };
        RosterRow {
            user_id: self.user_id,
            label,
            name: display_name(&self.first_name, &self.last_name, self.preferred_name.as_deref()),
            pair,
            positions: positions_label(self.skill_setter, self.skill_hitter, self.skill_other),
            height: format_height(self.height_inches),
            gender: gender_label(self.male).to_string(),
            last_season: history
                .map(|h| format!("{} {}", h.season_name, h.season_year))
                .unwrap_or_default(),
            last_division: history.map(|h| h.division_name.clone()).unwrap_or_default(),
            blank_history: history.is_none(),
            slot,
        }
    }
}

/// Latest draft per player across seasons that came before this one.
async fn draft_history(pool: &SqlitePool, season_id: i64) -> Result<BTreeMap<i64, HistoryRecord>> {
    let sql = format!(
        "SELECT d.user_id, se.name AS season_name, se.year AS season_year, dv.name AS division_name
         FROM drafts d
         JOIN seasons se ON se.id = d.season_id
         JOIN seasons cur ON cur.id = ?
         JOIN teams t ON t.id = d.team_id
         JOIN divisions dv ON dv.id = t.division_id
         WHERE {} < {}
         ORDER BY {}",
        season_key("se"),
        season_key("cur"),
        season_order("se", "DESC")
    );
    let records = sqlx::query_as::<_, HistoryRecord>(&sql)
        .bind(season_id)
        .fetch_all(pool)
        .await?;

    let mut latest = BTreeMap::new();
    for record in records {
        latest.entry(record.user_id).or_insert(record);
    }
    Ok(latest)
}

impl League {
    /// Week 1 roster rows, numbered from 1 within each session.
    pub async fn week1_roster_rows(&self, season_id: i64) -> Result<Vec<RosterRow>> {
        let sql = format!(
            "SELECT {}, r.session_number, r.court_number
             FROM week1_roster r
             JOIN users u ON u.id = r.user_id
             LEFT JOIN signups s ON s.season_id = r.season_id AND s.user_id = r.user_id
             LEFT JOIN users p ON p.id = s.pair_pick_id
             WHERE r.season_id = ?
             ORDER BY r.session_number, r.court_number, u.last_name, u.first_name, u.id",
            ROSTER_PLAYER_COLUMNS
        );
        let (records, history) = futures::try_join!(
            async {
                sqlx::query_as::<_, Week1Record>(&sql)
                    .bind(season_id)
                    .fetch_all(self.pool())
                    .await
                    .map_err(LeagueError::from)
            },
            draft_history(self.pool(), season_id),
        )?;

        let mut numbers: BTreeMap<i64, u32> = BTreeMap::new();
        let rows: Vec<RosterRow> = records
            .into_iter()
            .map(|r| {
                let number = numbers.entry(r.session_number).or_insert(0);
                *number += 1;
                let slot = RosterSlot::Week1 {
                    session: r.session_number.max(0) as u32,
                    court: r.court_number.max(0) as u32,
                };
                let history = history.get(&r.player.user_id);
                r.player.into_row(number.to_string(), history, slot)
            })
            .collect();

        debug!(season_id, rows = rows.len(), "Loaded week 1 roster");
        Ok(rows)
    }

    /// Week 2 roster rows, numbered from 1 within each team.
    pub async fn week2_roster_rows(&self, season_id: i64) -> Result<Vec<RosterRow>> {
        let sql = format!(
            "SELECT {}, dv.id AS division_id, dv.name AS division_name, dv.level AS division_level,
                    r.team_number
             FROM week2_roster r
             JOIN users u ON u.id = r.user_id
             JOIN divisions dv ON dv.id = r.division_id
             LEFT JOIN signups s ON s.season_id = r.season_id AND s.user_id = r.user_id
             LEFT JOIN users p ON p.id = s.pair_pick_id
             WHERE r.season_id = ?
             ORDER BY dv.level, r.team_number, u.last_name, u.first_name, u.id",
            ROSTER_PLAYER_COLUMNS
        );
        let (records, history) = futures::try_join!(
            async {
                sqlx::query_as::<_, Week2Record>(&sql)
                    .bind(season_id)
                    .fetch_all(self.pool())
                    .await
                    .map_err(LeagueError::from)
            },
            draft_history(self.pool(), season_id),
        )?;

        let mut numbers: BTreeMap<(i64, i64), u32> = BTreeMap::new();
        let rows: Vec<RosterRow> = records
            .into_iter()
            .map(|r| {
                let number = numbers.entry((r.division_id, r.team_number)).or_insert(0);
                *number += 1;
                let slot = RosterSlot::Week2 {
                    division_id: r.division_id,
                    division_name: r.division_name,
                    division_level: r.division_level,
                    team: r.team_number.max(0) as u32,
                };
                let history = history.get(&r.player.user_id);
                r.player.into_row(number.to_string(), history, slot)
            })
            .collect();

        debug!(season_id, rows = rows.len(), "Loaded week 2 roster");
        Ok(rows)
    }

    pub async fn list_divisions(&self, season_id: i64) -> Result<Vec<Division>> {
        let divisions = sqlx::query_as::<_, Division>(
            "SELECT id, season_id, name, level FROM divisions WHERE season_id = ? ORDER BY level, id",
        )
        .bind(season_id)
        .fetch_all(self.pool())
        .await?;
        Ok(divisions)
    }

    pub async fn list_teams(&self, season_id: i64) -> Result<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            "SELECT t.id, t.season_id, t.division_id, t.number, t.name, t.captain_id
             FROM teams t JOIN divisions d ON d.id = t.division_id
             WHERE t.season_id = ?
             ORDER BY d.level, t.number",
        )
        .bind(season_id)
        .fetch_all(self.pool())
        .await?;
        Ok(teams)
    }

    pub async fn list_signups(&self, season_id: i64) -> Result<Vec<SignupSummary>> {
        let signups = sqlx::query_as::<_, SignupSummary>(
            "SELECT s.id AS signup_id, u.id AS user_id, u.first_name, u.last_name, u.preferred_name,
                    u.email, u.male,
                    CASE WHEN p.id IS NULL THEN NULL ELSE p.first_name || ' ' || p.last_name END AS pair_name,
                    s.pair_reason,
                    EXISTS (SELECT 1 FROM drafts d WHERE d.season_id = s.season_id AND d.user_id = u.id) AS drafted,
                    s.created_at
             FROM signups s
             JOIN users u ON u.id = s.user_id
             LEFT JOIN users p ON p.id = s.pair_pick_id
             WHERE s.season_id = ?
             ORDER BY u.last_name, u.first_name",
        )
        .bind(season_id)
        .fetch_all(self.pool())
        .await?;
        Ok(signups)
    }

    pub async fn list_waitlist(&self, season_id: i64) -> Result<Vec<WaitlistEntry>> {
        let entries = sqlx::query_as::<_, WaitlistEntry>(
            "SELECT w.id, w.season_id, w.user_id, u.first_name, u.last_name, u.email, w.approved, w.created_at
             FROM waitlist w
             JOIN users u ON u.id = w.user_id
             WHERE w.season_id = ? AND w.approved IS NULL
             ORDER BY w.created_at, w.id",
        )
        .bind(season_id)
        .fetch_all(self.pool())
        .await?;
        Ok(entries)
    }

    /// Teams with their picks, in division then team order.
    pub async fn draft_board(&self, season_id: i64) -> Result<Vec<DraftTeam>> {
        #[derive(FromRow)]
        struct TeamRecord {
            team_id: i64,
            team_name: String,
            number: i64,
            division_id: i64,
            division_name: String,
            captain_first_name: Option<String>,
            captain_last_name: Option<String>,
        }

        let (teams, picks) = futures::try_join!(
            sqlx::query_as::<_, TeamRecord>(
                "SELECT t.id AS team_id, t.name AS team_name, t.number, d.id AS division_id,
                        d.name AS division_name,
                        c.first_name AS captain_first_name, c.last_name AS captain_last_name
                 FROM teams t
                 JOIN divisions d ON d.id = t.division_id
                 LEFT JOIN users c ON c.id = t.captain_id
                 WHERE t.season_id = ?
                 ORDER BY d.level, t.number",
            )
            .bind(season_id)
            .fetch_all(self.pool()),
            sqlx::query_as::<_, DraftPickView>(
                "SELECT d.team_id, u.id AS user_id, u.first_name || ' ' || u.last_name AS name,
                        u.male, d.round, d.overall
                 FROM drafts d JOIN users u ON u.id = d.user_id
                 WHERE d.season_id = ?
                 ORDER BY d.overall",
            )
            .bind(season_id)
            .fetch_all(self.pool()),
        )?;

        let mut by_team: BTreeMap<i64, Vec<DraftPickView>> = BTreeMap::new();
        for pick in picks {
            by_team.entry(pick.team_id).or_default().push(pick);
        }

        Ok(teams
            .into_iter()
            .map(|t| {
                let team_name = if t.team_name.trim().is_empty() {
                    format!("Team {}", t.number)
                } else {
                    t.team_name
                };
                DraftTeam {
                    picks: by_team.remove(&t.team_id).unwrap_or_default(),
                    team_id: t.team_id,
                    team_name,
                    number: t.number,
                    division_id: t.division_id,
                    division_name: t.division_name,
                    captain_name: match (t.captain_first_name, t.captain_last_name) {
                        (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
                        _ => None,
                    },
                }
            })
            .collect())
    }
}
