use tracing::info;

use super::{ensure_divisions, ensure_signed_up, ensure_unique};
use crate::access::RequestContext;
use crate::audit::AuditEvent;
use crate::error::{LeagueError, Result};
use crate::models::{Week1Assignment, Week2Assignment};
use crate::League;

/// Highest provisional team number in a week 2 division.
pub const MAX_TEAM_NUMBER: u32 = 6;

impl League {
    /// Move players between week 1 sessions and courts.
    pub async fn update_week1_roster(
        &self,
        ctx: &RequestContext,
        assignments: &[Week1Assignment],
    ) -> Result<usize> {
        let user = ctx.require_staff()?;
        let season = ctx.season()?;

        ensure_unique(assignments.iter().map(|a| a.user_id), "player")?;
        let sessions = season.session_count();
        let courts = season.court_count();
        for a in assignments {
            if a.session == 0 || a.session > sessions {
                return Err(LeagueError::validation(format!(
                    "session {} is not scheduled this season",
                    a.session
                )));
            }
            if a.court == 0 || a.court > courts {
                return Err(LeagueError::validation(format!(
                    "court {} does not exist (courts 1-{})",
                    a.court, courts
                )));
            }
        }
        let user_ids: Vec<i64> = assignments.iter().map(|a| a.user_id).collect();
        ensure_signed_up(self.pool(), season.id, &user_ids).await?;

        let mut tx = self.pool().begin().await?;
        for a in assignments {
            sqlx::query(
                "INSERT INTO week1_roster (season_id, user_id, session_number, court_number)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT (season_id, user_id) DO UPDATE SET
                     session_number = excluded.session_number,
                     court_number = excluded.court_number",
            )
            .bind(season.id)
            .bind(a.user_id)
            .bind(a.session as i64)
            .bind(a.court as i64)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(season_id = season.id, count = assignments.len(), "Updated week 1 roster");
        self.audit(AuditEvent::new(
            user.id,
            "roster.week1",
            format!("{} assignments", assignments.len()),
        ));
        Ok(assignments.len())
    }

    /// Move players between week 2 divisions and provisional teams.
    pub async fn update_week2_roster(
        &self,
        ctx: &RequestContext,
        assignments: &[Week2Assignment],
    ) -> Result<usize> {
        let user = ctx.require_staff()?;
        let season = ctx.season()?;

        ensure_unique(assignments.iter().map(|a| a.user_id), "player")?;
        if let Some(a) = assignments
            .iter()
            .find(|a| a.team == 0 || a.team > MAX_TEAM_NUMBER)
        {
            return Err(LeagueError::validation(format!(
                "team {} is out of range (1-{})",
                a.team, MAX_TEAM_NUMBER
            )));
        }
        let user_ids: Vec<i64> = assignments.iter().map(|a| a.user_id).collect();
        ensure_signed_up(self.pool(), season.id, &user_ids).await?;
        let division_ids: Vec<i64> = assignments.iter().map(|a| a.division_id).collect();
        ensure_divisions(self.pool(), season.id, &division_ids).await?;

        let mut tx = self.pool().begin().await?;
        for a in assignments {
            sqlx::query(
                "INSERT INTO week2_roster (season_id, user_id, division_id, team_number)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT (season_id, user_id) DO UPDATE SET
                     division_id = excluded.division_id,
                     team_number = excluded.team_number",
            )
            .bind(season.id)
            .bind(a.user_id)
            .bind(a.division_id)
            .bind(a.team as i64)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(season_id = season.id, count = assignments.len(), "Updated week 2 roster");
        self.audit(AuditEvent::new(
            user.id,
            "roster.week2",
            format!("{} assignments", assignments.len()),
        ));
        Ok(assignments.len())
    }
}
