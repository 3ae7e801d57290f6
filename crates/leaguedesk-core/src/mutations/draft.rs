use sqlx::FromRow;
use tracing::info;

use super::ensure_signed_up;
use crate::access::RequestContext;
use crate::audit::AuditEvent;
use crate::error::{LeagueError, Result};
use crate::models::{DraftPickInput, DraftPickView};
use crate::League;

#[derive(FromRow)]
struct TeamGenderCounts {
    male: i64,
    non_male: i64,
}

impl League {
    /// Add a player to a team at the next pick number.
    pub async fn record_draft_pick(
        &self,
        ctx: &RequestContext,
        pick: DraftPickInput,
    ) -> Result<DraftPickView> {
        ctx.require_draft_participant()?;
        let season = ctx.season()?;
        let team = self.find_team(season.id, pick.team_id).await?;
        let user = ctx.require_captain_of(team.id, team.division_id)?;

        ensure_signed_up(self.pool(), season.id, &[pick.user_id]).await?;

        // Take the write lock up front so concurrent picks see each other's rows.
        let mut tx = self.pool().begin_with("BEGIN IMMEDIATE").await?;

        let already: Option<i64> =
            sqlx::query_scalar("SELECT team_id FROM drafts WHERE season_id = ? AND user_id = ?")
                .bind(season.id)
                .bind(pick.user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if already.is_some() {
            return Err(LeagueError::validation(format!(
                "player {} has already been drafted",
                pick.user_id
            )));
        }

        let (name, male): (String, bool) =
            sqlx::query_as("SELECT first_name || ' ' || last_name, male FROM users WHERE id = ?")
                .bind(pick.user_id)
                .fetch_one(&mut *tx)
                .await?;

        let counts = sqlx::query_as::<_, TeamGenderCounts>(
            "SELECT COALESCE(SUM(u.male), 0) AS male, COALESCE(SUM(1 - u.male), 0) AS non_male
             FROM drafts d JOIN users u ON u.id = d.user_id
             WHERE d.season_id = ? AND d.team_id = ?",
        )
        .bind(season.id)
        .bind(team.id)
        .fetch_one(&mut *tx)
        .await?;

        let (taken, quota, label) = if male {
            (counts.male, season.team_male_quota, "male")
        } else {
            (counts.non_male, season.team_non_male_quota, "non-male")
        };
        if taken >= quota {
            return Err(LeagueError::validation(format!(
                "{} already has {} {} players (quota {})",
                team.display_name(),
                taken,
                label,
                quota
            )));
        }

        let overall: i64 =
            sqlx::query_scalar("SELECT COUNT(*) + 1 FROM drafts WHERE season_id = ?")
                .bind(season.id)
                .fetch_one(&mut *tx)
                .await?;
        let round = counts.male + counts.non_male + 1;
        sqlx::query(
            "INSERT INTO drafts (season_id, team_id, user_id, round, overall) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(season.id)
        .bind(team.id)
        .bind(pick.user_id)
        .bind(round)
        .bind(overall)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        info!(team_id = team.id, user_id = pick.user_id, round, overall, "Recorded draft pick");
        self.audit(AuditEvent::new(
            user.id,
            "draft.pick",
            format!("{} picked {} (#{})", team.display_name(), pick.user_id, overall),
        ));

        Ok(DraftPickView {
            team_id: team.id,
            user_id: pick.user_id,
            name,
            male,
            round,
            overall,
        })
    }
}
