use tracing::info;

use crate::access::RequestContext;
use crate::audit::AuditEvent;
use crate::error::{LeagueError, Result};
use crate::League;

impl League {
    /// Approve or reject a pending waitlist entry. Approval creates the
    /// player's signup.
    pub async fn decide_waitlist(&self, ctx: &RequestContext, entry_id: i64, approve: bool) -> Result<()> {
        let user = ctx.require_admin()?;
        let season = ctx.season()?;

        let entry: Option<(i64, Option<bool>)> = sqlx::query_as(
            "SELECT user_id, approved FROM waitlist WHERE id = ? AND season_id = ?",
        )
        .bind(entry_id)
        .bind(season.id)
        .fetch_optional(self.pool())
        .await?;
        let (player_id, decided) =
            entry.ok_or_else(|| LeagueError::not_found(format!("waitlist entry {} not found", entry_id)))?;
        if decided.is_some() {
            return Err(LeagueError::validation(format!(
                "waitlist entry {} has already been decided",
                entry_id
            )));
        }

        let mut tx = self.pool().begin().await?;
        sqlx::query("UPDATE waitlist SET approved = ? WHERE id = ?")
            .bind(approve)
            .bind(entry_id)
            .execute(&mut *tx)
            .await?;
        if approve {
            sqlx::query(
                "INSERT INTO signups (season_id, user_id) VALUES (?, ?)
                 ON CONFLICT (season_id, user_id) DO NOTHING",
            )
            .bind(season.id)
            .bind(player_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        let action = if approve { "waitlist.approve" } else { "waitlist.reject" };
        info!(entry_id, player_id, approve, "Decided waitlist entry");
        self.audit(AuditEvent::new(user.id, action, format!("entry {} user {}", entry_id, player_id)));
        Ok(())
    }
}
