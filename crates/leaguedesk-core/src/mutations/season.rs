use tracing::info;

use crate::access::RequestContext;
use crate::audit::AuditEvent;
use crate::error::Result;
use crate::models::SeasonPhase;
use crate::League;

impl League {
    /// Move the current season to another phase. Callers holding a
    /// `SeasonCache` must invalidate it afterwards.
    pub async fn set_season_phase(&self, ctx: &RequestContext, phase: SeasonPhase) -> Result<()> {
        let user = ctx.require_admin()?;
        let season = ctx.season()?;

        let mut tx = self.pool().begin().await?;
        sqlx::query("UPDATE seasons SET phase = ? WHERE id = ?")
            .bind(phase.as_str())
            .bind(season.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(season_id = season.id, from = %season.phase(), to = %phase, "Changed season phase");
        self.audit(AuditEvent::new(
            user.id,
            "season.phase",
            format!("{}: {} -> {}", season.display_name(), season.phase, phase.as_str()),
        ));
        Ok(())
    }
}
