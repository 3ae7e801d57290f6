//! Evaluations and the per-season staff roles: commissioners and captains.

use tracing::info;

use super::{
    ensure_divisions, ensure_signed_up, ensure_unique, ensure_users_exist, id_list,
    season_division_ids,
};
use crate::access::RequestContext;
use crate::audit::AuditEvent;
use crate::error::{LeagueError, Result};
use crate::models::{EvaluationInput, Team};
use crate::League;

impl League {
    /// Record the caller's division placement for each player.
    pub async fn save_evaluations(
        &self,
        ctx: &RequestContext,
        evaluations: &[EvaluationInput],
    ) -> Result<usize> {
        let user = ctx.require_evaluator()?;
        let season = ctx.season()?;

        ensure_unique(evaluations.iter().map(|e| e.player_id), "player")?;
        let player_ids: Vec<i64> = evaluations.iter().map(|e| e.player_id).collect();
        ensure_users_exist(self.pool(), &player_ids).await?;
        let division_ids: Vec<i64> = evaluations.iter().map(|e| e.division_id).collect();
        ensure_divisions(self.pool(), season.id, &division_ids).await?;

        let mut tx = self.pool().begin().await?;
        for e in evaluations {
            sqlx::query(
                "INSERT INTO evaluations (season_id, player_id, evaluator_id, division_id)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT (season_id, player_id, evaluator_id) DO UPDATE SET
                     division_id = excluded.division_id,
                     created_at = datetime('now')",
            )
            .bind(season.id)
            .bind(e.player_id)
            .bind(user.id)
            .bind(e.division_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!(season_id = season.id, evaluator = user.id, count = evaluations.len(), "Saved evaluations");
        self.audit(AuditEvent::new(
            user.id,
            "evaluations.save",
            format!("{} evaluations", evaluations.len()),
        ));
        Ok(evaluations.len())
    }

    /// Replace the commissioners of a division.
    pub async fn assign_commissioners(
        &self,
        ctx: &RequestContext,
        division_id: i64,
        user_ids: &[i64],
    ) -> Result<()> {
        let user = ctx.require_admin()?;
        let season = ctx.season()?;

        ensure_unique(user_ids.iter().copied(), "commissioner")?;
        if !season_division_ids(self.pool(), season.id).await?.contains(&division_id) {
            return Err(LeagueError::validation(format!(
                "division {} is not part of this season",
                division_id
            )));
        }
        ensure_users_exist(self.pool(), user_ids).await?;

        let mut tx = self.pool().begin().await?;
        sqlx::query("DELETE FROM commissioners WHERE season_id = ? AND division_id = ?")
            .bind(season.id)
            .bind(division_id)
            .execute(&mut *tx)
            .await?;
        for id in user_ids {
            sqlx::query("INSERT INTO commissioners (season_id, division_id, user_id) VALUES (?, ?, ?)")
                .bind(season.id)
                .bind(division_id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        info!(division_id, count = user_ids.len(), "Assigned commissioners");
        self.audit(AuditEvent::new(
            user.id,
            "commissioners.assign",
            format!("division {}: {}", division_id, id_list(user_ids.iter().copied())),
        ));
        Ok(())
    }

    /// Set or clear a team's captain.
    pub async fn assign_captain(
        &self,
        ctx: &RequestContext,
        team_id: i64,
        captain_id: Option<i64>,
    ) -> Result<()> {
        ctx.require_evaluator()?;
        let season = ctx.season()?;
        let team = self.find_team(season.id, team_id).await?;
        let user = ctx.require_commissioner_of(team.division_id)?;

        if let Some(captain_id) = captain_id {
            ensure_signed_up(self.pool(), season.id, &[captain_id]).await?;
        }

        let mut tx = self.pool().begin().await?;
        sqlx::query("UPDATE teams SET captain_id = ? WHERE id = ?")
            .bind(captain_id)
            .bind(team.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(team_id, captain_id, "Assigned captain");
        self.audit(AuditEvent::new(
            user.id,
            "captain.assign",
            format!(
                "{}: {}",
                team.display_name(),
                captain_id.map(|id| id.to_string()).unwrap_or_else(|| "none".to_string())
            ),
        ));
        Ok(())
    }

    pub(crate) async fn find_team(&self, season_id: i64, team_id: i64) -> Result<Team> {
        sqlx::query_as::<_, Team>(
            "SELECT id, season_id, division_id, number, name, captain_id
             FROM teams WHERE id = ? AND season_id = ?",
        )
        .bind(team_id)
        .bind(season_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| LeagueError::not_found(format!("team {} not found", team_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::context_from_db;
    use crate::db::fixtures;

    #[tokio::test]
    async fn test_save_evaluations_upserts_per_evaluator() {
        let seeded = fixtures::seeded().await;
        let league = League::with_db_audit(seeded.pool.clone());
        let ctx = context_from_db(&seeded.pool, seeded.admin_id).await;
        let ann = fixtures::user(&seeded.pool, "ann@example.org", "Ann", "Lee", false).await;

        let first = [EvaluationInput { player_id: ann, division_id: seeded.divisions[0] }];
        league.save_evaluations(&ctx, &first).await.unwrap();
        let second = [EvaluationInput { player_id: ann, division_id: seeded.divisions[1] }];
        league.save_evaluations(&ctx, &second).await.unwrap();

        assert_eq!(fixtures::count(&seeded.pool, "evaluations").await, 1);
        let division: i64 = sqlx::query_scalar("SELECT division_id FROM evaluations")
            .fetch_one(&seeded.pool)
            .await
            .unwrap();
        assert_eq!(division, seeded.divisions[1]);
    }

    #[tokio::test]
    async fn test_save_evaluations_rejects_duplicates() {
        let seeded = fixtures::seeded().await;
        let league = League::with_db_audit(seeded.pool.clone());
        let ctx = context_from_db(&seeded.pool, seeded.admin_id).await;

        let batch = [
            EvaluationInput { player_id: 5, division_id: seeded.divisions[0] },
            EvaluationInput { player_id: 5, division_id: seeded.divisions[1] },
        ];
        assert!(league.save_evaluations(&ctx, &batch).await.is_err());
        assert_eq!(fixtures::count(&seeded.pool, "evaluations").await, 0);
    }

    #[tokio::test]
    async fn test_save_evaluations_rejects_unknown_player() {
        let seeded = fixtures::seeded().await;
        let league = League::with_db_audit(seeded.pool.clone());
        let ctx = context_from_db(&seeded.pool, seeded.admin_id).await;
        let ann = fixtures::user(&seeded.pool, "ann@example.org", "Ann", "Lee", false).await;

        let batch = [
            EvaluationInput { player_id: ann, division_id: seeded.divisions[0] },
            EvaluationInput { player_id: 99999, division_id: seeded.divisions[0] },
        ];
        let err = league.save_evaluations(&ctx, &batch).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.public_message(), "user 99999 does not exist");
        assert_eq!(fixtures::count(&seeded.pool, "evaluations").await, 0);
    }

    #[tokio::test]
    async fn test_assign_commissioners_replaces_set() {
        let seeded = fixtures::seeded().await;
        let league = League::with_db_audit(seeded.pool.clone());
        let ctx = context_from_db(&seeded.pool, seeded.admin_id).await;
        let ann = fixtures::user(&seeded.pool, "ann@example.org", "Ann", "Lee", false).await;
        let bo = fixtures::user(&seeded.pool, "bo@example.org", "Bo", "Chen", true).await;
        let division = seeded.divisions[0];

        league.assign_commissioners(&ctx, division, &[ann, bo]).await.unwrap();
        league.assign_commissioners(&ctx, division, &[bo]).await.unwrap();

        let ids: Vec<i64> = sqlx::query_scalar("SELECT user_id FROM commissioners")
            .fetch_all(&seeded.pool)
            .await
            .unwrap();
        assert_eq!(ids, vec![bo]);

        assert!(league.assign_commissioners(&ctx, division, &[ann, ann]).await.is_err());
        assert!(league.assign_commissioners(&ctx, 999, &[ann]).await.is_err());
        assert!(league.assign_commissioners(&ctx, division, &[999]).await.is_err());
    }

    #[tokio::test]
    async fn test_commissioner_assigns_captain_in_own_division_only() {
        let seeded = fixtures::seeded().await;
        let pool = &seeded.pool;
        let league = League::with_db_audit(pool.clone());
        let admin = context_from_db(pool, seeded.admin_id).await;

        let commish = fixtures::user(pool, "c@example.org", "Cam", "Ross", true).await;
        league
            .assign_commissioners(&admin, seeded.divisions[0], &[commish])
            .await
            .unwrap();
        let own_team = fixtures::team(pool, seeded.season_id, seeded.divisions[0], 1).await;
        let other_team = fixtures::team(pool, seeded.season_id, seeded.divisions[1], 1).await;
        let captain = fixtures::user(pool, "cap@example.org", "Cap", "Tain", false).await;
        fixtures::signup(pool, seeded.season_id, captain).await;

        let ctx = context_from_db(pool, commish).await;
        league.assign_captain(&ctx, own_team, Some(captain)).await.unwrap();
        let err = league.assign_captain(&ctx, other_team, Some(captain)).await.unwrap_err();
        assert_eq!(err.status_code(), 403);

        let stored: Option<i64> = sqlx::query_scalar("SELECT captain_id FROM teams WHERE id = ?")
            .bind(own_team)
            .fetch_one(pool)
            .await
            .unwrap();
        assert_eq!(stored, Some(captain));
    }

    #[tokio::test]
    async fn test_captain_must_be_signed_up() {
        let seeded = fixtures::seeded().await;
        let league = League::with_db_audit(seeded.pool.clone());
        let ctx = context_from_db(&seeded.pool, seeded.admin_id).await;
        let team = fixtures::team(&seeded.pool, seeded.season_id, seeded.divisions[0], 1).await;
        let stranger = fixtures::user(&seeded.pool, "x@example.org", "X", "Y", true).await;

        let err = league.assign_captain(&ctx, team, Some(stranger)).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            league.assign_captain(&ctx, 999, None).await.unwrap_err().status_code(),
            404
        );
    }

    #[tokio::test]
    async fn test_captain_guard_runs_before_team_lookup() {
        let seeded = fixtures::seeded().await;
        let pool = &seeded.pool;
        let league = League::with_db_audit(pool.clone());

        let mut anonymous = context_from_db(pool, seeded.admin_id).await;
        anonymous.user = None;
        anonymous.roles = Default::default();
        let err = league.assign_captain(&anonymous, 4242, None).await.unwrap_err();
        assert_eq!(err.status_code(), 401);

        let player = fixtures::user(pool, "p@example.org", "P", "Q", true).await;
        let ctx = context_from_db(pool, player).await;
        let err = league.assign_captain(&ctx, 4242, None).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}
