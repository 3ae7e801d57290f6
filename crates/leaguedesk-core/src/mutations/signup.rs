use tracing::info;

use crate::access::RequestContext;
use crate::audit::AuditEvent;
use crate::error::{LeagueError, Result};
use crate::models::{SeasonPhase, SignupOutcome, SignupRequest};
use crate::League;

/// Longest free-text answer kept on a signup.
const MAX_ANSWER_LENGTH: usize = 500;

fn clean_answer(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| crate::utils::truncate_string(v, MAX_ANSWER_LENGTH))
}

impl League {
    /// Sign the caller up for the current season, or waitlist them when
    /// the season is full.
    pub async fn create_signup(&self, ctx: &RequestContext, request: &SignupRequest) -> Result<SignupOutcome> {
        let user = ctx.user()?;
        let season = ctx.season()?;

        if season.phase() != SeasonPhase::RegistrationOpen {
            return Err(LeagueError::validation(format!(
                "registration for {} is not open",
                season.display_name()
            )));
        }
        if request.pair_pick_id == Some(user.id) {
            return Err(LeagueError::validation("you cannot pick yourself as a pair"));
        }
        if let Some(age) = request.age {
            if !(14..=100).contains(&age) {
                return Err(LeagueError::validation(format!("age {} is out of range", age)));
            }
        }

        let (signed_up, waitlisted, taken): (bool, bool, i64) = sqlx::query_as(
            "SELECT
                 EXISTS (SELECT 1 FROM signups WHERE season_id = ?1 AND user_id = ?2),
                 EXISTS (SELECT 1 FROM waitlist WHERE season_id = ?1 AND user_id = ?2),
                 (SELECT COUNT(*) FROM signups WHERE season_id = ?1)",
        )
        .bind(season.id)
        .bind(user.id)
        .fetch_one(self.pool())
        .await?;
        if signed_up || waitlisted {
            return Err(LeagueError::validation(format!(
                "you are already signed up for {}",
                season.display_name()
            )));
        }
        if let Some(pair) = request.pair_pick_id {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ?")
                .bind(pair)
                .fetch_optional(self.pool())
                .await?;
            if exists.is_none() {
                return Err(LeagueError::validation(format!("pair pick {} does not exist", pair)));
            }
        }

        let full = season.max_players.is_some_and(|max| taken >= max);
        let mut tx = self.pool().begin().await?;
        let outcome = if full {
            let id = sqlx::query("INSERT INTO waitlist (season_id, user_id) VALUES (?, ?)")
                .bind(season.id)
                .bind(user.id)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();
            SignupOutcome::Waitlisted(id)
        } else {
            let id = sqlx::query(
                "INSERT INTO signups (season_id, user_id, pair_pick_id, pair_reason, age, experience)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(season.id)
            .bind(user.id)
            .bind(request.pair_pick_id)
            .bind(clean_answer(request.pair_reason.as_deref()))
            .bind(request.age)
            .bind(clean_answer(request.experience.as_deref()))
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();
            SignupOutcome::Registered(id)
        };
        tx.commit().await?;

        info!(season_id = season.id, user_id = user.id, ?outcome, "Created signup");
        let action = match outcome {
            SignupOutcome::Registered(_) => "signup.create",
            SignupOutcome::Waitlisted(_) => "signup.waitlist",
        };
        self.audit(AuditEvent::new(user.id, action, season.display_name()));
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::context_from_db;
    use crate::db::fixtures;

    async fn open_registration(seeded: &fixtures::Seeded, max_players: i64) {
        sqlx::query("UPDATE seasons SET phase = 'registration_open', max_players = ? WHERE id = ?")
            .bind(max_players)
            .bind(seeded.season_id)
            .execute(&seeded.pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_signup_registers_then_waitlists() {
        let seeded = fixtures::seeded().await;
        open_registration(&seeded, 1).await;
        let league = League::with_db_audit(seeded.pool.clone());
        let ann = fixtures::user(&seeded.pool, "ann@example.org", "Ann", "Lee", false).await;
        let bo = fixtures::user(&seeded.pool, "bo@example.org", "Bo", "Chen", true).await;

        let request = SignupRequest {
            pair_pick_id: Some(bo),
            pair_reason: Some("  carpool  ".to_string()),
            ..SignupRequest::default()
        };
        let ctx = context_from_db(&seeded.pool, ann).await;
        let outcome = league.create_signup(&ctx, &request).await.unwrap();
        assert!(matches!(outcome, SignupOutcome::Registered(_)));

        let reason: Option<String> = sqlx::query_scalar("SELECT pair_reason FROM signups WHERE user_id = ?")
            .bind(ann)
            .fetch_one(&seeded.pool)
            .await
            .unwrap();
        assert_eq!(reason.as_deref(), Some("carpool"));

        let ctx = context_from_db(&seeded.pool, bo).await;
        let outcome = league.create_signup(&ctx, &SignupRequest::default()).await.unwrap();
        assert!(matches!(outcome, SignupOutcome::Waitlisted(_)));
        assert_eq!(league.list_waitlist(seeded.season_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicates_and_self_pair() {
        let seeded = fixtures::seeded().await;
        open_registration(&seeded, 40).await;
        let league = League::with_db_audit(seeded.pool.clone());
        let ann = fixtures::user(&seeded.pool, "ann@example.org", "Ann", "Lee", false).await;
        let ctx = context_from_db(&seeded.pool, ann).await;

        let self_pair = SignupRequest {
            pair_pick_id: Some(ann),
            ..SignupRequest::default()
        };
        assert!(league.create_signup(&ctx, &self_pair).await.is_err());

        league.create_signup(&ctx, &SignupRequest::default()).await.unwrap();
        let err = league.create_signup(&ctx, &SignupRequest::default()).await.unwrap_err();
        assert!(err.public_message().contains("already signed up"));
        assert_eq!(fixtures::count(&seeded.pool, "signups").await, 1);
    }

    #[tokio::test]
    async fn test_signup_requires_open_registration() {
        let seeded = fixtures::seeded().await;
        let league = League::with_db_audit(seeded.pool.clone());
        let ann = fixtures::user(&seeded.pool, "ann@example.org", "Ann", "Lee", false).await;
        let ctx = context_from_db(&seeded.pool, ann).await;

        let err = league.create_signup(&ctx, &SignupRequest::default()).await.unwrap_err();
        assert!(err.public_message().contains("not open"));
    }

    #[test]
    fn test_clean_answer() {
        assert_eq!(clean_answer(Some("   ")), None);
        assert_eq!(clean_answer(Some(" hi ")).as_deref(), Some("hi"));
        assert_eq!(clean_answer(None), None);
    }
}
