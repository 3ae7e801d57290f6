//! Staff reports: season-over-season attrition and the membership list.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use sqlx::FromRow;
use tracing::debug;

use crate::access::RequestContext;
use crate::db::{season_key, season_order};
use crate::error::Result;
use crate::models::player::{display_name, gender_label, positions_label};
use crate::League;

/// One season in the attrition series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttritionPoint {
    pub season_id: i64,
    /// e.g. "Fall 2025"
    pub label: String,
    pub total: usize,
    /// Also played the previous season
    pub returning: usize,
    /// Never played in any earlier season
    pub new_players: usize,
    /// Back after sitting out at least one season
    pub rejoined: usize,
    /// Played the previous season but not this one
    pub lost: usize,
    /// Share of the previous season's players who came back, in percent
    pub retention_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipEntry {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub gender: String,
    pub positions: String,
    pub new_player: bool,
}

#[derive(FromRow)]
struct SeasonRecord {
    id: i64,
    name: String,
    year: i64,
}

#[derive(FromRow)]
struct MemberRecord {
    user_id: i64,
    first_name: String,
    last_name: String,
    preferred_name: Option<String>,
    email: String,
    male: bool,
    skill_setter: bool,
    skill_hitter: bool,
    skill_other: bool,
    played_before: bool,
}

/// Build the series from each season's player set, oldest season first.
pub fn attrition_series(seasons: &[(i64, String, BTreeSet<i64>)]) -> Vec<AttritionPoint> {
    let mut seen_ever: BTreeSet<i64> = BTreeSet::new();
    let mut previous: Option<&BTreeSet<i64>> = None;
    let mut points = Vec::with_capacity(seasons.len());

    for (season_id, label, players) in seasons {
        let returning = previous.map(|p| players.intersection(p).count()).unwrap_or(0);
        let new_players = players.difference(&seen_ever).count();
        let lost = previous.map(|p| p.difference(players).count()).unwrap_or(0);
        let retention_pct = previous
            .filter(|p| !p.is_empty())
            .map(|p| returning as f64 * 100.0 / p.len() as f64);

        points.push(AttritionPoint {
            season_id: *season_id,
            label: label.clone(),
            total: players.len(),
            returning,
            new_players,
            rejoined: players.len() - returning - new_players,
            lost,
            retention_pct,
        });

        seen_ever.extend(players.iter().copied());
        previous = Some(players);
    }
    points
}

impl League {
    /// Season-over-season player counts across every season.
    pub async fn attrition_report(&self, ctx: &RequestContext) -> Result<Vec<AttritionPoint>> {
        ctx.require_staff()?;

        let seasons_sql = format!(
            "SELECT s.id, s.name, s.year FROM seasons s ORDER BY {}",
            season_order("s", "ASC")
        );
        let (seasons, signups) = futures::try_join!(
            sqlx::query_as::<_, SeasonRecord>(&seasons_sql).fetch_all(self.pool()),
            sqlx::query_as::<_, (i64, i64)>("SELECT season_id, user_id FROM signups")
                .fetch_all(self.pool()),
        )?;

        let mut players: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
        for (season_id, user_id) in signups {
            players.entry(season_id).or_default().insert(user_id);
        }
        let series: Vec<_> = seasons
            .into_iter()
            .map(|s| {
                let set = players.remove(&s.id).unwrap_or_default();
                (s.id, format!("{} {}", s.name, s.year), set)
            })
            .collect();

        debug!(seasons = series.len(), "Built attrition report");
        Ok(attrition_series(&series))
    }

    /// Everyone signed up for the current season.
    pub async fn membership_list(&self, ctx: &RequestContext) -> Result<Vec<MembershipEntry>> {
        ctx.require_staff()?;
        let season = ctx.season()?;

        let sql = format!(
            "SELECT u.id AS user_id, u.first_name, u.last_name, u.preferred_name, u.email, u.male,
                    u.skill_setter, u.skill_hitter, u.skill_other,
                    EXISTS (
                        SELECT 1 FROM signups e JOIN seasons es ON es.id = e.season_id
                        WHERE e.user_id = u.id AND {} < {}
                    ) AS played_before
             FROM signups s
             JOIN users u ON u.id = s.user_id
             JOIN seasons cur ON cur.id = s.season_id
             WHERE s.season_id = ?
             ORDER BY u.last_name, u.first_name",
            season_key("es"),
            season_key("cur")
        );
        let records = sqlx::query_as::<_, MemberRecord>(&sql)
            .bind(season.id)
            .fetch_all(self.pool())
            .await?;

        Ok(records
            .into_iter()
            .map(|r| MembershipEntry {
                user_id: r.user_id,
                name: display_name(&r.first_name, &r.last_name, r.preferred_name.as_deref()),
                email: r.email,
                gender: gender_label(r.male).to_string(),
                positions: positions_label(r.skill_setter, r.skill_hitter, r.skill_other),
                new_player: !r.played_before,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::context_from_db;
    use crate::db::fixtures;

    fn set(ids: &[i64]) -> BTreeSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_attrition_series() {
        let seasons = vec![
            (1, "Spring 2024".to_string(), set(&[1, 2, 3, 4])),
            (2, "Fall 2024".to_string(), set(&[1, 2, 5])),
            (3, "Spring 2025".to_string(), set(&[2, 3, 6])),
        ];
        let points = attrition_series(&seasons);

        assert_eq!(points[0].new_players, 4);
        assert_eq!(points[0].retention_pct, None);

        assert_eq!(points[1].returning, 2);
        assert_eq!(points[1].new_players, 1);
        assert_eq!(points[1].lost, 2);
        assert_eq!(points[1].retention_pct, Some(50.0));

        // Player 3 sat out Fall 2024
        assert_eq!(points[2].returning, 1);
        assert_eq!(points[2].rejoined, 1);
        assert_eq!(points[2].new_players, 1);
        assert_eq!(points[2].lost, 2);
    }

    #[tokio::test]
    async fn test_membership_list_flags_new_players() {
        let seeded = fixtures::seeded().await;
        let pool = &seeded.pool;
        let league = League::with_db_audit(pool.clone());
        let ann = fixtures::user(pool, "ann@example.org", "Ann", "Lee", false).await;
        let bo = fixtures::user(pool, "bo@example.org", "Bo", "Chen", true).await;
        fixtures::signup(pool, seeded.previous_season_id, ann).await;
        fixtures::signup(pool, seeded.season_id, ann).await;
        fixtures::signup(pool, seeded.season_id, bo).await;

        let ctx = context_from_db(pool, seeded.admin_id).await;
        let members = league.membership_list(&ctx).await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "Bo Chen");
        assert!(members[0].new_player);
        assert_eq!(members[1].name, "Ann Lee");
        assert!(!members[1].new_player);
        assert_eq!(members[1].gender, "Not Male");

        let report = league.attrition_report(&ctx).await.unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report[1].returning, 1);
        assert_eq!(report[1].retention_pct, Some(100.0));
    }

    #[tokio::test]
    async fn test_attrition_orders_backfilled_seasons_by_year() {
        let seeded = fixtures::seeded().await;
        let pool = &seeded.pool;
        let league = League::with_db_audit(pool.clone());
        let backfilled = fixtures::season(pool, "Fall", 2024, "complete").await;
        let ann = fixtures::user(pool, "ann@example.org", "Ann", "Lee", false).await;
        fixtures::signup(pool, backfilled, ann).await;
        fixtures::signup(pool, seeded.season_id, ann).await;

        let ctx = context_from_db(pool, seeded.admin_id).await;
        let labels: Vec<String> = league
            .attrition_report(&ctx)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.label)
            .collect();
        assert_eq!(labels, ["Fall 2024", "Spring 2025", "Fall 2025"]);

        let members = league.membership_list(&ctx).await.unwrap();
        assert!(!members[0].new_player);
    }

    #[tokio::test]
    async fn test_reports_are_staff_only() {
        let seeded = fixtures::seeded().await;
        let league = League::with_db_audit(seeded.pool.clone());
        let ann = fixtures::user(&seeded.pool, "ann@example.org", "Ann", "Lee", false).await;
        let ctx = context_from_db(&seeded.pool, ann).await;
        assert_eq!(league.attrition_report(&ctx).await.unwrap_err().status_code(), 403);
        assert_eq!(league.membership_list(&ctx).await.unwrap_err().status_code(), 403);
    }
}
