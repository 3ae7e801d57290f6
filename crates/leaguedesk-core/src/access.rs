//! Role-based access control.
//!
//! Roles are looked up once per request into a [`RequestContext`], which
//! every operation receives explicitly. Guards fail with `Forbidden`
//! before any data is touched.

use std::collections::BTreeSet;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::cache::SeasonCache;
use crate::error::{LeagueError, Result};
use crate::identity::SessionResolver;
use crate::models::{AccountRole, Player, SeasonConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Director,
    Commissioner,
    Captain,
}

/// Everything the caller is allowed to act as in the current season.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RoleSet {
    pub admin: bool,
    pub director: bool,
    /// Divisions the caller commissions
    pub commissioner_of: BTreeSet<i64>,
    /// Teams the caller captains
    pub captain_of: BTreeSet<i64>,
}

impl RoleSet {
    pub fn roles(&self) -> Vec<Role> {
        let mut roles = Vec::new();
        if self.admin {
            roles.push(Role::Admin);
        }
        if self.director {
            roles.push(Role::Director);
        }
        if !self.commissioner_of.is_empty() {
            roles.push(Role::Commissioner);
        }
        if !self.captain_of.is_empty() {
            roles.push(Role::Captain);
        }
        roles
    }

    /// Admins and directors run the league.
    pub fn is_staff(&self) -> bool {
        self.admin || self.director
    }
}

/// Single role lookup shared by every operation.
pub async fn load_roles(
    pool: &SqlitePool,
    user: &Player,
    season: Option<&SeasonConfig>,
) -> Result<RoleSet> {
    let account = user.account_role();
    let mut roles = RoleSet {
        admin: account == AccountRole::Admin,
        director: account == AccountRole::Director,
        ..RoleSet::default()
    };

    let Some(season) = season else {
        return Ok(roles);
    };

    let (divisions, teams) = futures::try_join!(
        sqlx::query_scalar::<_, i64>(
            "SELECT division_id FROM commissioners WHERE season_id = ? AND user_id = ?",
        )
        .bind(season.id)
        .bind(user.id)
        .fetch_all(pool),
        sqlx::query_scalar::<_, i64>("SELECT id FROM teams WHERE season_id = ? AND captain_id = ?")
            .bind(season.id)
            .bind(user.id)
            .fetch_all(pool),
    )?;

    roles.commissioner_of = divisions.into_iter().collect();
    roles.captain_of = teams.into_iter().collect();
    Ok(roles)
}

pub(crate) async fn find_player_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Player>> {
    let player = sqlx::query_as::<_, Player>(
        "SELECT id, email, first_name, last_name, preferred_name, male, height_inches,
                skill_setter, skill_hitter, skill_other, picture, role
         FROM users WHERE lower(email) = lower(?)",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(player)
}

/// Who is calling, what they may do, and which season they are acting in.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user: Option<Player>,
    pub roles: RoleSet,
    pub season: Option<SeasonConfig>,
}

impl RequestContext {
    /// Resolve the caller from the request cookie and load their roles.
    pub async fn resolve(
        pool: &SqlitePool,
        sessions: &dyn SessionResolver,
        seasons: &SeasonCache,
        cookie: Option<&str>,
    ) -> Result<Self> {
        let season = seasons.current(pool).await?;

        let Some(session) = sessions.resolve(cookie).await? else {
            return Ok(Self {
                season,
                ..Self::default()
            });
        };

        let Some(user) = find_player_by_email(pool, &session.user.email).await? else {
            debug!(email = %session.user.email, "Signed-in user has no league record");
            return Ok(Self {
                season,
                ..Self::default()
            });
        };

        let roles = load_roles(pool, &user, season.as_ref()).await?;
        Ok(Self {
            user: Some(user),
            roles,
            season,
        })
    }

    pub fn user(&self) -> Result<&Player> {
        self.user.as_ref().ok_or(LeagueError::Unauthorized)
    }

    pub fn season(&self) -> Result<&SeasonConfig> {
        self.season.as_ref().ok_or(LeagueError::NoSeason)
    }

    pub fn require_admin(&self) -> Result<&Player> {
        let user = self.user()?;
        if self.roles.admin {
            Ok(user)
        } else {
            Err(LeagueError::forbidden("admins only"))
        }
    }

    /// Admin or director.
    pub fn require_staff(&self) -> Result<&Player> {
        let user = self.user()?;
        if self.roles.is_staff() {
            Ok(user)
        } else {
            Err(LeagueError::forbidden("league staff only"))
        }
    }

    /// Staff, or a commissioner of any division this season.
    pub fn require_evaluator(&self) -> Result<&Player> {
        let user = self.user()?;
        if self.roles.is_staff() || !self.roles.commissioner_of.is_empty() {
            Ok(user)
        } else {
            Err(LeagueError::forbidden("staff and commissioners only"))
        }
    }

    /// Anyone with a hand in the draft: staff, commissioners, captains.
    pub fn require_draft_participant(&self) -> Result<&Player> {
        let user = self.user()?;
        if !self.roles.roles().is_empty() {
            Ok(user)
        } else {
            Err(LeagueError::forbidden("draft participants only"))
        }
    }

    /// Staff, or a commissioner of this division.
    pub fn require_commissioner_of(&self, division_id: i64) -> Result<&Player> {
        let user = self.user()?;
        if self.roles.is_staff() || self.roles.commissioner_of.contains(&division_id) {
            Ok(user)
        } else {
            Err(LeagueError::forbidden("not a commissioner of this division"))
        }
    }

    /// Staff, the division's commissioner, or the team's captain.
    pub fn require_captain_of(&self, team_id: i64, division_id: i64) -> Result<&Player> {
        let user = self.user()?;
        if self.roles.is_staff()
            || self.roles.commissioner_of.contains(&division_id)
            || self.roles.captain_of.contains(&team_id)
        {
            Ok(user)
        } else {
            Err(LeagueError::forbidden("not the captain of this team"))
        }
    }

    /// Admin, or the player editing their own record.
    pub fn require_self_or_admin(&self, user_id: i64) -> Result<&Player> {
        let user = self.user()?;
        if self.roles.admin || user.id == user_id {
            Ok(user)
        } else {
            Err(LeagueError::forbidden("you may only edit your own record"))
        }
    }
}

#[cfg(test)]
pub(crate) fn context_for(user: Player, roles: RoleSet, season: Option<SeasonConfig>) -> RequestContext {
    RequestContext {
        user: Some(user),
        roles,
        season,
    }
}

#[cfg(test)]
pub(crate) async fn context_from_db(pool: &SqlitePool, user_id: i64) -> RequestContext {
    let user = sqlx::query_as::<_, Player>(
        "SELECT id, email, first_name, last_name, preferred_name, male, height_inches,
                skill_setter, skill_hitter, skill_other, picture, role
         FROM users WHERE id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .unwrap();
    let season = crate::cache::load_current_season(pool).await.unwrap();
    let roles = load_roles(pool, &user, season.as_ref()).await.unwrap();
    context_for(user, roles, season)
}
