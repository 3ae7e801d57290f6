use tracing::info;

use crate::access::RequestContext;
use crate::audit::AuditEvent;
use crate::error::{LeagueError, Result};
use crate::models::{Player, PlayerUpdate};
use crate::League;

pub const MIN_HEIGHT_INCHES: i64 = 48;
pub const MAX_HEIGHT_INCHES: i64 = 96;

const PICTURE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// A picture must be stored as `<user_id>.<ext>`.
fn validate_picture(user_id: i64, picture: &str) -> Result<()> {
    let valid = picture
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| {
            stem == user_id.to_string() && PICTURE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        });
    if valid {
        Ok(())
    } else {
        Err(LeagueError::validation(format!(
            "picture must be named {}.jpg, .jpeg, .png or .webp",
            user_id
        )))
    }
}

fn validate_update(user_id: i64, update: &PlayerUpdate) -> Result<()> {
    if let Some(height) = update.height_inches {
        if !(MIN_HEIGHT_INCHES..=MAX_HEIGHT_INCHES).contains(&height) {
            return Err(LeagueError::validation(format!(
                "height must be between {} and {} inches",
                MIN_HEIGHT_INCHES, MAX_HEIGHT_INCHES
            )));
        }
    }
    for (field, value) in [("first name", &update.first_name), ("last name", &update.last_name)] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(LeagueError::validation(format!("{} cannot be empty", field)));
        }
    }
    if let Some(picture) = update.picture.as_deref().filter(|p| !p.is_empty()) {
        validate_picture(user_id, picture)?;
    }
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl League {
    pub async fn find_player(&self, user_id: i64) -> Result<Player> {
        sqlx::query_as::<_, Player>(
            "SELECT id, email, first_name, last_name, preferred_name, male, height_inches,
                    skill_setter, skill_hitter, skill_other, picture, role
             FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| LeagueError::not_found(format!("player {} not found", user_id)))
    }

    /// Apply a partial edit to a player record.
    pub async fn update_player(&self, ctx: &RequestContext, user_id: i64, update: &PlayerUpdate) -> Result<Player> {
        let user = ctx.require_self_or_admin(user_id)?;
        validate_update(user_id, update)?;

        let mut player = self.find_player(user_id).await?;
        if let Some(first) = &update.first_name {
            player.first_name = first.trim().to_string();
        }
        if let Some(last) = &update.last_name {
            player.last_name = last.trim().to_string();
        }
        if let Some(preferred) = &update.preferred_name {
            player.preferred_name = non_empty(preferred);
        }
        if let Some(picture) = &update.picture {
            player.picture = non_empty(picture);
        }
        player.male = update.male.unwrap_or(player.male);
        player.height_inches = update.height_inches.or(player.height_inches);
        player.skill_setter = update.skill_setter.unwrap_or(player.skill_setter);
        player.skill_hitter = update.skill_hitter.unwrap_or(player.skill_hitter);
        player.skill_other = update.skill_other.unwrap_or(player.skill_other);

        let mut tx = self.pool().begin().await?;
        sqlx::query(
            "UPDATE users SET first_name = ?, last_name = ?, preferred_name = ?, male = ?,
                 height_inches = ?, skill_setter = ?, skill_hitter = ?, skill_other = ?, picture = ?
             WHERE id = ?",
        )
        .bind(&player.first_name)
        .bind(&player.last_name)
        .bind(&player.preferred_name)
        .bind(player.male)
        .bind(player.height_inches)
        .bind(player.skill_setter)
        .bind(player.skill_hitter)
        .bind(player.skill_other)
        .bind(&player.picture)
        .bind(player.id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        info!(user_id, editor = user.id, "Updated player");
        self.audit(AuditEvent::new(user.id, "player.update", format!("user {}", user_id)));
        Ok(player)
    }
}
