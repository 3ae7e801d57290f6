use axum::extract::State;
use axum::Json;

use leaguedesk_core::models::{Player, PlayerUpdate};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::state::{AppState, Ctx};

pub async fn update(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(update): ApiJson<PlayerUpdate>,
) -> ApiResult<Json<Player>> {
    let player = state.league.update_player(&ctx, user_id, &update).await?;
    Ok(Json(player))
}
