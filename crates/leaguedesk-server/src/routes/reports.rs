use axum::extract::State;
use axum::Json;

use leaguedesk_core::reports::{AttritionPoint, MembershipEntry};

use crate::error::ApiResult;
use crate::state::{AppState, Ctx};

pub async fn attrition(State(state): State<AppState>, Ctx(ctx): Ctx) -> ApiResult<Json<Vec<AttritionPoint>>> {
    Ok(Json(state.league.attrition_report(&ctx).await?))
}

pub async fn membership(State(state): State<AppState>, Ctx(ctx): Ctx) -> ApiResult<Json<Vec<MembershipEntry>>> {
    Ok(Json(state.league.membership_list(&ctx).await?))
}
