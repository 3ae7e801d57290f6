use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use leaguedesk_core::models::{DraftPickInput, DraftPickView, DraftTeam, Team};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::state::{AppState, Ctx};

#[derive(Debug, Deserialize)]
pub struct CaptainChoice {
    /// `null` clears the captain.
    pub user_id: Option<i64>,
}

pub async fn board(State(state): State<AppState>, Ctx(ctx): Ctx) -> ApiResult<Json<Vec<DraftTeam>>> {
    ctx.require_draft_participant()?;
    let season = ctx.season()?;
    Ok(Json(state.league.draft_board(season.id).await?))
}

pub async fn teams(State(state): State<AppState>, Ctx(ctx): Ctx) -> ApiResult<Json<Vec<Team>>> {
    ctx.require_draft_participant()?;
    let season = ctx.season()?;
    Ok(Json(state.league.list_teams(season.id).await?))
}

pub async fn record_pick(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    ApiJson(pick): ApiJson<DraftPickInput>,
) -> ApiResult<(StatusCode, Json<DraftPickView>)> {
    let view = state.league.record_draft_pick(&ctx, pick).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn assign_captain(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    ApiPath(team_id): ApiPath<i64>,
    ApiJson(choice): ApiJson<CaptainChoice>,
) -> ApiResult<StatusCode> {
    state.league.assign_captain(&ctx, team_id, choice.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
