use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use leaguedesk_core::models::{Division, EvaluationInput, Week1Assignment, Week2Assignment};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::state::{AppState, Ctx};

#[derive(Debug, Deserialize)]
pub struct RosterBatch<T> {
    pub assignments: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluationBatch {
    pub evaluations: Vec<EvaluationInput>,
}

#[derive(Debug, Deserialize)]
pub struct CommissionerSet {
    pub user_ids: Vec<i64>,
}

pub async fn update_week1(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    ApiJson(batch): ApiJson<RosterBatch<Week1Assignment>>,
) -> ApiResult<Json<Value>> {
    let updated = state.league.update_week1_roster(&ctx, &batch.assignments).await?;
    Ok(Json(json!({ "updated": updated })))
}

pub async fn update_week2(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    ApiJson(batch): ApiJson<RosterBatch<Week2Assignment>>,
) -> ApiResult<Json<Value>> {
    let updated = state.league.update_week2_roster(&ctx, &batch.assignments).await?;
    Ok(Json(json!({ "updated": updated })))
}

pub async fn save_evaluations(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    ApiJson(batch): ApiJson<EvaluationBatch>,
) -> ApiResult<Json<Value>> {
    let saved = state.league.save_evaluations(&ctx, &batch.evaluations).await?;
    Ok(Json(json!({ "saved": saved })))
}

pub async fn divisions(State(state): State<AppState>, Ctx(ctx): Ctx) -> ApiResult<Json<Vec<Division>>> {
    ctx.require_draft_participant()?;
    let season = ctx.season()?;
    Ok(Json(state.league.list_divisions(season.id).await?))
}

pub async fn assign_commissioners(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    ApiPath(division_id): ApiPath<i64>,
    ApiJson(body): ApiJson<CommissionerSet>,
) -> ApiResult<StatusCode> {
    state
        .league
        .assign_commissioners(&ctx, division_id, &body.user_ids)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
