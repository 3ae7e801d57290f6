//! Signup, waitlist and season phase.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use leaguedesk_core::models::{SeasonPhase, SignupOutcome, SignupRequest, SignupSummary, WaitlistEntry};

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::state::{AppState, Ctx};

#[derive(Debug, Deserialize)]
pub struct PhaseChange {
    pub phase: SeasonPhase,
}

pub async fn signup(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    ApiJson(request): ApiJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupOutcome>)> {
    let outcome = state.league.create_signup(&ctx, &request).await?;
    let status = match outcome {
        SignupOutcome::Registered(_) => StatusCode::CREATED,
        SignupOutcome::Waitlisted(_) => StatusCode::ACCEPTED,
    };
    Ok((status, Json(outcome)))
}

pub async fn signups(State(state): State<AppState>, Ctx(ctx): Ctx) -> ApiResult<Json<Vec<SignupSummary>>> {
    ctx.require_evaluator()?;
    let season = ctx.season()?;
    Ok(Json(state.league.list_signups(season.id).await?))
}

pub async fn waitlist(State(state): State<AppState>, Ctx(ctx): Ctx) -> ApiResult<Json<Vec<WaitlistEntry>>> {
    ctx.require_staff()?;
    let season = ctx.season()?;
    Ok(Json(state.league.list_waitlist(season.id).await?))
}

pub async fn approve(State(state): State<AppState>, Ctx(ctx): Ctx, ApiPath(id): ApiPath<i64>) -> ApiResult<StatusCode> {
    state.league.decide_waitlist(&ctx, id, true).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn reject(State(state): State<AppState>, Ctx(ctx): Ctx, ApiPath(id): ApiPath<i64>) -> ApiResult<StatusCode> {
    state.league.decide_waitlist(&ctx, id, false).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_phase(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    ApiJson(change): ApiJson<PhaseChange>,
) -> ApiResult<StatusCode> {
    state.league.set_season_phase(&ctx, change.phase).await?;
    state.seasons.invalidate().await;
    Ok(StatusCode::NO_CONTENT)
}
