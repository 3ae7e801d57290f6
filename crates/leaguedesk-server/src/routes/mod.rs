//! HTTP routes.
//!
//! Handlers are thin: extract the request context, call the matching
//! `League` operation, shape the response. Authorization happens in the
//! core crate's guards.

mod draft;
mod players;
mod registration;
mod reports;
mod roster;
mod tryouts;

use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/signup", post(registration::signup))
        .route("/api/admin/tryouts/week1.pdf", get(tryouts::week1_pdf))
        .route("/api/admin/tryouts/week2.pdf", get(tryouts::week2_pdf))
        .route("/api/admin/tryouts/week1", put(roster::update_week1))
        .route("/api/admin/tryouts/week2", put(roster::update_week2))
        .route("/api/admin/evaluations", post(roster::save_evaluations))
        .route("/api/admin/divisions", get(roster::divisions))
        .route(
            "/api/admin/divisions/{id}/commissioners",
            put(roster::assign_commissioners),
        )
        .route("/api/admin/teams", get(draft::teams))
        .route("/api/admin/teams/{id}/captain", put(draft::assign_captain))
        .route("/api/admin/draft", get(draft::board))
        .route("/api/admin/draft/picks", post(draft::record_pick))
        .route("/api/admin/signups", get(registration::signups))
        .route("/api/admin/waitlist", get(registration::waitlist))
        .route("/api/admin/waitlist/{id}/approve", post(registration::approve))
        .route("/api/admin/waitlist/{id}/reject", post(registration::reject))
        .route("/api/admin/season/phase", put(registration::set_phase))
        .route("/api/admin/players/{id}", patch(players::update))
        .route("/api/admin/reports/attrition", get(reports::attrition))
        .route("/api/admin/reports/membership", get(reports::membership))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
