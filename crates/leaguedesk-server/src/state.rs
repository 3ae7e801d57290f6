//! Shared handler state and the per-request context extractor.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use leaguedesk_core::identity::SessionResolver;
use leaguedesk_core::{League, RequestContext, SeasonCache};

use crate::error::ApiError;

/// Everything a handler needs. Clone is cheap - all fields are shared.
#[derive(Clone)]
pub struct AppState {
    pub league: League,
    pub sessions: Arc<dyn SessionResolver>,
    pub seasons: Arc<SeasonCache>,
}

impl AppState {
    pub fn new(league: League, sessions: Arc<dyn SessionResolver>, seasons: Arc<SeasonCache>) -> Self {
        Self {
            league,
            sessions,
            seasons,
        }
    }
}

/// The caller's identity, roles and current season, resolved once from
/// the request's `Cookie` header.
pub struct Ctx(pub RequestContext);

impl FromRequestParts<AppState> for Ctx {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let cookie = parts
            .headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok());

        let ctx = RequestContext::resolve(
            state.league.pool(),
            state.sessions.as_ref(),
            &state.seasons,
            cookie,
        )
        .await?;
        Ok(Ctx(ctx))
    }
}
