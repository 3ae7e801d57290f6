//! Mapping from league errors to JSON HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use leaguedesk_core::LeagueError;

/// Error type returned by every handler. Renders as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub LeagueError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<LeagueError> for ApiError {
    fn from(err: LeagueError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "Request failed");
        } else if status == StatusCode::FORBIDDEN {
            warn!(error = %self.0, "Request refused");
        }
        (status, Json(json!({ "error": self.0.public_message() }))).into_response()
    }
}
