use thiserror::Error;

use crate::identity::IdentityError;

/// Message returned to callers for anything that is not their fault.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("You must be signed in")]
    Unauthorized,

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("No current season is configured")]
    NoSeason,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Identity service error: {0}")]
    Identity(#[from] IdentityError),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

impl LeagueError {
    pub fn forbidden(action: impl Into<String>) -> Self {
        LeagueError::Forbidden(action.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        LeagueError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        LeagueError::NotFound(message.into())
    }

    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> u16 {
        match self {
            LeagueError::Unauthorized => 401,
            LeagueError::Forbidden(_) => 403,
            LeagueError::NotFound(_) => 404,
            LeagueError::NoSeason | LeagueError::Validation(_) => 400,
            LeagueError::Database(_) | LeagueError::Identity(_) | LeagueError::Pdf(_) => 500,
        }
    }

    /// True for errors caused by the caller rather than by the service.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Message safe to show the caller. Internal failures are never echoed.
    pub fn public_message(&self) -> String {
        if self.is_client_error() {
            self.to_string()
        } else {
            GENERIC_FAILURE_MESSAGE.to_string()
        }
    }
}

pub type Result<T> = std::result::Result<T, LeagueError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(LeagueError::Unauthorized.status_code(), 401);
        assert_eq!(LeagueError::forbidden("admins only").status_code(), 403);
        assert_eq!(LeagueError::not_found("no roster").status_code(), 404);
        assert_eq!(LeagueError::NoSeason.status_code(), 400);
        assert_eq!(LeagueError::validation("duplicate").status_code(), 400);
        assert_eq!(LeagueError::Pdf("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_public_message_hides_internal_errors() {
        let err = LeagueError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.public_message(), GENERIC_FAILURE_MESSAGE);

        let err = LeagueError::validation("Player 4 is assigned more than once");
        assert_eq!(err.public_message(), "Player 4 is assigned more than once");
    }
}
