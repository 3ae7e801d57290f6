//! Client for the external auth service.
//!
//! Sessions are owned by the auth service; we forward the caller's
//! cookie to its session endpoint and read back who they are.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{AuthSession, IdentityError, SessionResolver, SessionUser};

// ============================================================================
// Constants
// ============================================================================

/// Session lookup path on the auth service
const GET_SESSION_PATH: &str = "/api/auth/get-session";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionEnvelope {
    session: SessionInfo,
    user: SessionUser,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionInfo {
    expires_at: DateTime<Utc>,
}

/// Session resolver backed by the auth service's HTTP API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthServiceClient {
    client: Client,
    base_url: String,
}

impl AuthServiceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn session_url(&self) -> String {
        format!("{}{}", self.base_url, GET_SESSION_PATH)
    }

    /// Parse the session endpoint body. The service answers `null` when
    /// the cookie does not belong to a live session.
    fn parse_session_body(body: &str) -> Result<Option<AuthSession>, IdentityError> {
        let envelope: Option<SessionEnvelope> = serde_json::from_str(body)
            .map_err(|e| IdentityError::InvalidResponse(format!("session body: {}", e)))?;

        Ok(envelope.map(|e| AuthSession {
            user: e.user,
            expires_at: e.session.expires_at,
        }))
    }
}

#[async_trait]
impl SessionResolver for AuthServiceClient {
    async fn resolve(&self, cookie: Option<&str>) -> Result<Option<AuthSession>, IdentityError> {
        let Some(cookie) = cookie.filter(|c| !c.trim().is_empty()) else {
            return Ok(None);
        };

        let response = self
            .client
            .get(self.session_url())
            .header(header::COOKIE, cookie)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            debug!("Auth service rejected session cookie");
            return Ok(None);
        }

        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = %status, "Session lookup failed");
            return Err(IdentityError::from_status(status, &body));
        }

        let session = Self::parse_session_body(&body)?;
        match session {
            Some(s) if s.is_expired() => {
                debug!(email = %s.user.email, "Ignoring expired session");
                Ok(None)
            }
            other => Ok(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_body() {
        let json = r#"{
            "session": {"id": "s_1", "expiresAt": "2030-01-01T00:00:00.000Z", "token": "abc"},
            "user": {"id": "u_42", "email": "ann@example.org", "name": "Ann Lee", "emailVerified": true}
        }"#;

        let session = AuthServiceClient::parse_session_body(json)
            .expect("Failed to parse session test JSON")
            .expect("Session should be present");
        assert_eq!(session.user.id, "u_42");
        assert_eq!(session.user.email, "ann@example.org");
        assert_eq!(session.user.name.as_deref(), Some("Ann Lee"));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_parse_null_session() {
        assert!(AuthServiceClient::parse_session_body("null").unwrap().is_none());
    }

    #[test]
    fn test_parse_garbage_is_invalid_response() {
        let err = AuthServiceClient::parse_session_body("<html>").unwrap_err();
        assert!(matches!(err, IdentityError::InvalidResponse(_)));
    }

    #[test]
    fn test_session_url_strips_trailing_slash() {
        let client = AuthServiceClient::new("https://auth.example.org/").unwrap();
        assert_eq!(client.session_url(), "https://auth.example.org/api/auth/get-session");
    }

    #[tokio::test]
    async fn test_missing_cookie_resolves_to_none() {
        let client = AuthServiceClient::new("http://127.0.0.1:9").unwrap();
        assert!(client.resolve(None).await.unwrap().is_none());
        assert!(client.resolve(Some("  ")).await.unwrap().is_none());
    }
}
