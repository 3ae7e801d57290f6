use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in user as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A resolved session. The auth service owns its lifetime; we only
/// refuse ones that have already expired.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_at: DateTime<Utc>) -> AuthSession {
        AuthSession {
            user: SessionUser {
                id: "u_1".to_string(),
                email: "ann@example.org".to_string(),
                name: None,
            },
            expires_at,
        }
    }

    #[test]
    fn test_expiry() {
        assert!(!session(Utc::now() + Duration::minutes(30)).is_expired());
        assert!(session(Utc::now() - Duration::minutes(1)).is_expired());
    }
}
