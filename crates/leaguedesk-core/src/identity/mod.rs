//! Identity lookup.
//!
//! Authentication itself lives in an external auth service. This module
//! only answers "who is making this request":
//! - `SessionResolver`: the seam the HTTP layer calls with the request cookie
//! - `AuthServiceClient`: the production resolver, over HTTP
//! - `AuthSession`: the resolved user and session expiry

pub mod client;
pub mod error;
pub mod session;

use async_trait::async_trait;

pub use client::AuthServiceClient;
pub use error::IdentityError;
pub use session::{AuthSession, SessionUser};

#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// Resolve the session for a raw `Cookie` header value.
    /// `Ok(None)` means the caller is not signed in.
    async fn resolve(&self, cookie: Option<&str>) -> Result<Option<AuthSession>, IdentityError>;
}
