//! HTTP surface for leaguedesk.
//!
//! - `routes`: the axum router and thin handlers over `leaguedesk_core::League`
//! - `state`: shared state and the `Ctx` request-context extractor
//! - `error`: `LeagueError` to JSON response mapping
//! - `extract`: JSON body and path extractors with JSON rejections
//! - `telemetry`: tracing subscriber setup

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use routes::router;
pub use state::{AppState, Ctx};
