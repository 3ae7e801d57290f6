//! In-memory caching of slowly-changing configuration.
//!
//! The current season is read on every request; `SeasonCache` serves it
//! from memory for a configurable interval and is invalidated when an
//! admin changes the season.

pub mod manager;

pub use manager::{load_current_season, CachedData, SeasonCache};
