//! SearchBox-RS: hot list and autocomplete search box for video search engines
//!
//! The search box shows an engine's trending terms while the query is empty
//! and autocomplete suggestions once the user types, and can hand the query
//! off to the engine's full results page.

pub mod broadcast;
pub mod config;
pub mod engines;
pub mod metrics;
pub mod network;
pub mod searchbox;
pub mod suggestion;
pub mod web;

pub use config::Settings;
pub use engines::{Engine, SearchDriver};
pub use searchbox::{DisplayMode, SearchBox};
pub use suggestion::Suggestion;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Quiet period before typed input is dispatched, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
