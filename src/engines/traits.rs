//! Driver traits and fetch types

use super::kind::Engine;
use crate::suggestion::Suggestion;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Error produced by a driver fetch
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The engine answered with a non-2xx status
    #[error("{engine} responded with HTTP {status}")]
    Status { engine: Engine, status: u16 },

    /// The body could not be decoded
    #[error("invalid response from {engine}: {message}")]
    Parse { engine: Engine, message: String },
}

impl FetchError {
    pub fn parse(engine: Engine, message: impl fmt::Display) -> Self {
        FetchError::Parse {
            engine,
            message: message.to_string(),
        }
    }
}

/// Which of the two driver operations a fetch was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchKind {
    Hottest,
    Suggest,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKind::Hottest => f.write_str("hottest"),
            FetchKind::Suggest => f.write_str("suggest"),
        }
    }
}

/// Outcome of a single fetch, published after it settles
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    Completed {
        engine: Engine,
        kind: FetchKind,
        count: usize,
    },
    Failed {
        engine: Engine,
        kind: FetchKind,
        error: String,
    },
}

impl FetchEvent {
    pub fn engine(&self) -> Engine {
        match self {
            FetchEvent::Completed { engine, .. } | FetchEvent::Failed { engine, .. } => *engine,
        }
    }

    pub fn kind(&self) -> FetchKind {
        match self {
            FetchEvent::Completed { kind, .. } | FetchEvent::Failed { kind, .. } => *kind,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, FetchEvent::Failed { .. })
    }
}

/// A per-engine source of hot terms and autocomplete suggestions.
///
/// Each call is single-shot: it resolves once with a full list or fails.
#[async_trait]
pub trait SearchDriver: Send + Sync {
    /// Engine this driver talks to
    fn engine(&self) -> Engine;

    /// Fetch the engine's trending search terms
    async fn hottest(&self) -> Result<Vec<Suggestion>, FetchError>;

    /// Fetch autocomplete suggestions for a free-text query
    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, FetchError>;
}

/// Resolves the active driver for an engine
pub trait DriverProvider: Send + Sync {
    /// Resolution is total: every [`Engine`] has a driver.
    fn driver(&self, engine: Engine) -> Arc<dyn SearchDriver>;
}
