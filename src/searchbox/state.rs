//! View state of the search box

use crate::engines::{Engine, SearchDriver};
use crate::suggestion::Suggestion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which list the dropdown is showing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Trending terms, shown while the query is empty
    #[default]
    Hot,
    /// Autocomplete for the current query
    Suggestion,
}

/// Mutable state behind one search box
pub struct ViewState {
    pub query: String,
    pub engine: Engine,
    pub mode: DisplayMode,
    pub suggestions: Vec<Suggestion>,
    /// Last hot list fetched, reused while the query is cleared
    pub hottest: Option<Vec<Suggestion>>,
    /// Driver for `engine`
    pub driver: Arc<dyn SearchDriver>,
}

impl ViewState {
    pub fn new(engine: Engine, driver: Arc<dyn SearchDriver>) -> Self {
        Self {
            query: String::new(),
            engine,
            mode: DisplayMode::Hot,
            suggestions: Vec::new(),
            hottest: None,
            driver,
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            query: self.query.clone(),
            engine: self.engine,
            engines: Engine::ALL.to_vec(),
            mode: self.mode,
            suggestions: self.suggestions.clone(),
        }
    }
}

impl fmt::Debug for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewState")
            .field("query", &self.query)
            .field("engine", &self.engine)
            .field("mode", &self.mode)
            .field("suggestions", &self.suggestions.len())
            .field("hottest", &self.hottest.as_ref().map(Vec::len))
            .finish()
    }
}

/// What the view renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub query: String,
    pub engine: Engine,
    pub engines: Vec<Engine>,
    pub mode: DisplayMode,
    pub suggestions: Vec<Suggestion>,
}
