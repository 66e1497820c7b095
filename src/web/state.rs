//! Application state shared across handlers

use crate::broadcast::SuggestionService;
use crate::config::Settings;
use crate::searchbox::SearchBox;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// The search box served by this instance
    pub search_box: Arc<SearchBox>,
    /// Shared query streams the search box listens to
    pub service: Arc<SuggestionService>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        settings: Settings,
        search_box: Arc<SearchBox>,
        service: Arc<SuggestionService>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            settings: Arc::new(settings),
            search_box,
            service,
            templates: Arc::new(super::Templates::new()?),
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
