//! Opening the engine's full results page

use crate::config::{ConfigError, Settings};
use crate::engines::Engine;
use anyhow::Result;
use std::collections::HashMap;
use tracing::debug;

/// Per-engine results page prefixes
#[derive(Debug, Clone)]
pub struct SearchPages {
    /// Indexed by [`Engine::index`]
    prefixes: Vec<String>,
    encode_query: bool,
}

impl SearchPages {
    /// Build the table, failing if any engine has no prefix
    pub fn new(prefixes: HashMap<Engine, String>) -> Result<Self, ConfigError> {
        let missing: Vec<Engine> = Engine::ALL
            .iter()
            .filter(|e| !prefixes.contains_key(*e))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingEngine(missing));
        }

        let mut prefixes = prefixes;
        Ok(Self {
            prefixes: Engine::ALL
                .iter()
                .filter_map(|e| prefixes.remove(e))
                .collect(),
            encode_query: false,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let prefixes = settings
            .engines
            .iter()
            .map(|c| (c.engine, c.search_page_url.clone()))
            .collect();

        Ok(Self::new(prefixes)?.with_encoding(settings.search_pages.encode_query))
    }

    /// Percent-encode queries before appending them
    pub fn with_encoding(mut self, encode_query: bool) -> Self {
        self.encode_query = encode_query;
        self
    }

    pub fn prefix(&self, engine: Engine) -> &str {
        &self.prefixes[engine.index()]
    }

    /// Prefix followed by the query, raw unless encoding was enabled
    pub fn url_for(&self, engine: Engine, query: &str) -> String {
        if self.encode_query {
            format!("{}{}", self.prefix(engine), urlencoding::encode(query))
        } else {
            format!("{}{}", self.prefix(engine), query)
        }
    }
}

impl Default for SearchPages {
    fn default() -> Self {
        Self {
            prefixes: Engine::ALL
                .iter()
                .map(|e| crate::config::EngineConfig::builtin(*e).search_page_url)
                .collect(),
            encode_query: false,
        }
    }
}

/// A browsing context opened for a results page
pub trait BrowsingContext: Send {
    /// Drop the new context's reference back to whoever opened it
    fn sever_opener(&mut self);
}

/// Opens URLs in new browsing contexts
pub trait BrowsingContextOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<Box<dyn BrowsingContext>>;
}

/// Opens pages in the desktop's default browser
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

/// Browser process launched by [`SystemBrowser`]
#[derive(Debug)]
pub struct DetachedBrowser {
    url: String,
}

impl BrowsingContext for DetachedBrowser {
    fn sever_opener(&mut self) {
        // A separate process never holds a handle to us.
        debug!(url = %self.url, "detached browser has no opener");
    }
}

impl BrowsingContextOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<Box<dyn BrowsingContext>> {
        open::that_detached(url)?;
        Ok(Box::new(DetachedBrowser {
            url: url.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_concatenation() {
        let pages = SearchPages::default();
        assert_eq!(
            pages.url_for(Engine::Youku, "avengers"),
            "http://so.youku.com/search_video/q_avengers"
        );
        assert_eq!(
            pages.url_for(Engine::Tencent, "a&b c"),
            "https://v.qq.com/x/search/?q=a&b c"
        );
    }

    #[test]
    fn test_encoding_opt_in() {
        let pages = SearchPages::default().with_encoding(true);
        assert_eq!(
            pages.url_for(Engine::Tencent, "a&b c"),
            "https://v.qq.com/x/search/?q=a%26b%20c"
        );
    }

    #[test]
    fn test_missing_prefix_rejected() {
        let prefixes = HashMap::from([(Engine::Youku, "http://y/".to_string())]);
        assert!(matches!(
            SearchPages::new(prefixes),
            Err(ConfigError::MissingEngine(m)) if m == vec![Engine::Tencent]
        ));
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.search_pages.encode_query = true;
        settings.engines[1].search_page_url = "https://example.com/?q=".to_string();

        let pages = SearchPages::from_settings(&settings).unwrap();
        assert_eq!(pages.prefix(Engine::Tencent), "https://example.com/?q=");
        assert_eq!(pages.url_for(Engine::Tencent, "x y"), "https://example.com/?q=x%20y");
    }
}
