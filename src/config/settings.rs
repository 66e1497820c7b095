//! Settings structures for SearchBox-RS configuration

use crate::engines::Engine;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// Error raised when settings or driver wiring are incomplete
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no engine configuration for: {}", join_engines(.0))]
    MissingEngine(Vec<Engine>),

    #[error("no driver registered for: {}", join_engines(.0))]
    MissingDriver(Vec<Engine>),

    #[error("invalid {field} for {engine}: {reason}")]
    InvalidUrl {
        engine: Engine,
        field: &'static str,
        reason: String,
    },

    #[error("debounce_ms must be greater than zero")]
    ZeroDebounce,
}

fn join_engines(engines: &[Engine]) -> String {
    engines
        .iter()
        .map(|e| e.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub search_box: SearchBoxSettings,
    pub search_pages: SearchPageSettings,
    pub outgoing: OutgoingSettings,
    pub engines: Vec<EngineConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            search_box: SearchBoxSettings::default(),
            search_pages: SearchPageSettings::default(),
            outgoing: OutgoingSettings::default(),
            engines: default_engines(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (SEARCHBOX_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("SEARCHBOX_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("SEARCHBOX_LOG_LEVEL") {
            self.general.log_level = val;
        }
        if let Ok(val) = std::env::var("SEARCHBOX_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("SEARCHBOX_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("SEARCHBOX_DEFAULT_ENGINE") {
            if let Ok(engine) = val.parse() {
                self.search_box.default_engine = engine;
            }
        }
        if let Ok(val) = std::env::var("SEARCHBOX_DEBOUNCE_MS") {
            if let Ok(ms) = val.parse() {
                self.search_box.debounce_ms = ms;
            }
        }
    }

    /// Get engine config
    pub fn get_engine(&self, engine: Engine) -> Option<&EngineConfig> {
        self.engines.iter().find(|e| e.engine == engine)
    }

    /// Check that every engine is configured with usable URLs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_box.debounce_ms == 0 {
            return Err(ConfigError::ZeroDebounce);
        }

        let missing: Vec<Engine> = Engine::ALL
            .iter()
            .filter(|engine| self.get_engine(**engine).is_none())
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingEngine(missing));
        }

        for config in &self.engines {
            config.validate()?;
        }

        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug mode
    pub debug: bool,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
    /// Instance name displayed in UI
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
            instance_name: "SearchBox".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8890,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Search box behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchBoxSettings {
    /// Engine selected when the box is created
    pub default_engine: Engine,
    /// Quiet period before typed input is dispatched
    pub debounce_ms: u64,
}

impl Default for SearchBoxSettings {
    fn default() -> Self {
        Self {
            default_engine: Engine::default(),
            debounce_ms: crate::DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Full results page navigation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPageSettings {
    /// Percent-encode the query before appending it to the page URL
    pub encode_query: bool,
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// User agent string (none = built-in desktop agent)
    pub user_agent: Option<String>,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            user_agent: None,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Per-engine endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine this entry configures
    pub engine: Engine,
    /// Prefix of the full results page; the query is appended verbatim
    pub search_page_url: String,
    /// Trending terms endpoint
    pub hottest_url: String,
    /// Autocomplete endpoint
    pub suggest_url: String,
    /// Custom timeout for this engine in seconds
    #[serde(default)]
    pub timeout: Option<f64>,
}

impl EngineConfig {
    /// Built-in endpoints for an engine
    pub fn builtin(engine: Engine) -> Self {
        match engine {
            Engine::Youku => Self {
                engine,
                search_page_url: "http://so.youku.com/search_video/q_".to_string(),
                hottest_url: "https://tip.soku.com/search_keywords".to_string(),
                suggest_url: "https://tip.soku.com/search_tip_1".to_string(),
                timeout: None,
            },
            Engine::Tencent => Self {
                engine,
                search_page_url: "https://v.qq.com/x/search/?q=".to_string(),
                hottest_url: "https://s.video.qq.com/hotword".to_string(),
                suggest_url: "https://s.video.qq.com/smartbox".to_string(),
                timeout: None,
            },
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("search_page_url", &self.search_page_url),
            ("hottest_url", &self.hottest_url),
            ("suggest_url", &self.suggest_url),
        ] {
            Url::parse(value).map_err(|e| ConfigError::InvalidUrl {
                engine: self.engine,
                field,
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

/// Default engine configurations
fn default_engines() -> Vec<EngineConfig> {
    Engine::ALL.iter().map(|e| EngineConfig::builtin(*e)).collect()
}
