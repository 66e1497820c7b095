//! Driver loader for initializing engine drivers from configuration

use super::kind::Engine;
use super::registry::DriverRegistry;
use super::tencent::Tencent;
use super::traits::SearchDriver;
use super::youku::Youku;
use crate::config::{ConfigError, EngineConfig, Settings};
use crate::network::HttpClient;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Loader for initializing drivers from configuration
pub struct DriverLoader;

impl DriverLoader {
    /// Build one driver per engine, failing if any engine is unconfigured
    pub fn load(settings: &Settings, client: &HttpClient) -> Result<DriverRegistry> {
        let mut drivers = Vec::with_capacity(Engine::COUNT);

        for engine in Engine::ALL {
            let config = settings
                .get_engine(engine)
                .ok_or_else(|| ConfigError::MissingEngine(vec![engine]))?;

            drivers.push(Self::create_driver(config, client.clone()));
            info!(
                "Loaded driver: {} (suggest: {}, hottest: {})",
                engine, config.suggest_url, config.hottest_url
            );
        }

        let registry = DriverRegistry::new(drivers)?;
        info!("Loaded {} drivers", registry.len());
        Ok(registry)
    }

    /// Create a driver instance for a configured engine
    fn create_driver(config: &EngineConfig, client: HttpClient) -> Arc<dyn SearchDriver> {
        match config.engine {
            Engine::Youku => Arc::new(Youku::new(client, config)),
            Engine::Tencent => Arc::new(Tencent::new(client, config)),
        }
    }
}
