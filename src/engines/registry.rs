//! Engine to driver mapping

use super::kind::Engine;
use super::traits::{DriverProvider, SearchDriver};
use crate::config::ConfigError;
use std::fmt;
use std::sync::Arc;

/// Registry holding exactly one driver per [`Engine`]
#[derive(Clone)]
pub struct DriverRegistry {
    /// Indexed by [`Engine::index`]
    drivers: Vec<Arc<dyn SearchDriver>>,
}

impl DriverRegistry {
    /// Build a registry, failing if any engine is left without a driver.
    ///
    /// When several drivers claim the same engine the last one wins.
    pub fn new(drivers: Vec<Arc<dyn SearchDriver>>) -> Result<Self, ConfigError> {
        let mut slots: Vec<Option<Arc<dyn SearchDriver>>> = vec![None; Engine::COUNT];

        for driver in drivers {
            let engine = driver.engine();
            slots[engine.index()] = Some(driver);
        }

        let missing: Vec<Engine> = Engine::ALL
            .iter()
            .filter(|engine| slots[engine.index()].is_none())
            .copied()
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingDriver(missing));
        }

        Ok(Self {
            drivers: slots.into_iter().flatten().collect(),
        })
    }

    /// Get the driver for an engine
    pub fn get(&self, engine: Engine) -> &Arc<dyn SearchDriver> {
        &self.drivers[engine.index()]
    }

    /// Number of registered drivers
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.drivers.iter().map(|d| d.engine()))
            .finish()
    }
}

impl DriverProvider for DriverRegistry {
    fn driver(&self, engine: Engine) -> Arc<dyn SearchDriver> {
        self.get(engine).clone()
    }
}
