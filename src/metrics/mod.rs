//! Metrics collection module
//!
//! Tracks driver fetch counts, failures and response times per engine.

use crate::engines::{Engine, FetchKind};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Number of response times kept per engine and fetch kind
const RESPONSE_WINDOW: usize = 100;

#[derive(Debug, Default)]
struct Counters {
    dispatched: u64,
    succeeded: u64,
    failed: u64,
    response_times: Vec<u64>,
}

/// Fetch metrics collector
pub struct FetchMetrics {
    /// Total fetches dispatched
    total_dispatched: AtomicU64,
    counters: RwLock<HashMap<(Engine, FetchKind), Counters>>,
}

impl FetchMetrics {
    pub fn new() -> Self {
        Self {
            total_dispatched: AtomicU64::new(0),
            counters: RwLock::new(HashMap::new()),
        }
    }

    fn update(&self, engine: Engine, kind: FetchKind, f: impl FnOnce(&mut Counters)) {
        let mut counters = self.counters.write().unwrap_or_else(PoisonError::into_inner);
        f(counters.entry((engine, kind)).or_default());
    }

    /// Record a fetch handed to a driver
    pub fn record_dispatch(&self, engine: Engine, kind: FetchKind) {
        self.total_dispatched.fetch_add(1, Ordering::Relaxed);
        self.update(engine, kind, |c| c.dispatched += 1);
    }

    /// Record a completed fetch and how long it took
    pub fn record_success(&self, engine: Engine, kind: FetchKind, elapsed: Duration) {
        self.update(engine, kind, |c| {
            c.succeeded += 1;
            if c.response_times.len() >= RESPONSE_WINDOW {
                c.response_times.remove(0);
            }
            c.response_times.push(elapsed.as_millis() as u64);
        });
    }

    /// Record a failed fetch
    pub fn record_failure(&self, engine: Engine, kind: FetchKind) {
        self.update(engine, kind, |c| c.failed += 1);
    }

    pub fn get_total_dispatched(&self) -> u64 {
        self.total_dispatched.load(Ordering::Relaxed)
    }

    /// Fetches of one kind dispatched to an engine
    pub fn get_dispatched(&self, engine: Engine, kind: FetchKind) -> u64 {
        self.counters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(engine, kind))
            .map(|c| c.dispatched)
            .unwrap_or(0)
    }

    /// Average response time in milliseconds
    pub fn get_avg_response_time(&self, engine: Engine, kind: FetchKind) -> Option<u64> {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        counters.get(&(engine, kind)).and_then(|c| {
            if c.response_times.is_empty() {
                None
            } else {
                Some(c.response_times.iter().sum::<u64>() / c.response_times.len() as u64)
            }
        })
    }

    /// Percentage of settled fetches for an engine that succeeded
    pub fn get_reliability(&self, engine: Engine) -> f64 {
        let counters = self.counters.read().unwrap_or_else(PoisonError::into_inner);
        let (ok, failed) = counters
            .iter()
            .filter(|((e, _), _)| *e == engine)
            .fold((0, 0), |(ok, failed), (_, c)| (ok + c.succeeded, failed + c.failed));

        let total = ok + failed;
        if total == 0 {
            100.0
        } else {
            (ok as f64 / total as f64) * 100.0
        }
    }

    /// Statistics for every engine, in [`Engine::ALL`] order
    pub fn get_engine_stats(&self) -> Vec<EngineStats> {
        Engine::ALL
            .iter()
            .map(|&engine| EngineStats {
                engine,
                hottest_fetches: self.get_dispatched(engine, FetchKind::Hottest),
                suggest_fetches: self.get_dispatched(engine, FetchKind::Suggest),
                avg_suggest_time: self.get_avg_response_time(engine, FetchKind::Suggest),
                reliability: self.get_reliability(engine),
            })
            .collect()
    }
}

impl Default for FetchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for a single engine
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub engine: Engine,
    pub hottest_fetches: u64,
    pub suggest_fetches: u64,
    pub avg_suggest_time: Option<u64>,
    pub reliability: f64,
}
