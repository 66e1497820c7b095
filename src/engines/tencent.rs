//! Tencent Video hot list and autocomplete driver

use super::json::{collect_terms, fetch_json};
use super::kind::Engine;
use super::traits::{FetchError, SearchDriver};
use crate::config::EngineConfig;
use crate::network::HttpClient;
use crate::suggestion::Suggestion;
use async_trait::async_trait;
use std::time::Duration;

/// Number of suggestions requested from smartbox
const SUGGEST_LIMIT: &str = "10";

/// Tencent Video driver backed by the s.video.qq.com endpoints
pub struct Tencent {
    client: HttpClient,
    hottest_url: String,
    suggest_url: String,
    timeout: Option<Duration>,
}

impl Tencent {
    pub fn new(client: HttpClient, config: &EngineConfig) -> Self {
        Self {
            client,
            hottest_url: config.hottest_url.clone(),
            suggest_url: config.suggest_url.clone(),
            timeout: config.timeout.map(Duration::from_secs_f64),
        }
    }
}

#[async_trait]
impl SearchDriver for Tencent {
    fn engine(&self) -> Engine {
        Engine::Tencent
    }

    async fn hottest(&self) -> Result<Vec<Suggestion>, FetchError> {
        let json = fetch_json(
            &self.client,
            Engine::Tencent,
            &self.hottest_url,
            &[("otype", "json")],
            self.timeout,
        )
        .await?;

        collect_terms(
            Engine::Tencent,
            &json,
            &["item", "data"],
            &["word", "title"],
            true,
        )
    }

    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, FetchError> {
        let json = fetch_json(
            &self.client,
            Engine::Tencent,
            &self.suggest_url,
            &[
                ("query", query),
                ("num", SUGGEST_LIMIT),
                ("otype", "json"),
                ("plat", "2"),
                ("ver", "0"),
            ],
            self.timeout,
        )
        .await?;

        // smartbox answers QZOutputJson={"item":[{"word":"..."}]};
        collect_terms(Engine::Tencent, &json, &["item"], &["word"], false)
    }
}
