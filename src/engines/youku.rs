//! Youku hot list and autocomplete driver

use super::json::{collect_terms, fetch_json};
use super::kind::Engine;
use super::traits::{FetchError, SearchDriver};
use crate::config::EngineConfig;
use crate::network::HttpClient;
use crate::suggestion::Suggestion;
use async_trait::async_trait;
use std::time::Duration;

/// Youku driver backed by the soku tip endpoints
pub struct Youku {
    client: HttpClient,
    hottest_url: String,
    suggest_url: String,
    timeout: Option<Duration>,
}

impl Youku {
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
impl SearchDriver for Youku {
    fn engine(&self) -> Engine {
        Engine::Youku
    }

    async fn hottest(&self) -> Result<Vec<Suggestion>, FetchError> {
        let json = fetch_json(
            &self.client,
            Engine::Youku,
            &self.hottest_url,
            &[("site", "1")],
            self.timeout,
        )
        .await?;

        // {"r":[{"w":"..."}]} or {"data":[{"title":"..."}]}
        collect_terms(Engine::Youku, &json, &["r", "data"], &["w", "title", "keyword"], true)
    }

    async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, FetchError> {
        let json = fetch_json(
            &self.client,
            Engine::Youku,
            &self.suggest_url,
            &[("query", query), ("site", "1")],
            self.timeout,
        )
        .await?;

        // {"r":[{"w":"..."}]}
        collect_terms(Engine::Youku, &json, &["r"], &["w"], false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn driver(server: &MockServer) -> Youku {
        let mut config = EngineConfig::builtin(Engine::Youku);
        config.hottest_url = format!("{}/hot", server.uri());
        config.suggest_url = format!("{}/tip", server.uri());
        Youku::new(HttpClient::new().unwrap(), &config)
    }

    #[tokio::test]
    async fn test_suggest() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tip"))
            .and(query_param("query", "avengers"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"r":[{"w":"avengers endgame"},{"w":"avengers infinity war"}]}"#,
            ))
            .mount(&server)
            .await;

        let suggestions = driver(&server).suggest("avengers").await.unwrap();
        let texts: Vec<_> = suggestions.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["avengers endgame", "avengers infinity war"]);
        assert!(suggestions.iter().all(|s| s.rank.is_none()));
    }

    #[tokio::test]
    async fn test_hottest_ranked() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hot"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data":[{"title":"show a","url":"http://v.youku.com/a"},{"title":"show b"}]}"#,
            ))
            .mount(&server)
            .await;

        let hot = driver(&server).hottest().await.unwrap();
        assert_eq!(hot.len(), 2);
        assert_eq!(hot[0].rank, Some(1));
        assert_eq!(hot[0].url.as_deref(), Some("http://v.youku.com/a"));
        assert_eq!(hot[1].text, "show b");
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = driver(&server).hottest().await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Status {
                engine: Engine::Youku,
                status: 502
            }
        ));
    }
}
