//! HTTP client used by the engine drivers

use crate::config::OutgoingSettings;
use crate::engines::FetchError;
use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;

/// Default desktop user agent; both engines serve degraded JSON to unknown agents
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// HTTP client wrapper configured from [`OutgoingSettings`]
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

/// Response body plus status
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl HttpResponse {
    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let timeout = Duration::from_secs_f64(settings.request_timeout);

        let mut headers = HeaderMap::new();
        for (key, value) in &settings.extra_headers {
            headers.insert(
                HeaderName::from_bytes(key.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }

        let user_agent = settings
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let mut builder = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        Ok(Self {
            client: builder.build()?,
            default_timeout: timeout,
        })
    }

    /// GET with query parameters, optionally overriding the timeout
    pub async fn get(
        &self,
        url: &str,
        params: &[(&str, &str)],
        timeout: Option<Duration>,
    ) -> Result<HttpResponse, FetchError> {
        let mut request = self
            .client
            .get(url)
            .timeout(timeout.unwrap_or(self.default_timeout))
            .header("Accept", "application/json,text/javascript,*/*;q=0.01");

        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response.text().await?;

        Ok(HttpResponse { status, text, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_get_sends_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ac"))
            .and(query_param("query", "hello world"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let response = client
            .get(&format!("{}/ac", server.uri()), &[("query", "hello world")], None)
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.text, "ok");
    }

    #[tokio::test]
    async fn test_extra_headers_applied() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(wiremock::matchers::header("x-test", "1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let mut settings = OutgoingSettings::default();
        settings
            .extra_headers
            .insert("x-test".to_string(), "1".to_string());

        let client = HttpClient::with_settings(&settings).unwrap();
        let response = client.get(&server.uri(), &[], None).await.unwrap();
        assert_eq!(response.status, 204);
    }
}
