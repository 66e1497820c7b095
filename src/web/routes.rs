//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        // Search box surface
        .route("/api/state", get(handlers::view_state))
        .route("/api/search", post(handlers::search))
        .route("/api/engine", post(handlers::change_engine))
        .route("/api/query", post(handlers::publish_query))
        .route("/api/navigate", post(handlers::navigate))
        .route("/api/stats", get(handlers::stats))
        .route("/health", get(handlers::health))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::SuggestionService;
    use crate::config::Settings;
    use crate::engines::{DriverRegistry, Engine, FetchError, SearchDriver};
    use crate::searchbox::{
        BrowsingContext, BrowsingContextOpener, SearchBox, SearchBoxOptions, SearchPages,
    };
    use crate::suggestion::Suggestion;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tower::ServiceExt;

    struct Echo(Engine);

    #[async_trait]
    impl SearchDriver for Echo {
        fn engine(&self) -> Engine {
            self.0
        }

        async fn hottest(&self) -> Result<Vec<Suggestion>, FetchError> {
            Ok(vec![Suggestion::new("hot")])
        }

        async fn suggest(&self, query: &str) -> Result<Vec<Suggestion>, FetchError> {
            Ok(vec![Suggestion::new(format!("{}:{}", self.0, query))])
        }
    }

    #[derive(Default)]
    struct Opened(Mutex<Vec<String>>);

    struct NoOpener;

    impl BrowsingContext for NoOpener {
        fn sever_opener(&mut self) {}
    }

    impl BrowsingContextOpener for Opened {
        fn open(&self, url: &str) -> anyhow::Result<Box<dyn BrowsingContext>> {
            self.0.lock().unwrap().push(url.to_string());
            Ok(Box::new(NoOpener))
        }
    }

    /// Router plus the opener log and a handle keeping the search box alive
    /// once `oneshot` has consumed the router
    fn app() -> (Router, Arc<Opened>, Arc<SearchBox>) {
        let registry = DriverRegistry::new(vec![
            Arc::new(Echo(Engine::Youku)) as Arc<dyn SearchDriver>,
            Arc::new(Echo(Engine::Tencent)) as Arc<dyn SearchDriver>,
        ])
        .unwrap();
        let service = Arc::new(SuggestionService::new());
        let opened = Arc::new(Opened::default());

        let search_box = SearchBox::new(
            Arc::new(registry),
            &service,
            SearchPages::default(),
            opened.clone(),
            SearchBoxOptions::default(),
        );

        let search_box = Arc::new(search_box);
        let state = AppState::new(Settings::default(), search_box.clone(), service).unwrap();
        (create_router(state), opened, search_box)
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _, _) = app();
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_state_defaults() {
        let (app, _, _) = app();
        let response = app
            .oneshot(Request::get("/api/state").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = json_body(response).await;
        assert_eq!(body["engine"], "youku");
        assert_eq!(body["mode"], "hot");
        assert_eq!(body["engines"], serde_json::json!(["youku", "tencent"]));
    }

    #[tokio::test]
    async fn test_change_engine() {
        let (app, _, _) = app();

        let response = app
            .clone()
            .oneshot(post_json("/api/engine", serde_json::json!({ "engine": "Tencent" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["engine"], "tencent");

        let response = app
            .oneshot(post_json("/api/engine", serde_json::json!({ "engine": "bilibili" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_navigate_opens_page() {
        let (app, opened, search_box) = app();

        let response = app
            .oneshot(post_json("/api/navigate", serde_json::json!({ "q": "avatar" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(
            *opened.0.lock().unwrap(),
            vec!["http://so.youku.com/search_video/q_avatar"]
        );
        assert_eq!(search_box.engine(), Engine::Youku);
    }

    #[tokio::test]
    async fn test_index_renders() {
        let (app, _, _) = app();
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<select id=\"engine\">"));
    }
}
