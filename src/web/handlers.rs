//! HTTP request handlers

use super::state::AppState;
use crate::engines::Engine;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tera::Context;

/// Body carrying a query string
#[derive(Debug, Deserialize)]
pub struct QueryBody {
    #[serde(default)]
    pub q: String,
}

/// Body selecting an engine
#[derive(Debug, Deserialize)]
pub struct EngineBody {
    pub engine: String,
}

/// Home page handler
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let view = state.search_box.snapshot();

    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("query", &view.query);
    ctx.insert("engine", &view.engine);
    ctx.insert("engines", &engine_options(&view.engines));
    ctx.insert("mode", &view.mode);
    ctx.insert("suggestions", &view.suggestions);

    match state.templates.render_with_context("index.html", &ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// `{name, label}` pairs for the engine dropdown
pub fn engine_options(engines: &[Engine]) -> Vec<serde_json::Value> {
    engines
        .iter()
        .map(|e| serde_json::json!({ "name": e.name(), "label": e.label() }))
        .collect()
}

/// Current view state
pub async fn view_state(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.search_box.snapshot())
}

/// Typed input; dispatched after the debounce delay
pub async fn search(State(state): State<AppState>, Json(body): Json<QueryBody>) -> StatusCode {
    state.search_box.search(body.q);
    StatusCode::ACCEPTED
}

/// Engine selection
pub async fn change_engine(
    State(state): State<AppState>,
    Json(body): Json<EngineBody>,
) -> Response {
    let engine: Engine = match body.engine.parse() {
        Ok(engine) => engine,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    state.search_box.change_engine(engine);
    Json(state.search_box.snapshot()).into_response()
}

/// Publish to the shared query stream
pub async fn publish_query(
    State(state): State<AppState>,
    Json(body): Json<QueryBody>,
) -> StatusCode {
    state.service.set_query(body.q);
    StatusCode::ACCEPTED
}

/// Request the full results page
pub async fn navigate(State(state): State<AppState>, Json(body): Json<QueryBody>) -> StatusCode {
    state.service.request_search_page(body.q);
    StatusCode::ACCEPTED
}

/// Per-engine fetch statistics
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let metrics = state.search_box.metrics();
    Json(serde_json::json!({
        "total_dispatched": metrics.get_total_dispatched(),
        "engines": metrics.get_engine_stats(),
    }))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}
