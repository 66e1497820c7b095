//! HTTP networking module
//!
//! Provides the HTTP client the engine drivers fetch through.

mod client;

pub use client::{HttpClient, HttpResponse, DEFAULT_USER_AGENT};
