//! Suggestion records shown in the search box dropdown

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single dropdown entry, either a hot search term or an autocomplete hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Text shown to the user
    pub text: String,
    /// Direct link, when the engine provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Position in the engine's hot list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    /// Engine specific fields passed through untouched
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Suggestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: None,
            rank: None,
            extra: HashMap::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}
