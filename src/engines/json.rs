//! JSON helpers shared by the engine drivers

use super::kind::Engine;
use super::traits::FetchError;
use crate::network::HttpClient;
use crate::suggestion::Suggestion;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// `name={...};` or `name({...});`
static JSONP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[\w.$]+\s*(?:=|\()\s*(?P<body>[\s\S]*?)\s*\)?\s*;?\s*$")
        .expect("JSONP pattern is valid")
});

/// Remove a JSONP or assignment wrapper, leaving plain JSON untouched
pub fn strip_jsonp(body: &str) -> &str {
    match JSONP.captures(body).and_then(|c| c.name("body")) {
        Some(inner) => inner.as_str(),
        None => body.trim(),
    }
}

/// GET an endpoint and decode its (possibly wrapped) JSON body
pub async fn fetch_json(
    client: &HttpClient,
    engine: Engine,
    url: &str,
    params: &[(&str, &str)],
    timeout: Option<Duration>,
) -> Result<Value, FetchError> {
    let response = client.get(url, params, timeout).await?;

    if !response.is_success() {
        debug!(%engine, url = %response.url, status = response.status, "endpoint rejected request");
        return Err(FetchError::Status {
            engine,
            status: response.status,
        });
    }

    serde_json::from_str(strip_jsonp(&response.text)).map_err(|e| FetchError::parse(engine, e))
}

/// Pull a suggestion list out of the first matching array field.
///
/// Items may be bare strings or objects; for objects the first present key
/// in `text_keys` becomes the text and the remaining fields go to `extra`.
pub fn collect_terms(
    engine: Engine,
    value: &Value,
    array_keys: &[&str],
    text_keys: &[&str],
    ranked: bool,
) -> Result<Vec<Suggestion>, FetchError> {
    let items = array_keys
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_array))
        .ok_or_else(|| {
            FetchError::parse(engine, format!("expected one of {:?}", array_keys))
        })?;

    let mut suggestions = Vec::with_capacity(items.len());

    for item in items {
        let suggestion = match item {
            Value::String(text) => Suggestion::new(text.as_str()),
            Value::Object(fields) => {
                let Some((key, text)) = text_keys
                    .iter()
                    .find_map(|k| fields.get(*k).and_then(Value::as_str).map(|t| (*k, t)))
                else {
                    continue;
                };

                let mut suggestion = Suggestion::new(text);
                for (name, field) in fields {
                    if name == key {
                        continue;
                    }
                    match (name.as_str(), field.as_str()) {
                        ("url" | "link", Some(url)) => suggestion = suggestion.with_url(url),
                        _ => suggestion = suggestion.with_extra(name.clone(), field.clone()),
                    }
                }
                suggestion
            }
            _ => continue,
        };

        if suggestion.text.trim().is_empty() {
            continue;
        }

        let rank = suggestions.len() as u32 + 1;
        suggestions.push(if ranked {
            suggestion.with_rank(rank)
        } else {
            suggestion
        });
    }

    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_assignment_wrapper() {
        assert_eq!(strip_jsonp("QZOutputJson={\"a\":1};"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_callback_wrapper() {
        assert_eq!(strip_jsonp("cb_123({\"a\":1});\n"), "{\"a\":1}");
    }

    #[test]
    fn test_plain_json_untouched() {
        assert_eq!(strip_jsonp("  {\"a\":[1]} "), "{\"a\":[1]}");
    }

    #[test]
    fn test_collect_mixed_items() {
        let value = json!({
            "r": [
                { "w": "avengers", "url": "http://v/1", "count": 3 },
                "avatar",
                { "other": "no text" },
                42,
                { "w": "  " }
            ]
        });

        let terms = collect_terms(Engine::Youku, &value, &["r"], &["w"], true).unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].text, "avengers");
        assert_eq!(terms[0].url.as_deref(), Some("http://v/1"));
        assert_eq!(terms[0].rank, Some(1));
        assert_eq!(terms[0].extra["count"], 3);
        assert_eq!(terms[1].text, "avatar");
        assert_eq!(terms[1].rank, Some(2));
    }

    #[test]
    fn test_collect_missing_array() {
        let err = collect_terms(Engine::Tencent, &json!({}), &["item"], &["word"], false)
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse { engine: Engine::Tencent, .. }));
    }
}
