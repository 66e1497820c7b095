//! Shared query broadcast service
//!
//! Two independent streams connect the search box to the rest of the page:
//! the shared query text and requests to open the full results page. Both
//! replay their current value to every new subscriber.

mod subscription;
mod topic;

pub use subscription::Subscription;

use std::sync::Arc;
use topic::Topic;

/// Stream names, used for logging
pub const QUERY_STREAM: &str = "query";
pub const SEARCH_PAGE_STREAM: &str = "search_page";

/// Publishes query changes and search page requests to subscribers
pub struct SuggestionService {
    query: Arc<Topic>,
    search_page: Arc<Topic>,
}

impl SuggestionService {
    /// Both streams start out holding the empty string
    pub fn new() -> Self {
        Self {
            query: Arc::new(Topic::new(QUERY_STREAM)),
            search_page: Arc::new(Topic::new(SEARCH_PAGE_STREAM)),
        }
    }

    /// Set the shared query
    pub fn set_query(&self, query: impl Into<String>) {
        self.query.publish(query.into());
    }

    /// Last published query
    pub fn query(&self) -> String {
        self.query.current()
    }

    /// Ask the search box to open the full results page for a query
    pub fn request_search_page(&self, query: impl Into<String>) {
        self.search_page.publish(query.into());
    }

    /// Observe the shared query.
    ///
    /// The current value is delivered before this returns. Must be called
    /// from within a tokio runtime.
    pub fn subscribe_query<F>(&self, observer: F) -> Subscription
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        Subscription::spawn(&self.query, observer)
    }

    /// Observe search page requests.
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe_search_page<F>(&self, observer: F) -> Subscription
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        Subscription::spawn(&self.search_page, observer)
    }

    /// Number of live subscribers on each stream, `(query, search_page)`
    pub fn subscriber_counts(&self) -> (usize, usize) {
        (
            self.query.subscriber_count(),
            self.search_page.subscriber_count(),
        )
    }
}

impl Default for SuggestionService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |value| sink.lock().unwrap().push(value))
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn test_replays_initial_value() {
        let service = SuggestionService::new();
        let (seen, observer) = recorder();

        let _sub = service.subscribe_query(observer);

        assert_eq!(*seen.lock().unwrap(), vec![String::new()]);
    }

    #[tokio::test]
    async fn test_back_to_back_emissions_all_delivered() {
        let service = SuggestionService::new();
        let (pages, on_page) = recorder();
        let (queries, on_query) = recorder();

        let _p = service.subscribe_search_page(on_page);
        let _q = service.subscribe_query(on_query);

        service.request_search_page("first");
        service.request_search_page("second");
        service.set_query("x");
        service.set_query("");
        settle().await;

        assert_eq!(*pages.lock().unwrap(), vec!["", "first", "second"]);
        assert_eq!(*queries.lock().unwrap(), vec!["", "x", ""]);
    }

    #[tokio::test]
    async fn test_streams_are_independent() {
        let service = SuggestionService::new();
        let (queries, on_query) = recorder();
        let (pages, on_page) = recorder();

        let _q = service.subscribe_query(on_query);
        let _p = service.subscribe_search_page(on_page);
        settle().await;

        service.set_query("avengers");
        settle().await;
        service.request_search_page("avatar");
        settle().await;

        assert_eq!(*queries.lock().unwrap(), vec!["", "avengers"]);
        assert_eq!(*pages.lock().unwrap(), vec!["", "avatar"]);
        assert_eq!(service.query(), "avengers");
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let service = SuggestionService::new();
        let (seen, observer) = recorder();

        let mut sub = service.subscribe_query(observer);
        assert!(sub.unsubscribe());
        assert_eq!(service.subscriber_counts(), (0, 0));

        service.set_query("late");
        settle().await;

        assert_eq!(*seen.lock().unwrap(), vec![String::new()]);
        assert_eq!(service.subscriber_counts(), (0, 0));
    }
}
