//! The search box view-model

use super::debounce::Debouncer;
use super::navigation::{BrowsingContextOpener, SearchPages};
use super::state::{DisplayMode, ViewSnapshot, ViewState};
use crate::broadcast::{Subscription, SuggestionService};
use crate::config::Settings;
use crate::engines::{DriverProvider, Engine, FetchError, FetchEvent, FetchKind};
use crate::metrics::FetchMetrics;
use crate::suggestion::Suggestion;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Buffered fetch outcomes per receiver before lagging
const EVENT_CAPACITY: usize = 64;

/// Construction options
#[derive(Debug, Clone)]
pub struct SearchBoxOptions {
    pub default_engine: Engine,
    pub debounce: Duration,
}

impl SearchBoxOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            default_engine: settings.search_box.default_engine,
            debounce: Duration::from_millis(settings.search_box.debounce_ms),
        }
    }
}

impl Default for SearchBoxOptions {
    fn default() -> Self {
        Self {
            default_engine: Engine::default(),
            debounce: Duration::from_millis(crate::DEFAULT_DEBOUNCE_MS),
        }
    }
}

/// Search box toggling between the hot list and autocomplete suggestions.
///
/// Fetches run as spawned tasks and write their result when they complete.
/// Overlapping fetches are not fenced, so whichever completes last wins.
/// Must be created inside a tokio runtime.
pub struct SearchBox {
    inner: Arc<Inner>,
    debouncer: Debouncer<String>,
    subscriptions: Mutex<Vec<Subscription>>,
}

struct Inner {
    state: Mutex<ViewState>,
    provider: Arc<dyn DriverProvider>,
    pages: SearchPages,
    opener: Arc<dyn BrowsingContextOpener>,
    events: broadcast::Sender<FetchEvent>,
    metrics: Arc<FetchMetrics>,
}

impl SearchBox {
    pub fn new(
        provider: Arc<dyn DriverProvider>,
        service: &SuggestionService,
        pages: SearchPages,
        opener: Arc<dyn BrowsingContextOpener>,
        options: SearchBoxOptions,
    ) -> Self {
        let engine = options.default_engine;
        let driver = provider.driver(engine);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let inner = Arc::new(Inner {
            state: Mutex::new(ViewState::new(engine, driver)),
            provider,
            pages,
            opener,
            events,
            metrics: Arc::new(FetchMetrics::new()),
        });

        let debouncer = {
            let inner = Arc::downgrade(&inner);
            Debouncer::new(options.debounce, move |query: String| {
                if let Some(inner) = inner.upgrade() {
                    inner.search(query);
                }
            })
        };

        let query_subscription = service.subscribe_query(with_inner(&inner, Inner::set_query));
        let page_subscription =
            service.subscribe_search_page(with_inner(&inner, Inner::to_search_page));

        info!(%engine, debounce_ms = debouncer.delay().as_millis() as u64, "search box created");

        Self {
            inner,
            debouncer,
            subscriptions: Mutex::new(vec![query_subscription, page_subscription]),
        }
    }

    /// Show the hot list; call once when the box is first displayed
    pub fn init(&self) {
        self.inner.show_hottest();
    }

    /// Typed input, debounced
    pub fn search(&self, query: impl Into<String>) {
        self.debouncer.call(query.into());
    }

    /// Typed input, dispatched immediately
    pub fn search_now(&self, query: impl Into<String>) {
        self.inner.search(query.into());
    }

    /// Switch engines and refetch for the new one
    pub fn change_engine(&self, engine: Engine) {
        self.inner.change_engine(engine);
    }

    /// Release both stream subscriptions; returns how many were live.
    ///
    /// In-flight fetches keep running.
    pub fn destroy(&self) -> usize {
        let subscriptions = std::mem::take(
            &mut *self
                .subscriptions
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );

        let released = subscriptions
            .into_iter()
            .map(|mut s| s.unsubscribe())
            .filter(|released| *released)
            .count();

        if released > 0 {
            info!(released, "search box destroyed");
        }
        released
    }

    pub fn query(&self) -> String {
        self.inner.lock().query.clone()
    }

    pub fn engine(&self) -> Engine {
        self.inner.lock().engine
    }

    /// Every selectable engine
    pub fn engines(&self) -> &'static [Engine] {
        &Engine::ALL
    }

    pub fn mode(&self) -> DisplayMode {
        self.inner.lock().mode
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.inner.lock().suggestions.clone()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.inner.lock().snapshot()
    }

    /// Outcomes of every fetch settled from now on
    pub fn fetch_events(&self) -> broadcast::Receiver<FetchEvent> {
        self.inner.events.subscribe()
    }

    pub fn metrics(&self) -> Arc<FetchMetrics> {
        self.inner.metrics.clone()
    }

    /// Whether a typed query is still waiting out the debounce delay
    pub fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending()
    }
}

impl Drop for SearchBox {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn with_inner(
    inner: &Arc<Inner>,
    handler: fn(&Arc<Inner>, String),
) -> impl Fn(String) + Send + Sync + 'static {
    let inner: Weak<Inner> = Arc::downgrade(inner);
    move |value| {
        if let Some(inner) = inner.upgrade() {
            handler(&inner, value);
        }
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn search(self: &Arc<Self>, query: String) {
        self.lock().query = query.clone();

        if query.is_empty() {
            self.show_hottest();
        } else {
            self.show_suggestions(query);
        }
    }

    /// Shared query stream; empty values still go to suggestions
    fn set_query(self: &Arc<Self>, query: String) {
        {
            let mut state = self.lock();
            if state.query == query {
                return;
            }
            state.query = query.clone();
        }
        self.show_suggestions(query);
    }

    fn to_search_page(self: &Arc<Self>, query: String) {
        // The stream replays its initial empty value on subscribe.
        if query.is_empty() {
            return;
        }

        let engine = self.lock().engine;
        let url = self.pages.url_for(engine, &query);

        match self.opener.open(&url) {
            Ok(mut context) => {
                context.sever_opener();
                info!(%engine, %url, "opened search page");
            }
            Err(err) => warn!(%engine, %url, error = %err, "failed to open search page"),
        }
    }

    fn change_engine(self: &Arc<Self>, engine: Engine) {
        let driver = self.provider.driver(engine);
        let query = {
            let mut state = self.lock();
            state.engine = engine;
            state.driver = driver;
            // The cached hot list belongs to the previous engine.
            state.hottest = None;
            state.query.clone()
        };

        info!(%engine, "engine changed");

        if query.is_empty() {
            self.fetch_hottest();
        } else {
            self.show_suggestions(query);
        }
    }

    fn show_hottest(self: &Arc<Self>) {
        {
            let mut state = self.lock();
            state.mode = DisplayMode::Hot;

            if let Some(cached) = state.hottest.clone() {
                debug!(engine = %state.engine, count = cached.len(), "hot list from cache");
                state.suggestions = cached;
                return;
            }
        }
        self.fetch_hottest();
    }

    fn fetch_hottest(self: &Arc<Self>) {
        let (engine, driver) = {
            let state = self.lock();
            (state.engine, state.driver.clone())
        };

        debug!(%engine, "fetching hot list");
        self.metrics.record_dispatch(engine, FetchKind::Hottest);

        let inner = self.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let result = driver.hottest().await;
            inner.settle(engine, FetchKind::Hottest, started, result, |state, list| {
                state.hottest = Some(list.clone());
                state.suggestions = list;
            });
        });
    }

    fn show_suggestions(self: &Arc<Self>, query: String) {
        let (engine, driver) = {
            let mut state = self.lock();
            state.mode = DisplayMode::Suggestion;
            (state.engine, state.driver.clone())
        };

        debug!(%engine, %query, "fetching suggestions");
        self.metrics.record_dispatch(engine, FetchKind::Suggest);

        let inner = self.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let result = driver.suggest(&query).await;
            inner.settle(engine, FetchKind::Suggest, started, result, |state, list| {
                state.suggestions = list;
            });
        });
    }

    /// Apply a finished fetch; failures leave the state untouched
    fn settle<F>(
        &self,
        engine: Engine,
        kind: FetchKind,
        started: Instant,
        result: Result<Vec<Suggestion>, FetchError>,
        apply: F,
    ) where
        F: FnOnce(&mut ViewState, Vec<Suggestion>),
    {
        let event = match result {
            Ok(list) => {
                let count = list.len();
                apply(&mut *self.lock(), list);
                self.metrics.record_success(engine, kind, started.elapsed());
                debug!(%engine, %kind, count, "fetch completed");
                FetchEvent::Completed {
                    engine,
                    kind,
                    count,
                }
            }
            Err(err) => {
                self.metrics.record_failure(engine, kind);
                warn!(%engine, %kind, error = %err, "fetch failed, keeping previous suggestions");
                FetchEvent::Failed {
                    engine,
                    kind,
                    error: err.to_string(),
                }
            }
        };

        // Nobody listening is fine.
        let _ = self.events.send(event);
    }
}
