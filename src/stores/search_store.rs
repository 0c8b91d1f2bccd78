/// Search results store
use super::{Listeners, SubscriptionId};
use crate::api::BookmarkApi;
use crate::bookmark_data::{AnalyzeUrlResponse, SearchRequest, SearchResult};
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use yew::Callback;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub analysis: Option<AnalyzeUrlResponse>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Results for the current query.
///
/// Each search is tagged with an increasing sequence number and only the
/// newest one issued may write results, so a slow earlier query can never
/// replace the answer to a later one.
pub struct SearchStore {
    api: Rc<dyn BookmarkApi>,
    state: RefCell<SearchState>,
    sequence: Cell<u64>,
    listeners: RefCell<Listeners>,
}

impl SearchStore {
    pub fn new(api: Rc<dyn BookmarkApi>) -> Self {
        SearchStore {
            api,
            state: RefCell::new(SearchState::default()),
            sequence: Cell::new(0),
            listeners: RefCell::new(Listeners::default()),
        }
    }

    pub fn subscribe(&self, listener: Callback<()>) -> SubscriptionId {
        self.listeners.borrow_mut().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().unsubscribe(id)
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn results(&self) -> Vec<SearchResult> {
        self.state.borrow().results.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Run a search. Returns true when this call's results were applied.
    ///
    /// Previous results are cleared before the request goes out. A blank query
    /// only clears.
    pub async fn search(&self, query: &str, limit: Option<u32>) -> bool {
        let sequence = self.next_sequence();

        let Some(request) = SearchRequest::new(query, limit) else {
            self.update(|state| {
                state.query.clear();
                state.results.clear();
                state.is_loading = false;
                state.error = None;
            });
            return false;
        };

        self.update(|state| {
            state.query = request.query.clone();
            state.results.clear();
            state.is_loading = true;
            state.error = None;
        });

        let result = self.api.search(&request).await;

        if sequence != self.sequence.get() {
            debug!("Discarding stale results for '{}'", request.query);
            return false;
        }

        self.update(|state| {
            match result {
                Ok(results) => state.results = results,
                Err(e) => {
                    warn!("Search for '{}' failed: {}", request.query, e);
                    state.error = Some(e.to_string());
                }
            }
            state.is_loading = false;
        });
        self.state.borrow().error.is_none()
    }

    /// Ask the backend what it can extract from a page
    pub async fn analyze_url(&self, url: &str) -> Option<AnalyzeUrlResponse> {
        self.update(|state| {
            state.is_loading = true;
            state.error = None;
        });

        let result = self.api.analyze_url(url).await;

        self.update(|state| {
            match &result {
                Ok(analysis) => state.analysis = Some(analysis.clone()),
                Err(e) => {
                    warn!("Analyzing {} failed: {}", url, e);
                    state.error = Some(e.to_string());
                }
            }
            state.is_loading = false;
        });
        result.ok()
    }

    /// Drop results, analysis and error; in-flight searches become stale
    pub fn clear(&self) {
        self.next_sequence();
        self.update(|state| *state = SearchState::default());
    }

    fn next_sequence(&self) -> u64 {
        let sequence = self.sequence.get() + 1;
        self.sequence.set(sequence);
        sequence
    }

    fn update(&self, change: impl FnOnce(&mut SearchState)) {
        change(&mut self.state.borrow_mut());
        let listeners = self.listeners.borrow().snapshot();
        for listener in listeners {
            listener.emit(());
        }
    }
}
