/// Bookmark collection store
use super::{Listeners, SubscriptionId};
use crate::api::{ApiResult, BookmarkApi};
use crate::bookmark_data::{Bookmark, BookmarkCreate, BookmarkUpdate, ImportSummary, VectorizeJob};
use log::{info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use yew::Callback;

/// How many bookmarks `recent_bookmarks` returns
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkState {
    pub bookmarks: Vec<Bookmark>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Result of the last health check, `None` before the first one
    pub backend_healthy: Option<bool>,
}

/// Cached copy of the backend's bookmarks.
///
/// Every action sets `is_loading`, clears `error`, makes one API call and then
/// either applies its local change or records the error. Concurrent actions are
/// not serialized: the last one to finish owns `is_loading` and `error`.
pub struct BookmarkStore {
    api: Rc<dyn BookmarkApi>,
    state: RefCell<BookmarkState>,
    listeners: RefCell<Listeners>,
}

impl BookmarkStore {
    pub fn new(api: Rc<dyn BookmarkApi>) -> Self {
        BookmarkStore {
            api,
            state: RefCell::new(BookmarkState::default()),
            listeners: RefCell::new(Listeners::default()),
        }
    }

    pub fn subscribe(&self, listener: Callback<()>) -> SubscriptionId {
        self.listeners.borrow_mut().subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().unsubscribe(id)
    }

    pub fn state(&self) -> BookmarkState {
        self.state.borrow().clone()
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.state.borrow().bookmarks.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn backend_healthy(&self) -> Option<bool> {
        self.state.borrow().backend_healthy
    }

    pub fn count(&self) -> usize {
        self.state.borrow().bookmarks.len()
    }

    /// The newest bookmarks by creation time, newest first
    pub fn recent_bookmarks(&self) -> Vec<Bookmark> {
        let mut recent = self.bookmarks();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(RECENT_LIMIT);
        recent
    }

    /// Replace the collection with one page from the backend
    pub async fn fetch_bookmarks(&self, skip: u32, limit: u32) -> bool {
        self.begin();
        let result = self.api.list_bookmarks(skip, limit).await;
        self.complete(result, |bookmarks, fetched| {
            *bookmarks = fetched.clone();
        })
        .is_some()
    }

    /// Refresh a single bookmark, adding it when it is not cached yet
    pub async fn fetch_bookmark(&self, id: i64) -> Option<Bookmark> {
        self.begin();
        let result = self.api.get_bookmark(id).await;
        self.complete(result, |bookmarks, fetched| {
            if !merge(bookmarks, fetched) {
                bookmarks.insert(0, fetched.clone());
            }
        })
    }

    pub async fn create_bookmark(&self, bookmark: BookmarkCreate) -> Option<Bookmark> {
        self.begin();
        let result = self.api.create_bookmark(&bookmark).await;
        let created = self.complete(result, |bookmarks, created| {
            bookmarks.insert(0, created.clone());
        });

        if let Some(created) = &created {
            info!("Created bookmark {} for {}", created.id, created.url);
        }
        created
    }

    pub async fn update_bookmark(&self, id: i64, update: BookmarkUpdate) -> Option<Bookmark> {
        self.begin();
        let result = self.api.update_bookmark(id, &update).await;
        self.complete(result, |bookmarks, updated| {
            merge(bookmarks, updated);
        })
    }

    /// Delete on the backend, then locally; a failed call removes nothing
    pub async fn delete_bookmark(&self, id: i64) -> bool {
        self.begin();
        let result = self.api.delete_bookmark(id).await;
        self.complete(result, |bookmarks, _| {
            bookmarks.retain(|b| b.id != id);
        })
        .is_some()
    }

    /// Ask the backend to derive content and keywords for a bookmark
    pub async fn enrich_bookmark(&self, id: i64) -> bool {
        self.begin();
        let result = self.api.enrich_bookmark(id).await;
        self.complete(result, |_, _| {}).is_some()
    }

    /// Import a bookmarks export. The imported bookmarks are enriched in the
    /// background, so the cached collection is left for the caller to refetch.
    pub async fn import_bookmarks(&self, file_name: &str, contents: Vec<u8>) -> Option<ImportSummary> {
        self.begin();
        let result = self.api.upload_bookmarks(file_name, contents).await;
        let summary = self.complete(result, |_, _| {});

        if let Some(summary) = &summary {
            info!("Imported {} bookmarks from {}", summary.count, file_name);
        }
        summary
    }

    /// Start rebuilding search vectors for every bookmark
    pub async fn batch_vectorize(&self) -> Option<VectorizeJob> {
        self.begin();
        let result = self.api.batch_vectorize().await;
        self.complete(result, |_, _| {})
    }

    /// Start retraining the vectorizer from scratch
    pub async fn retrain_vectorizer(&self) -> Option<VectorizeJob> {
        self.begin();
        let result = self.api.retrain_vectorizer().await;
        self.complete(result, |_, _| {})
    }

    /// Check backend liveness; does not touch `is_loading` or `error`
    pub async fn check_health(&self) -> bool {
        let healthy = match self.api.health().await {
            Ok(status) => status.is_healthy(),
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        };
        self.update(|state| state.backend_healthy = Some(healthy));
        healthy
    }

    fn begin(&self) {
        self.update(|state| {
            state.is_loading = true;
            state.error = None;
        });
    }

    fn complete<T>(
        &self,
        result: ApiResult<T>,
        apply: impl FnOnce(&mut Vec<Bookmark>, &T),
    ) -> Option<T> {
        self.update(|state| {
            match &result {
                Ok(value) => apply(&mut state.bookmarks, value),
                Err(e) => {
                    warn!("Bookmark action failed: {}", e);
                    state.error = Some(e.to_string());
                }
            }
            state.is_loading = false;
        });
        result.ok()
    }

    fn update(&self, change: impl FnOnce(&mut BookmarkState)) {
        change(&mut self.state.borrow_mut());
        self.notify();
    }

    fn notify(&self) {
        let listeners = self.listeners.borrow().snapshot();
        for listener in listeners {
            listener.emit(());
        }
    }
}

/// Replace the cached bookmark with the same id; false when absent
fn merge(bookmarks: &mut [Bookmark], updated: &Bookmark) -> bool {
    match bookmarks.iter_mut().find(|b| b.id == updated.id) {
        Some(existing) => {
            *existing = updated.clone();
            true
        }
        None => false,
    }
}
