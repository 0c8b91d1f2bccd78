//! Reactive stores between the views and the API client.
//!
//! Stores are plain values built around an injected [`BookmarkApi`]. Views
//! subscribe to be told when state changes and read a snapshot afterwards.

mod bookmark_store;
mod search_store;

pub use bookmark_store::{BookmarkState, BookmarkStore, RECENT_LIMIT};
pub use search_store::{SearchState, SearchStore};

use crate::api::BookmarkApi;
use std::rc::Rc;
use yew::Callback;

pub type SubscriptionId = usize;

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: SubscriptionId,
    entries: Vec<(SubscriptionId, Callback<()>)>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, listener: Callback<()>) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let original_len = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() < original_len
    }

    /// Snapshot of the callbacks so listeners may (un)subscribe while being notified
    pub(crate) fn snapshot(&self) -> Vec<Callback<()>> {
        self.entries.iter().map(|(_, listener)| listener.clone()).collect()
    }
}

/// Every store the dashboard uses, created once at startup
#[derive(Clone)]
pub struct AppStores {
    pub bookmarks: Rc<BookmarkStore>,
    pub search: Rc<SearchStore>,
}

impl AppStores {
    pub fn new(api: Rc<dyn BookmarkApi>) -> Self {
        AppStores {
            bookmarks: Rc::new(BookmarkStore::new(api.clone())),
            search: Rc::new(SearchStore::new(api)),
        }
    }
}

impl PartialEq for AppStores {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.bookmarks, &other.bookmarks) && Rc::ptr_eq(&self.search, &other.search)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;
    use std::cell::Cell;

    #[test]
    fn test_listeners_subscribe_and_unsubscribe() {
        let mut listeners = Listeners::default();
        let hits = Rc::new(Cell::new(0));

        let first = {
            let hits = hits.clone();
            listeners.subscribe(Callback::from(move |_| hits.set(hits.get() + 1)))
        };
        let second = {
            let hits = hits.clone();
            listeners.subscribe(Callback::from(move |_| hits.set(hits.get() + 10)))
        };
        assert_ne!(first, second);

        for listener in listeners.snapshot() {
            listener.emit(());
        }
        assert_eq!(hits.get(), 11);

        assert!(listeners.unsubscribe(first));
        assert!(!listeners.unsubscribe(first));

        for listener in listeners.snapshot() {
            listener.emit(());
        }
        assert_eq!(hits.get(), 21);
    }

    #[test]
    fn test_app_stores_identity() {
        let api: Rc<dyn BookmarkApi> = Rc::new(MockApi::new());
        let stores = AppStores::new(api.clone());

        assert!(stores == stores.clone());
        assert!(stores != AppStores::new(api));
    }
}
