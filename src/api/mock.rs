/// Scripted `BookmarkApi` for store, relay and injector tests
use super::{ApiError, ApiResult, BookmarkApi};
use crate::bookmark_data::{
    AnalyzeUrlResponse, Bookmark, BookmarkCreate, BookmarkUpdate, HealthStatus, ImportSummary,
    SearchRequest, SearchResult, VectorizeJob,
};
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::VecDeque;
use tokio::sync::oneshot;

pub enum SearchReply {
    Ready(ApiResult<Vec<SearchResult>>),
    Deferred(oneshot::Receiver<ApiResult<Vec<SearchResult>>>),
}

#[derive(Default)]
pub struct MockApi {
    pub lists: RefCell<VecDeque<ApiResult<Vec<Bookmark>>>>,
    pub bookmarks: RefCell<VecDeque<ApiResult<Bookmark>>>,
    pub units: RefCell<VecDeque<ApiResult<()>>>,
    pub searches: RefCell<VecDeque<SearchReply>>,
    pub analyses: RefCell<VecDeque<ApiResult<AnalyzeUrlResponse>>>,
    pub imports: RefCell<VecDeque<ApiResult<ImportSummary>>>,
    pub jobs: RefCell<VecDeque<ApiResult<VectorizeJob>>>,
    pub calls: RefCell<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_list(&self, reply: ApiResult<Vec<Bookmark>>) {
        self.lists.borrow_mut().push_back(reply);
    }

    pub fn push_bookmark(&self, reply: ApiResult<Bookmark>) {
        self.bookmarks.borrow_mut().push_back(reply);
    }

    pub fn push_unit(&self, reply: ApiResult<()>) {
        self.units.borrow_mut().push_back(reply);
    }

    pub fn push_search(&self, reply: ApiResult<Vec<SearchResult>>) {
        self.searches.borrow_mut().push_back(SearchReply::Ready(reply));
    }

    /// Queue a search reply that resolves when the returned sender fires
    pub fn defer_search(&self) -> oneshot::Sender<ApiResult<Vec<SearchResult>>> {
        let (tx, rx) = oneshot::channel();
        self.searches.borrow_mut().push_back(SearchReply::Deferred(rx));
        tx
    }

    pub fn push_analysis(&self, reply: ApiResult<AnalyzeUrlResponse>) {
        self.analyses.borrow_mut().push_back(reply);
    }

    pub fn push_import(&self, reply: ApiResult<ImportSummary>) {
        self.imports.borrow_mut().push_back(reply);
    }

    pub fn push_job(&self, reply: ApiResult<VectorizeJob>) {
        self.jobs.borrow_mut().push_back(reply);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

fn next<T>(queue: &RefCell<VecDeque<ApiResult<T>>>) -> ApiResult<T> {
    queue
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| Err(ApiError::Network("no reply scripted".to_string())))
}

#[async_trait(?Send)]
impl BookmarkApi for MockApi {
    async fn list_bookmarks(&self, skip: u32, limit: u32) -> ApiResult<Vec<Bookmark>> {
        self.record(format!("list {} {}", skip, limit));
        next(&self.lists)
    }

    async fn create_bookmark(&self, bookmark: &BookmarkCreate) -> ApiResult<Bookmark> {
        self.record(format!("create {}", bookmark.url));
        next(&self.bookmarks)
    }

    async fn get_bookmark(&self, id: i64) -> ApiResult<Bookmark> {
        self.record(format!("get {}", id));
        next(&self.bookmarks)
    }

    async fn update_bookmark(&self, id: i64, _update: &BookmarkUpdate) -> ApiResult<Bookmark> {
        self.record(format!("update {}", id));
        next(&self.bookmarks)
    }

    async fn delete_bookmark(&self, id: i64) -> ApiResult<()> {
        self.record(format!("delete {}", id));
        next(&self.units)
    }

    async fn search(&self, request: &SearchRequest) -> ApiResult<Vec<SearchResult>> {
        self.record(format!("search {} {:?}", request.query, request.limit));
        let reply = self.searches.borrow_mut().pop_front();
        match reply {
            Some(SearchReply::Ready(result)) => result,
            Some(SearchReply::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("reply dropped".to_string()))),
            None => Err(ApiError::Network("no reply scripted".to_string())),
        }
    }

    async fn analyze_url(&self, url: &str) -> ApiResult<AnalyzeUrlResponse> {
        self.record(format!("analyze {}", url));
        next(&self.analyses)
    }

    async fn enrich_bookmark(&self, id: i64) -> ApiResult<()> {
        self.record(format!("enrich {}", id));
        next(&self.units)
    }

    async fn upload_bookmarks(&self, file_name: &str, contents: Vec<u8>) -> ApiResult<ImportSummary> {
        self.record(format!("upload {} {}", file_name, contents.len()));
        next(&self.imports)
    }

    async fn batch_vectorize(&self) -> ApiResult<VectorizeJob> {
        self.record("batch-vectorize".to_string());
        next(&self.jobs)
    }

    async fn retrain_vectorizer(&self) -> ApiResult<VectorizeJob> {
        self.record("retrain-vectorizer".to_string());
        next(&self.jobs)
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        self.record("health".to_string());
        Ok(HealthStatus {
            status: "healthy".to_string(),
        })
    }
}
