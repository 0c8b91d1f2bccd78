//! HTTP client for the bookmark service.

use super::error::{ApiResult, classify};
use crate::bookmark_data::{
    AnalyzeUrlRequest, AnalyzeUrlResponse, Bookmark, BookmarkCreate, BookmarkUpdate,
    HealthStatus, ImportSummary, SearchRequest, SearchResult, VectorizeJob,
};
use crate::config::ApiConfig;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// One method per backend capability.
///
/// Implementations do not retry or cache; a failed call surfaces one
/// classified [`ApiError`](super::ApiError).
#[async_trait(?Send)]
pub trait BookmarkApi {
    async fn list_bookmarks(&self, skip: u32, limit: u32) -> ApiResult<Vec<Bookmark>>;

    async fn create_bookmark(&self, bookmark: &BookmarkCreate) -> ApiResult<Bookmark>;

    async fn get_bookmark(&self, id: i64) -> ApiResult<Bookmark>;

    async fn update_bookmark(&self, id: i64, update: &BookmarkUpdate) -> ApiResult<Bookmark>;

    async fn delete_bookmark(&self, id: i64) -> ApiResult<()>;

    async fn search(&self, request: &SearchRequest) -> ApiResult<Vec<SearchResult>>;

    async fn analyze_url(&self, url: &str) -> ApiResult<AnalyzeUrlResponse>;

    async fn enrich_bookmark(&self, id: i64) -> ApiResult<()>;

    /// Import a browser bookmarks export (HTML)
    async fn upload_bookmarks(&self, file_name: &str, contents: Vec<u8>) -> ApiResult<ImportSummary>;

    async fn batch_vectorize(&self) -> ApiResult<VectorizeJob>;

    async fn retrain_vectorizer(&self) -> ApiResult<VectorizeJob>;

    async fn health(&self) -> ApiResult<HealthStatus>;
}

/// Backend routes, relative to the API base unless noted
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Route {
    ListBookmarks,
    CreateBookmark,
    GetBookmark(i64),
    UpdateBookmark(i64),
    DeleteBookmark(i64),
    Search,
    AnalyzeUrl,
    EnrichBookmark(i64),
    UploadBookmarks,
    BatchVectorize,
    RetrainVectorizer,
    /// Served from the server root
    Health,
}

impl Route {
    pub(crate) fn method(&self) -> Method {
        match self {
            Route::ListBookmarks | Route::GetBookmark(_) | Route::Health => Method::GET,
            Route::UpdateBookmark(_) => Method::PUT,
            Route::DeleteBookmark(_) => Method::DELETE,
            Route::CreateBookmark
            | Route::Search
            | Route::AnalyzeUrl
            | Route::EnrichBookmark(_)
            | Route::UploadBookmarks
            | Route::BatchVectorize
            | Route::RetrainVectorizer => Method::POST,
        }
    }

    pub(crate) fn url(&self, config: &ApiConfig) -> String {
        let path = match self {
            Route::ListBookmarks | Route::CreateBookmark => "bookmarks".to_string(),
            Route::GetBookmark(id) | Route::UpdateBookmark(id) | Route::DeleteBookmark(id) => {
                format!("bookmarks/{}", id)
            }
            Route::Search => "search/".to_string(),
            Route::AnalyzeUrl => "search/analyze-url".to_string(),
            Route::EnrichBookmark(id) => format!("bookmarks/{}/enrich", id),
            Route::UploadBookmarks => "bookmarks/upload".to_string(),
            Route::BatchVectorize => "bookmarks/batch-vectorize".to_string(),
            Route::RetrainVectorizer => "bookmarks/retrain-vectorizer".to_string(),
            Route::Health => return config.health_url(),
        };
        config.endpoint(&path)
    }

    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    pub(crate) fn timeout(&self, config: &ApiConfig) -> Duration {
        match self {
            Route::UploadBookmarks => config.upload_timeout,
            Route::BatchVectorize | Route::RetrainVectorizer => config.bulk_timeout,
            _ => config.timeout,
        }
    }
}

/// [`BookmarkApi`] over `reqwest`
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub(crate) fn request(&self, route: Route) -> RequestBuilder {
        let method = route.method();
        let url = route.url(&self.config);
        debug!("{} {}", method, url);

        let request = self.client.request(method, url);

        // fetch() has no per-request timeout knob in reqwest's wasm backend
        #[cfg(not(target_arch = "wasm32"))]
        let request = request.timeout(route.timeout(&self.config));

        request
    }

    /// Send the request and turn any non-2xx response into a classified error
    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await.map_err(|e| {
            warn!("Request failed before a response arrived: {}", e);
            super::ApiError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = classify(status.as_u16(), &body);
        warn!("Backend returned {}: {}", status, error);
        Err(error)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait(?Send)]
impl BookmarkApi for HttpApiClient {
    async fn list_bookmarks(&self, skip: u32, limit: u32) -> ApiResult<Vec<Bookmark>> {
        let request = self
            .request(Route::ListBookmarks)
            .query(&[("skip", skip), ("limit", limit)]);
        self.send_json(request).await
    }

    async fn create_bookmark(&self, bookmark: &BookmarkCreate) -> ApiResult<Bookmark> {
        let request = self.request(Route::CreateBookmark).json(bookmark);
        self.send_json(request).await
    }

    async fn get_bookmark(&self, id: i64) -> ApiResult<Bookmark> {
        self.send_json(self.request(Route::GetBookmark(id))).await
    }

    async fn update_bookmark(&self, id: i64, update: &BookmarkUpdate) -> ApiResult<Bookmark> {
        let request = self.request(Route::UpdateBookmark(id)).json(update);
        self.send_json(request).await
    }

    async fn delete_bookmark(&self, id: i64) -> ApiResult<()> {
        self.send(self.request(Route::DeleteBookmark(id))).await.map(|_| ())
    }

    async fn search(&self, request: &SearchRequest) -> ApiResult<Vec<SearchResult>> {
        let request = self.request(Route::Search).json(request);
        self.send_json(request).await
    }

    async fn analyze_url(&self, url: &str) -> ApiResult<AnalyzeUrlResponse> {
        let body = AnalyzeUrlRequest {
            url: url.to_string(),
        };
        let request = self.request(Route::AnalyzeUrl).json(&body);
        self.send_json(request).await
    }

    async fn enrich_bookmark(&self, id: i64) -> ApiResult<()> {
        self.send(self.request(Route::EnrichBookmark(id))).await.map(|_| ())
    }

    async fn upload_bookmarks(&self, file_name: &str, contents: Vec<u8>) -> ApiResult<ImportSummary> {
        let file = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/html")?;
        let request = self
            .request(Route::UploadBookmarks)
            .multipart(Form::new().part("file", file));
        self.send_json(request).await
    }

    async fn batch_vectorize(&self) -> ApiResult<VectorizeJob> {
        self.send_json(self.request(Route::BatchVectorize)).await
    }

    async fn retrain_vectorizer(&self) -> ApiResult<VectorizeJob> {
        self.send_json(self.request(Route::RetrainVectorizer)).await
    }

    async fn health(&self) -> ApiResult<HealthStatus> {
        self.send_json(self.request(Route::Health)).await
    }
}
