/// Data structures exchanged with the bookmark service
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A saved bookmark as owned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bookmark {
    pub id: i64,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub access_count: i64,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub last_accessed: Option<DateTime<Utc>>,
}

/// Outbound payload for creating a bookmark
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookmarkCreate {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BookmarkCreate {
    pub fn new(url: String, title: String, description: Option<String>) -> BookmarkCreate {
        BookmarkCreate {
            url,
            title,
            description,
        }
    }
}

/// Partial update; only the fields that are set are sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookmarkUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Search query sent to the backend
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl SearchRequest {
    /// Build a request, rejecting blank queries and a zero limit
    pub fn new(query: &str, limit: Option<u32>) -> Option<SearchRequest> {
        let query = query.trim();
        if query.is_empty() || limit == Some(0) {
            return None;
        }

        Some(SearchRequest {
            query: query.to_string(),
            limit,
        })
    }
}

/// A bookmark ranked against a query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub bookmark: Bookmark,
    pub relevance_score: f64,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalyzeUrlRequest {
    pub url: String,
}

/// Metadata the backend extracted from a page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeUrlResponse {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.to_lowercase().as_str(), "ok" | "healthy")
    }
}

/// Acknowledgement for a vectorization job started in the background
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VectorizeJob {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub total_bookmarks: u64,
}

/// Outcome of importing a browser bookmarks export
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImportSummary {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub count: u64,
}

/// Parse an ISO-8601 timestamp; values without an offset are taken as UTC
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
        None => Ok(None),
    }
}

#[cfg(test)]
pub(crate) fn sample_bookmark(id: i64, created_at: &str) -> Bookmark {
    let created_at = parse_timestamp(created_at).unwrap();
    Bookmark {
        id,
        url: format!("https://example.com/{}", id),
        title: format!("Bookmark {}", id),
        description: None,
        content: None,
        keywords: None,
        created_at,
        updated_at: created_at,
        access_count: 0,
        last_accessed: None,
    }
}
