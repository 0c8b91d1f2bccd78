/// Background message relay between page scripts and the bookmark service
use crate::api::BookmarkApi;
use crate::bookmark_data::{Bookmark, BookmarkCreate, SearchRequest, SearchResult};
use crate::search_engines::SearchEngine;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How many recommendations a results page asks for
pub const RECOMMENDATION_LIMIT: u32 = 5;

pub const SAVE_BOOKMARK: &str = "SAVE_BOOKMARK";
pub const GET_RECOMMENDATIONS: &str = "GET_RECOMMENDATIONS";

/// Wire shape of a message: `{type, data}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RelayMessage {
    SaveBookmark(BookmarkCreate),
    GetRecommendations(String),
    Unknown(String),
}

impl RelayMessage {
    /// Decode an envelope; a known type with an unusable payload is an error
    pub fn from_envelope(envelope: RelayEnvelope) -> Result<RelayMessage, String> {
        match envelope.kind.as_str() {
            SAVE_BOOKMARK => serde_json::from_value(envelope.data)
                .map(RelayMessage::SaveBookmark)
                .map_err(|e| format!("Invalid bookmark data: {}", e)),
            GET_RECOMMENDATIONS => match envelope.data {
                Value::String(query) => Ok(RelayMessage::GetRecommendations(query)),
                other => Err(format!("Invalid recommendation query: {}", other)),
            },
            _ => Ok(RelayMessage::Unknown(envelope.kind)),
        }
    }

    pub fn envelope(&self) -> RelayEnvelope {
        match self {
            RelayMessage::SaveBookmark(bookmark) => RelayEnvelope {
                kind: SAVE_BOOKMARK.to_string(),
                data: serde_json::to_value(bookmark).unwrap_or(Value::Null),
            },
            RelayMessage::GetRecommendations(query) => RelayEnvelope {
                kind: GET_RECOMMENDATIONS.to_string(),
                data: Value::String(query.clone()),
            },
            RelayMessage::Unknown(kind) => RelayEnvelope {
                kind: kind.clone(),
                data: Value::Null,
            },
        }
    }
}

/// Discriminated reply: `{success: true, ...}` or `{success: false, error}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<Bookmark>,
    #[serde(rename = "recommendations", default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<SearchResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    pub fn saved(bookmark: Bookmark) -> RelayResponse {
        RelayResponse {
            success: true,
            bookmark: Some(bookmark),
            results: None,
            error: None,
        }
    }

    pub fn recommendations(results: Vec<SearchResult>) -> RelayResponse {
        RelayResponse {
            success: true,
            bookmark: None,
            results: Some(results),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> RelayResponse {
        RelayResponse {
            success: false,
            bookmark: None,
            results: None,
            error: Some(error.into()),
        }
    }
}

/// Handle one message. `None` means no response is sent.
pub async fn dispatch(api: &dyn BookmarkApi, message: RelayMessage) -> Option<RelayResponse> {
    match message {
        RelayMessage::SaveBookmark(bookmark) => {
            debug!("Saving bookmark for {}", bookmark.url);
            let response = match api.create_bookmark(&bookmark).await {
                Ok(saved) => {
                    info!("Saved bookmark {} ({})", saved.id, saved.url);
                    RelayResponse::saved(saved)
                }
                Err(e) => RelayResponse::failure(e.to_string()),
            };
            Some(response)
        }
        RelayMessage::GetRecommendations(query) => {
            let Some(request) = SearchRequest::new(&query, Some(RECOMMENDATION_LIMIT)) else {
                return Some(RelayResponse::recommendations(Vec::new()));
            };

            let response = match api.search(&request).await {
                Ok(results) => {
                    debug!("{} recommendations for '{}'", results.len(), request.query);
                    RelayResponse::recommendations(results)
                }
                Err(e) => RelayResponse::failure(e.to_string()),
            };
            Some(response)
        }
        RelayMessage::Unknown(kind) => {
            warn!("Ignoring unknown message type: {}", kind);
            None
        }
    }
}

/// Decode and handle a raw envelope
pub async fn dispatch_envelope(api: &dyn BookmarkApi, envelope: RelayEnvelope) -> Option<RelayResponse> {
    match RelayMessage::from_envelope(envelope) {
        Ok(message) => dispatch(api, message).await,
        Err(e) => {
            warn!("Rejecting malformed message: {}", e);
            Some(RelayResponse::failure(e))
        }
    }
}

/// Whether a message type is answered. The listener keeps the response channel
/// open only for these.
pub fn expects_reply(kind: &str) -> bool {
    matches!(kind, SAVE_BOOKMARK | GET_RECOMMENDATIONS)
}

/// Whether a freshly loaded tab should receive the content script
pub fn should_inject(url: &str) -> bool {
    SearchEngine::detect(url).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::api::mock::MockApi;
    use crate::bookmark_data::sample_bookmark;
    use serde_json::json;

    fn result(id: i64, score: f64) -> SearchResult {
        SearchResult {
            bookmark: sample_bookmark(id, "2024-01-01T00:00:00Z"),
            relevance_score: score,
            matched_keywords: vec!["rust".to_string()],
        }
    }

    #[test]
    fn test_envelope_decoding() {
        let save: RelayEnvelope = serde_json::from_value(json!({
            "type": "SAVE_BOOKMARK",
            "data": {"url": "https://example.com", "title": "Example"}
        }))
        .unwrap();
        assert_eq!(
            RelayMessage::from_envelope(save),
            Ok(RelayMessage::SaveBookmark(BookmarkCreate::new(
                "https://example.com".to_string(),
                "Example".to_string(),
                None
            )))
        );

        let recommend: RelayEnvelope =
            serde_json::from_value(json!({"type": "GET_RECOMMENDATIONS", "data": "rust"})).unwrap();
        assert_eq!(
            RelayMessage::from_envelope(recommend),
            Ok(RelayMessage::GetRecommendations("rust".to_string()))
        );

        let unknown: RelayEnvelope = serde_json::from_value(json!({"type": "PING"})).unwrap();
        assert_eq!(
            RelayMessage::from_envelope(unknown),
            Ok(RelayMessage::Unknown("PING".to_string()))
        );
    }

    #[test]
    fn test_envelope_with_bad_payload() {
        let envelope: RelayEnvelope =
            serde_json::from_value(json!({"type": "SAVE_BOOKMARK", "data": {"title": "no url"}})).unwrap();
        assert!(RelayMessage::from_envelope(envelope).is_err());

        let envelope: RelayEnvelope =
            serde_json::from_value(json!({"type": "GET_RECOMMENDATIONS", "data": 42})).unwrap();
        assert!(RelayMessage::from_envelope(envelope).is_err());
    }

    #[test]
    fn test_message_envelope_roundtrip() {
        let message = RelayMessage::GetRecommendations("rust systems".to_string());
        assert_eq!(RelayMessage::from_envelope(message.envelope()), Ok(message));
    }

    #[test]
    fn test_response_wire_shape() {
        let failure = serde_json::to_value(RelayResponse::failure("Resource not found")).unwrap();
        assert_eq!(failure, json!({"success": false, "error": "Resource not found"}));

        let empty = serde_json::to_value(RelayResponse::recommendations(Vec::new())).unwrap();
        assert_eq!(empty, json!({"success": true, "recommendations": []}));

        let decoded: RelayResponse = serde_json::from_value(json!({
            "success": true,
            "recommendations": [serde_json::to_value(result(4, 0.5)).unwrap()]
        }))
        .unwrap();
        assert_eq!(decoded.results.map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_expects_reply() {
        assert!(expects_reply(SAVE_BOOKMARK));
        assert!(expects_reply(GET_RECOMMENDATIONS));
        assert!(!expects_reply("PING"));
        assert!(!expects_reply(""));
    }

    #[tokio::test]
    async fn test_save_bookmark_success() {
        let api = MockApi::new();
        api.push_bookmark(Ok(sample_bookmark(12, "2024-01-01T00:00:00Z")));

        let message = RelayMessage::SaveBookmark(BookmarkCreate::new(
            "https://example.com/12".to_string(),
            "Twelve".to_string(),
            None,
        ));
        let response = dispatch(&api, message).await.unwrap();

        assert!(response.success);
        assert_eq!(response.bookmark.map(|b| b.id), Some(12));
        assert_eq!(api.calls(), vec!["create https://example.com/12"]);
    }

    #[tokio::test]
    async fn test_save_bookmark_failure_still_responds() {
        let api = MockApi::new();
        api.push_bookmark(Err(ApiError::Validation("field required".to_string())));

        let message = RelayMessage::SaveBookmark(BookmarkCreate::new(String::new(), String::new(), None));
        let response = dispatch(&api, message).await.unwrap();

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("field required"));
    }

    #[tokio::test]
    async fn test_recommendations_use_fixed_limit() {
        let api = MockApi::new();
        api.push_search(Ok(vec![result(1, 0.91), result(2, 0.42)]));

        let response = dispatch(&api, RelayMessage::GetRecommendations(" rust ".to_string()))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.results.map(|r| r.len()), Some(2));
        assert_eq!(api.calls(), vec!["search rust Some(5)"]);
    }

    #[tokio::test]
    async fn test_recommendations_network_failure() {
        let api = MockApi::new();
        api.push_search(Err(ApiError::Network("offline".to_string())));

        let response = dispatch(&api, RelayMessage::GetRecommendations("rust".to_string()))
            .await
            .unwrap();

        assert!(!response.success);
        assert_eq!(
            response.error.as_deref(),
            Some("Network error: unable to reach the server")
        );
    }

    #[tokio::test]
    async fn test_blank_query_skips_backend() {
        let api = MockApi::new();

        let response = dispatch(&api, RelayMessage::GetRecommendations("   ".to_string()))
            .await
            .unwrap();

        assert_eq!(response, RelayResponse::recommendations(Vec::new()));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_message_gets_no_response() {
        let api = MockApi::new();
        assert!(dispatch(&api, RelayMessage::Unknown("PING".to_string())).await.is_none());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_envelope_gets_failure() {
        let api = MockApi::new();
        let envelope = RelayEnvelope {
            kind: GET_RECOMMENDATIONS.to_string(),
            data: Value::Null,
        };

        let response = dispatch_envelope(&api, envelope).await.unwrap();
        assert!(!response.success);
    }

    #[test]
    fn test_should_inject() {
        assert!(should_inject("https://www.google.com/search?q=rust"));
        assert!(should_inject("https://www.baidu.com/s?wd=rust"));
        assert!(!should_inject("https://www.google.com/"));
        assert!(!should_inject("chrome://extensions"));
    }
}
