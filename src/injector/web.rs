/// Browser-backed `HostPage` and `RecommendationSource`
use super::{HostPage, RecommendationEntry, RecommendationSource, WIDGET_MARKER};
use crate::bridge;
use crate::relay::{RelayMessage, RelayResponse};
use crate::ui::recommendations::{RecommendationCard, RecommendationCardProps};
use async_trait::async_trait;
use log::warn;
use wasm_bindgen::JsValue;
use web_sys::{Document, Window};

/// Global set once a content script instance owns the page
const LOADED_FLAG: &str = "__bookmarkRecommenderLoaded";

pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new() -> Option<WebPage> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(WebPage { window, document })
    }
}

impl HostPage for WebPage {
    fn location(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn claim(&self) -> bool {
        let key = JsValue::from_str(LOADED_FLAG);
        let already_loaded = js_sys::Reflect::get(&self.window, &key)
            .map(|value| value.is_truthy())
            .unwrap_or(false);

        if already_loaded {
            return false;
        }

        js_sys::Reflect::set(&self.window, &key, &JsValue::TRUE).unwrap_or(false)
    }

    fn has_widget(&self) -> bool {
        self.document.get_element_by_id(WIDGET_MARKER).is_some()
    }

    fn has_anchor(&self, selector: &str) -> bool {
        matches!(self.document.query_selector(selector), Ok(Some(_)))
    }

    fn mount(&self, selector: &str, entries: Vec<RecommendationEntry>) -> bool {
        let Ok(Some(anchor)) = self.document.query_selector(selector) else {
            return false;
        };

        let container = match self.document.create_element("div") {
            Ok(container) => container,
            Err(e) => {
                warn!("Failed to create widget container: {:?}", e);
                return false;
            }
        };
        container.set_id(WIDGET_MARKER);

        if let Err(e) = anchor.insert_adjacent_element("afterend", &container) {
            warn!("Failed to insert widget: {:?}", e);
            return false;
        }

        yew::Renderer::<RecommendationCard>::with_root_and_props(
            container,
            RecommendationCardProps { entries },
        )
        .render();

        true
    }
}

/// Asks the background relay over `chrome.runtime.sendMessage`
pub struct RelaySource;

#[async_trait(?Send)]
impl RecommendationSource for RelaySource {
    async fn recommendations(&self, query: &str) -> Result<RelayResponse, String> {
        let message = RelayMessage::GetRecommendations(query.to_string());
        bridge::send_message(&message)
            .await?
            .ok_or_else(|| "No response from background".to_string())
    }
}
