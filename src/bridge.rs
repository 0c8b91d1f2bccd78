/// Rust side of the chrome.* bridge in js/bridge.js
use crate::relay::{RelayMessage, RelayResponse};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(module = "/js/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn injectContentScript(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn activeTab() -> Result<JsValue, JsValue>;

    fn onRuntimeMessage(handler: &Closure<dyn FnMut(JsValue) -> JsValue>);

    fn onTabUpdated(handler: &Closure<dyn FnMut(i32, String, String)>);
}

/// URL and title of the focused tab
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ActiveTab {
    pub url: String,
    pub title: String,
}

/// Serialize for JS, keeping maps as plain objects
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("Failed to serialize: {:?}", e))
}

/// Send a message to the background relay.
///
/// `Ok(None)` means the relay did not answer (unknown message type).
pub async fn send_message(message: &RelayMessage) -> Result<Option<RelayResponse>, String> {
    let message_js = to_js(&message.envelope())?;

    let response_js = sendRuntimeMessage(message_js)
        .await
        .map_err(|e| format!("Failed to reach background: {:?}", e))?;

    if response_js.is_null() || response_js.is_undefined() {
        return Ok(None);
    }

    serde_wasm_bindgen::from_value(response_js)
        .map(Some)
        .map_err(|e| format!("Failed to parse response: {:?}", e))
}

pub async fn inject_content_script(tab_id: i32) -> Result<(), String> {
    injectContentScript(tab_id)
        .await
        .map(|_| ())
        .map_err(|e| format!("Failed to inject into tab {}: {:?}", tab_id, e))
}

pub async fn active_tab() -> Result<ActiveTab, String> {
    let tab_js = activeTab()
        .await
        .map_err(|e| format!("Failed to get active tab: {:?}", e))?;

    serde_wasm_bindgen::from_value(tab_js).map_err(|e| format!("Failed to parse tab: {:?}", e))
}

/// Register a `chrome.runtime.onMessage` handler. A returned Promise keeps the
/// response channel open until it settles; `undefined` sends no response.
pub fn on_runtime_message(handler: &Closure<dyn FnMut(JsValue) -> JsValue>) {
    onRuntimeMessage(handler);
}

/// Register a `chrome.tabs.onUpdated` handler taking `(tab_id, status, url)`
pub fn on_tab_updated(handler: &Closure<dyn FnMut(i32, String, String)>) {
    onTabUpdated(handler);
}
