/// Background service worker entry: message relay and content script injection
use crate::api::HttpApiClient;
use crate::bridge;
use crate::config::ApiConfig;
use crate::relay::{self, RelayEnvelope, RelayResponse};
use log::{debug, info, warn};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

/// Created once by the background script and kept for its lifetime
#[wasm_bindgen]
pub struct BackgroundRelay {
    api: Rc<HttpApiClient>,
}

#[wasm_bindgen]
impl BackgroundRelay {
    #[wasm_bindgen(constructor)]
    pub fn new() -> BackgroundRelay {
        BackgroundRelay {
            api: Rc::new(HttpApiClient::new(ApiConfig::default())),
        }
    }

    /// Handle a `{type, data}` message.
    ///
    /// Returns a Promise that always resolves to the response envelope for
    /// message types that are answered, and `undefined` for anything else.
    #[wasm_bindgen(js_name = handleMessage)]
    pub fn handle_message(&self, message: JsValue) -> JsValue {
        let envelope: RelayEnvelope = match serde_wasm_bindgen::from_value(message) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!("Ignoring message without a type: {:?}", e);
                return JsValue::UNDEFINED;
            }
        };

        if !relay::expects_reply(&envelope.kind) {
            warn!("Ignoring unknown message type: {}", envelope.kind);
            return JsValue::UNDEFINED;
        }

        let api = self.api.clone();
        future_to_promise(async move {
            let response = relay::dispatch_envelope(api.as_ref(), envelope).await;
            Ok(response.map(to_js_or_failure).unwrap_or(JsValue::UNDEFINED))
        })
        .into()
    }

    /// Inject the content script once a recognized search page finishes loading
    #[wasm_bindgen(js_name = handleTabUpdated)]
    pub fn handle_tab_updated(&self, tab_id: i32, status: &str, url: &str) -> bool {
        if status != "complete" || !relay::should_inject(url) {
            return false;
        }

        debug!("Injecting content script into tab {}", tab_id);
        spawn_local(async move {
            if let Err(e) = bridge::inject_content_script(tab_id).await {
                warn!("{}", e);
            }
        });
        true
    }
}

impl BackgroundRelay {
    /// Register the runtime message and tab update listeners. They live as long
    /// as the service worker does.
    pub fn listen(self) {
        let relay = Rc::new(self);

        let on_message = {
            let relay = relay.clone();
            Closure::<dyn FnMut(JsValue) -> JsValue>::new(move |message| relay.handle_message(message))
        };
        let on_tab_updated = Closure::<dyn FnMut(i32, String, String)>::new(
            move |tab_id: i32, status: String, url: String| {
                relay.handle_tab_updated(tab_id, &status, &url);
            },
        );

        bridge::on_runtime_message(&on_message);
        bridge::on_tab_updated(&on_tab_updated);
        on_message.forget();
        on_tab_updated.forget();

        info!("Background relay listening");
    }
}

impl Default for BackgroundRelay {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js_or_failure(response: RelayResponse) -> JsValue {
    bridge::to_js(&response)
        .or_else(|e| bridge::to_js(&RelayResponse::failure(e)))
        .unwrap_or(JsValue::UNDEFINED)
}
