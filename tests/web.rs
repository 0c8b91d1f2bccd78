//! Browser tests for the DOM side of the injector (`wasm-pack test --headless --chrome`)
#![cfg(target_arch = "wasm32")]

use bookmark_recommender::BackgroundRelay;
use bookmark_recommender::injector::{HostPage, RecommendationEntry, WIDGET_MARKER, WebPage};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn entry(title: &str, score_label: &str) -> RecommendationEntry {
    RecommendationEntry {
        title: title.to_string(),
        url: format!("https://example.com/{}", title),
        description: None,
        score_label: score_label.to_string(),
    }
}

fn message(value: serde_json::Value) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap()
}

fn add_anchor(id: &str) {
    let document = web_sys::window().unwrap().document().unwrap();
    let anchor = document.create_element("div").unwrap();
    anchor.set_id(id);
    document.body().unwrap().append_child(&anchor).unwrap();
}

#[wasm_bindgen_test]
fn test_claim_only_once_per_page() {
    let page = WebPage::new().unwrap();
    let other_instance = WebPage::new().unwrap();

    assert!(page.claim());
    assert!(!other_instance.claim());
}

#[wasm_bindgen_test]
fn test_mount_inserts_single_marked_widget() {
    add_anchor("search");
    let page = WebPage::new().unwrap();

    assert!(page.has_anchor("#search"));
    assert!(!page.has_anchor("#does-not-exist"));
    assert!(!page.has_widget());

    assert!(page.mount("#search", vec![entry("rust", "91%"), entry("tokio", "42%")]));
    assert!(page.has_widget());

    let document = web_sys::window().unwrap().document().unwrap();
    let anchor = document.get_element_by_id("search").unwrap();
    let widget = anchor.next_element_sibling().unwrap();
    assert_eq!(widget.id(), WIDGET_MARKER);
    assert!(anchor.first_element_child().is_none());
}

#[wasm_bindgen_test]
fn test_mount_without_anchor_fails_quietly() {
    let page = WebPage::new().unwrap();
    assert!(!page.mount("#missing-anchor", vec![entry("rust", "91%")]));
}

#[wasm_bindgen_test]
fn test_relay_answers_only_known_messages() {
    let relay = BackgroundRelay::new();

    let unknown = message(serde_json::json!({"type": "PING"}));
    assert!(relay.handle_message(unknown).is_undefined());

    let untyped = message(serde_json::json!({"data": "rust"}));
    assert!(relay.handle_message(untyped).is_undefined());

    // blank query answers without reaching the backend
    let known = message(serde_json::json!({"type": "GET_RECOMMENDATIONS", "data": "  "}));
    assert!(relay.handle_message(known).is_instance_of::<js_sys::Promise>());
}
