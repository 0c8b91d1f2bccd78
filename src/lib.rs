/// Bookmark Recommender - Bookmark dashboard and search-page recommendations
/// Built with Rust + WASM + Yew

pub mod api;
pub mod background;
pub mod bookmark_data;
mod bridge;
pub mod config;
pub mod injector;
pub mod relay;
pub mod search_engines;
pub mod stores;
pub mod ui;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

pub use background::BackgroundRelay;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the bookmark dashboard
#[wasm_bindgen]
pub fn start_dashboard() {
    yew::Renderer::<ui::dashboard::Dashboard>::new().render();
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Background service worker entry point; registers the relay listeners
#[wasm_bindgen]
pub fn start_background() {
    BackgroundRelay::new().listen();
}

// Content script entry point; runs the injector once for this page
#[wasm_bindgen]
pub fn run_content_script() {
    spawn_local(async {
        let Some(page) = injector::WebPage::new() else {
            return;
        };

        let outcome = injector::run(&page, &injector::RelaySource).await;
        log::debug!("Recommendation injector finished: {:?}", outcome);
    });
}

// Re-export search page detection for JavaScript access
#[wasm_bindgen]
pub fn is_search_page(url: &str) -> bool {
    relay::should_inject(url)
}
