/// Extension popup: save the current page as a bookmark

use crate::bookmark_data::{Bookmark, BookmarkCreate};
use crate::bridge;
use crate::relay::RelayMessage;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Saving,
    Saved(String),
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Idle);

    let on_save = {
        let state = state.clone();

        Callback::from(move |_| {
            let state = state.clone();

            state.set(AppState::Saving);

            spawn_local(async move {
                match save_active_tab().await {
                    Ok(bookmark) => {
                        state.set(AppState::Saved(bookmark.title));
                    }
                    Err(e) => {
                        state.set(AppState::Error(e));
                    }
                }
            });
        })
    };

    let is_busy = matches!(*state, AppState::Saving);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Bookmark Recommender"}</h1>

            <Button onclick={on_save} disabled={is_busy} variant={ButtonVariant::Primary} block={true}>
                {"⭐ Save this page"}
            </Button>

            {match &*state {
                AppState::Saving => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Saving..."}</p>
                    </div>
                },
                AppState::Saved(title) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Success} title={"Saved"} inline={true}>
                            {title.clone()}
                        </Alert>
                    </div>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            <p class="footer-popup">
                {concat!("Bookmark Recommender v", env!("CARGO_PKG_VERSION"))}
            </p>
        </div>
    }
}

// Helper functions

async fn save_active_tab() -> Result<Bookmark, String> {
    let tab = bridge::active_tab().await?;

    if !tab.url.starts_with("http://") && !tab.url.starts_with("https://") {
        return Err(format!("Cannot bookmark {}", tab.url));
    }

    let title = if tab.title.trim().is_empty() {
        tab.url.clone()
    } else {
        tab.title.clone()
    };
    let message = RelayMessage::SaveBookmark(BookmarkCreate::new(tab.url, title, None));

    let response = bridge::send_message(&message)
        .await?
        .ok_or_else(|| "No response from background".to_string())?;

    match response {
        response if response.success => response
            .bookmark
            .ok_or_else(|| "Background did not return the saved bookmark".to_string()),
        response => Err(response.error.unwrap_or_else(|| "Unknown error".to_string())),
    }
}
