/// Reusable dashboard components and store hooks

use crate::bookmark_data::Bookmark;
use crate::stores::{BookmarkState, BookmarkStore, SearchState, SearchStore};
use patternfly_yew::prelude::*;
use std::rc::Rc;
use yew::prelude::*;

/// Re-render whenever the bookmark store changes
#[hook]
pub fn use_bookmark_state(store: Rc<BookmarkStore>) -> BookmarkState {
    let state = use_state(|| store.state());

    {
        let state = state.clone();
        use_effect_with((), move |_| {
            let source = store.clone();
            let id = store.subscribe(Callback::from(move |_| state.set(source.state())));
            move || {
                store.unsubscribe(id);
            }
        });
    }

    (*state).clone()
}

/// Re-render whenever the search store changes
#[hook]
pub fn use_search_state(store: Rc<SearchStore>) -> SearchState {
    let state = use_state(|| store.state());

    {
        let state = state.clone();
        use_effect_with((), move |_| {
            let source = store.clone();
            let id = store.subscribe(Callback::from(move |_| state.set(source.state())));
            move || {
                store.unsubscribe(id);
            }
        });
    }

    (*state).clone()
}

#[derive(Properties, PartialEq)]
pub struct BookmarkRowProps {
    pub bookmark: Bookmark,
    #[prop_or(false)]
    pub disabled: bool,
    #[prop_or_default]
    pub on_delete: Option<Callback<i64>>,
    #[prop_or_default]
    pub on_enrich: Option<Callback<i64>>,
}

#[function_component(BookmarkRow)]
pub fn bookmark_row(props: &BookmarkRowProps) -> Html {
    let bookmark = &props.bookmark;
    let id = bookmark.id;

    html! {
        <div class="bookmark-item">
            <div class="bookmark-content">
                <a class="bookmark-title" href={bookmark.url.clone()} target="_blank" rel="noopener noreferrer">
                    {&bookmark.title}
                </a>
                <div class="bookmark-url">{&bookmark.url}</div>
                if let Some(description) = &bookmark.description {
                    <p class="bookmark-description">{description}</p>
                }
                if let Some(keywords) = &bookmark.keywords {
                    <div class="bookmark-keywords">
                        {for keywords.iter().map(|keyword| html! {
                            <span class="keyword-chip">{keyword}</span>
                        })}
                    </div>
                }
                <p class="bookmark-meta">
                    {format!("{} • {} visits", bookmark.created_at.format("%Y-%m-%d %H:%M"), bookmark.access_count)}
                </p>
            </div>
            <div class="bookmark-actions">
                if let Some(on_enrich) = &props.on_enrich {
                    <Button
                        onclick={on_enrich.reform(move |_| id)}
                        disabled={props.disabled}
                        variant={ButtonVariant::Secondary}
                    >
                        {"✨"}
                    </Button>
                }
                if let Some(on_delete) = &props.on_delete {
                    <Button
                        onclick={on_delete.reform(move |_| id)}
                        disabled={props.disabled}
                        variant={ButtonVariant::Danger}
                    >
                        {"🗑️"}
                    </Button>
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct HealthBadgeProps {
    pub healthy: Option<bool>,
}

#[function_component(HealthBadge)]
pub fn health_badge(props: &HealthBadgeProps) -> Html {
    let (label, color) = match props.healthy {
        Some(true) => ("API online", "#4caf50"),
        Some(false) => ("API offline", "#f44336"),
        None => ("Checking API...", "#9e9e9e"),
    };

    html! {
        <span style={format!("padding: 2px 8px; border-radius: 4px; color: white; font-size: 12px; background-color: {};", color)}>
            {label}
        </span>
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorAlertProps {
    pub message: Option<String>,
}

/// Danger alert for a store error; validation errors keep their line breaks
#[function_component(ErrorAlert)]
pub fn error_alert(props: &ErrorAlertProps) -> Html {
    match &props.message {
        Some(message) => html! {
            <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                {for message.lines().map(|line| html! { <p class="message-paragraph">{line}</p> })}
            </Alert>
        },
        None => html! {},
    }
}
