/// Bookmark dashboard

use crate::api::HttpApiClient;
use crate::bookmark_data::BookmarkCreate;
use crate::config::ApiConfig;
use crate::injector::RecommendationEntry;
use crate::stores::AppStores;
use crate::ui::components::{BookmarkRow, ErrorAlert, HealthBadge, use_bookmark_state, use_search_state};
use crate::ui::recommendations::ScoreBadge;
use log::{info, warn};
use patternfly_yew::prelude::*;
use std::rc::Rc;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{File, HtmlInputElement};
use yew::prelude::*;

/// How many bookmarks the dashboard loads
const PAGE_SIZE: u32 = 100;

#[derive(Clone, PartialEq)]
enum ActiveTab {
    All,
    Recent,
    Search,
}

/// Root component: creates the stores once and provides them to the pages
#[function_component(Dashboard)]
pub fn dashboard() -> Html {
    let stores = use_memo((), |_| {
        let api = HttpApiClient::new(ApiConfig::default());
        info!("Using bookmark API at {}", api.config().base_url());
        AppStores::new(Rc::new(api))
    });

    html! {
        <ContextProvider<AppStores> context={(*stores).clone()}>
            <DashboardPage />
        </ContextProvider<AppStores>>
    }
}

#[function_component(DashboardPage)]
fn dashboard_page() -> Html {
    let stores = use_context::<AppStores>().expect("rendered inside Dashboard");
    let bookmark_state = use_bookmark_state(stores.bookmarks.clone());
    let active_tab = use_state(|| ActiveTab::All);
    let notice = use_state(|| None::<String>);

    // Load bookmarks and check the backend on mount
    {
        let store = stores.bookmarks.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                store.check_health().await;
                store.fetch_bookmarks(0, PAGE_SIZE).await;
            });
            || ()
        });
    }

    let on_delete = {
        let store = stores.bookmarks.clone();
        Callback::from(move |id: i64| {
            let store = store.clone();
            spawn_local(async move {
                store.delete_bookmark(id).await;
            });
        })
    };

    let on_enrich = {
        let store = stores.bookmarks.clone();
        Callback::from(move |id: i64| {
            let store = store.clone();
            spawn_local(async move {
                if store.enrich_bookmark(id).await {
                    store.fetch_bookmark(id).await;
                }
            });
        })
    };

    let on_reindex = {
        let store = stores.bookmarks.clone();
        let notice = notice.clone();
        Callback::from(move |_| {
            let store = store.clone();
            let notice = notice.clone();
            spawn_local(async move {
                if let Some(job) = store.batch_vectorize().await {
                    info!("Vectorizing {} bookmarks", job.total_bookmarks);
                    notice.set(Some(job.message));
                }
            });
        })
    };

    let on_retrain = {
        let store = stores.bookmarks.clone();
        let notice = notice.clone();
        Callback::from(move |_| {
            let store = store.clone();
            let notice = notice.clone();
            spawn_local(async move {
                if let Some(job) = store.retrain_vectorizer().await {
                    info!("Retraining vectorizer on {} bookmarks", job.total_bookmarks);
                    notice.set(Some(job.message));
                }
            });
        })
    };

    let on_imported = {
        let store = stores.bookmarks.clone();
        let notice = notice.clone();
        Callback::from(move |message: String| {
            let store = store.clone();
            notice.set(Some(message));
            spawn_local(async move {
                store.fetch_bookmarks(0, PAGE_SIZE).await;
            });
        })
    };

    let on_tab_click = {
        let active_tab = active_tab.clone();
        move |tab: ActiveTab| {
            let active_tab = active_tab.clone();
            Callback::from(move |_| {
                active_tab.set(tab.clone());
            })
        }
    };

    let tab_class = |tab: ActiveTab| {
        if *active_tab == tab {
            "pf-v5-c-tabs__item pf-m-current"
        } else {
            "pf-v5-c-tabs__item"
        }
    };

    let is_busy = bookmark_state.is_loading;
    let recent = stores.bookmarks.recent_bookmarks();

    html! {
        <div class="container">
            <div class="header">
                <h1 class="main-title">{"Bookmarks"}</h1>
                <HealthBadge healthy={bookmark_state.backend_healthy} />
                <Button onclick={on_reindex} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {"🔄 Re-index"}
                </Button>
                <Button onclick={on_retrain} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {"🧠 Retrain"}
                </Button>
                <ImportBookmarks disabled={is_busy} on_imported={on_imported} />
            </div>

            <ErrorAlert message={bookmark_state.error.clone()} />

            if let Some(message) = (*notice).clone() {
                <div class="message-top-margin">
                    <Alert r#type={AlertType::Info} title={"Started"} inline={true}>
                        {message}
                    </Alert>
                </div>
            }

            if is_busy {
                <div class="loading-text-center">
                    <Spinner />
                </div>
            }

            <AddBookmarkForm />

            <div class="pf-v5-c-tabs tabs-nav">
                <ul class="pf-v5-c-tabs__list">
                    <li class={tab_class(ActiveTab::All)}>
                        <button class="pf-v5-c-tabs__link" onclick={on_tab_click(ActiveTab::All)}>
                            <span class="pf-v5-c-tabs__item-text">{"All"}</span>
                        </button>
                    </li>
                    <li class={tab_class(ActiveTab::Recent)}>
                        <button class="pf-v5-c-tabs__link" onclick={on_tab_click(ActiveTab::Recent)}>
                            <span class="pf-v5-c-tabs__item-text">{"Recent"}</span>
                        </button>
                    </li>
                    <li class={tab_class(ActiveTab::Search)}>
                        <button class="pf-v5-c-tabs__link" onclick={on_tab_click(ActiveTab::Search)}>
                            <span class="pf-v5-c-tabs__item-text">{"Search"}</span>
                        </button>
                    </li>
                </ul>
            </div>

            <div class="tab-pane-content">
                {match &*active_tab {
                    ActiveTab::All => html! {
                        <div class="bookmarks-list">
                            if bookmark_state.bookmarks.is_empty() && !is_busy {
                                <div class="empty-state">
                                    <p>{"No bookmarks yet."}</p>
                                    <p class="empty-state-hint">{"Add one above or save a page from the extension popup."}</p>
                                </div>
                            }
                            {for bookmark_state.bookmarks.iter().map(|bookmark| html! {
                                <BookmarkRow
                                    key={bookmark.id}
                                    bookmark={bookmark.clone()}
                                    disabled={is_busy}
                                    on_delete={on_delete.clone()}
                                    on_enrich={on_enrich.clone()}
                                />
                            })}
                        </div>
                    },
                    ActiveTab::Recent => html! {
                        <div class="bookmarks-list">
                            {for recent.iter().map(|bookmark| html! {
                                <BookmarkRow key={bookmark.id} bookmark={bookmark.clone()} />
                            })}
                        </div>
                    },
                    ActiveTab::Search => html! { <SearchPanel /> },
                }}
            </div>

            <div class="footer">
                {format!("{} bookmarks", stores.bookmarks.count())}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ImportBookmarksProps {
    disabled: bool,
    on_imported: Callback<String>,
}

/// File picker that uploads a browser bookmarks export (HTML)
#[function_component(ImportBookmarks)]
fn import_bookmarks(props: &ImportBookmarksProps) -> Html {
    let stores = use_context::<AppStores>().expect("rendered inside Dashboard");

    let on_change = {
        let store = stores.bookmarks.clone();
        let on_imported = props.on_imported.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            input.set_value("");

            let store = store.clone();
            let on_imported = on_imported.clone();
            spawn_local(async move {
                let contents = match read_file(&file).await {
                    Ok(contents) => contents,
                    Err(e) => {
                        warn!("{}", e);
                        return;
                    }
                };
                if let Some(summary) = store.import_bookmarks(&file.name(), contents).await {
                    on_imported.emit(summary.message);
                }
            });
        })
    };

    html! {
        <label class="pf-v5-c-button pf-m-secondary import-button">
            {"📥 Import"}
            <input
                type="file"
                accept=".html,text/html"
                hidden={true}
                disabled={props.disabled}
                onchange={on_change}
            />
        </label>
    }
}

async fn read_file(file: &File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read {}: {:?}", file.name(), e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[function_component(AddBookmarkForm)]
fn add_bookmark_form() -> Html {
    let stores = use_context::<AppStores>().expect("rendered inside Dashboard");
    let url = use_state(String::new);
    let title = use_state(String::new);
    let description = use_state(String::new);

    let input_handler = |handle: &UseStateHandle<String>| {
        let handle = handle.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                handle.set(input.value());
            }
        })
    };

    // Prefill title and description from the backend's page analysis
    let on_analyze = {
        let search = stores.search.clone();
        let url = url.clone();
        let title = title.clone();
        let description = description.clone();
        Callback::from(move |_| {
            let search = search.clone();
            let target = (*url).clone();
            let title = title.clone();
            let description = description.clone();
            spawn_local(async move {
                if let Some(analysis) = search.analyze_url(&target).await {
                    if !analysis.title.trim().is_empty() {
                        title.set(analysis.title);
                    }
                    if !analysis.summary.trim().is_empty() {
                        description.set(analysis.summary);
                    }
                }
            });
        })
    };

    let on_submit = {
        let store = stores.bookmarks.clone();
        let url = url.clone();
        let title = title.clone();
        let description = description.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let text = (*description).trim().to_string();
            let bookmark = BookmarkCreate::new(
                (*url).trim().to_string(),
                (*title).trim().to_string(),
                (!text.is_empty()).then_some(text),
            );

            let store = store.clone();
            let url = url.clone();
            let title = title.clone();
            let description = description.clone();
            spawn_local(async move {
                if store.create_bookmark(bookmark).await.is_some() {
                    url.set(String::new());
                    title.set(String::new());
                    description.set(String::new());
                }
            });
        })
    };

    html! {
        <form class="add-form" onsubmit={on_submit}>
            <input
                type="url"
                placeholder="https://..."
                value={(*url).clone()}
                oninput={input_handler(&url)}
                class="search-input"
            />
            <input
                type="text"
                placeholder="Title"
                value={(*title).clone()}
                oninput={input_handler(&title)}
                class="search-input"
            />
            <input
                type="text"
                placeholder="Description (optional)"
                value={(*description).clone()}
                oninput={input_handler(&description)}
                class="search-input"
            />
            <div class="flex-row-gap">
                <Button onclick={on_analyze} variant={ButtonVariant::Secondary} disabled={url.is_empty()}>
                    {"🔍 Fetch details"}
                </Button>
                <Button r#type={ButtonType::Submit}>
                    {"➕ Add bookmark"}
                </Button>
            </div>
        </form>
    }
}

#[function_component(SearchPanel)]
fn search_panel() -> Html {
    let stores = use_context::<AppStores>().expect("rendered inside Dashboard");
    let search_state = use_search_state(stores.search.clone());
    let query = use_state(|| search_state.query.clone());

    let on_input = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                query.set(input.value());
            }
        })
    };

    let on_submit = {
        let store = stores.search.clone();
        let query = query.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let store = store.clone();
            let query = (*query).clone();
            spawn_local(async move {
                store.search(&query, None).await;
            });
        })
    };

    let on_clear = {
        let store = stores.search.clone();
        let query = query.clone();
        Callback::from(move |_| {
            query.set(String::new());
            store.clear();
        })
    };

    html! {
        <div class="flex-column-gap">
            <form class="search-container" onsubmit={on_submit}>
                <input
                    type="text"
                    placeholder="Search your bookmarks..."
                    value={(*query).clone()}
                    oninput={on_input}
                    class="search-input"
                />
                <Button onclick={on_clear} variant={ButtonVariant::Secondary}>
                    {"✗"}
                </Button>
            </form>

            <ErrorAlert message={search_state.error.clone()} />

            if search_state.is_loading {
                <div class="loading-text-center">
                    <Spinner />
                    <p class="loading-text">{format!("Searching for \"{}\"...", search_state.query)}</p>
                </div>
            } else if search_state.results.is_empty() && !search_state.query.is_empty() {
                <div class="empty-state">
                    <p>{"No bookmarks match your search."}</p>
                </div>
            }

            <div class="results-list">
                {for search_state.results.iter().map(|result| {
                    let entry = RecommendationEntry::from_result(result);
                    html! {
                        <div key={result.bookmark.id} class="result-item">
                            <BookmarkRow bookmark={result.bookmark.clone()} />
                            <ScoreBadge label={entry.score_label} />
                            if !result.matched_keywords.is_empty() {
                                <p class="matched-keywords">
                                    {format!("Matched: {}", result.matched_keywords.join(", "))}
                                </p>
                            }
                        </div>
                    }
                })}
            </div>
        </div>
    }
}
