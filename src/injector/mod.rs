//! Content script that puts saved-bookmark recommendations on search results pages.
//!
//! One pass per page load: detect the engine, pull the query out of the URL,
//! ask the relay for recommendations, and mount a single widget. Every early
//! exit is silent; the host page must never notice a failure.

mod web;

pub use web::{RelaySource, WebPage};

use crate::bookmark_data::SearchResult;
use crate::relay::RelayResponse;
use crate::search_engines::SearchEngine;
use async_trait::async_trait;
use log::debug;

/// Id of the container element the widget lives in
pub const WIDGET_MARKER: &str = "bookmark-recommender-widget";

/// One row of the recommendation widget
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationEntry {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub score_label: String,
}

impl RecommendationEntry {
    pub fn from_result(result: &SearchResult) -> RecommendationEntry {
        RecommendationEntry {
            title: result.bookmark.title.clone(),
            url: result.bookmark.url.clone(),
            description: result
                .bookmark
                .description
                .clone()
                .filter(|d| !d.trim().is_empty()),
            score_label: format!("{}%", score_percent(result.relevance_score)),
        }
    }
}

/// Relevance score as a whole percentage, `round(score * 100)`
pub fn score_percent(score: f64) -> u32 {
    if score.is_nan() {
        return 0;
    }
    (score.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// The document the widget is rendered into
pub trait HostPage {
    fn location(&self) -> String;

    /// Take ownership of the page for this load; false if another run already did
    fn claim(&self) -> bool;

    fn has_widget(&self) -> bool;

    fn has_anchor(&self, selector: &str) -> bool;

    /// Insert the widget right after the element matching `selector`
    fn mount(&self, selector: &str, entries: Vec<RecommendationEntry>) -> bool;
}

/// Where recommendations come from; the background relay in production
#[async_trait(?Send)]
pub trait RecommendationSource {
    async fn recommendations(&self, query: &str) -> Result<RelayResponse, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InactiveReason {
    AlreadyLoaded,
    NotSearchPage,
    NoQuery,
    NoRecommendations,
    AlreadyRendered,
    NoAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectorOutcome {
    Inactive(InactiveReason),
    Rendered(usize),
}

/// Run the injector once against `page`
pub async fn run(page: &dyn HostPage, source: &dyn RecommendationSource) -> InjectorOutcome {
    if !page.claim() {
        return InjectorOutcome::Inactive(InactiveReason::AlreadyLoaded);
    }

    let location = page.location();
    let Some(engine) = SearchEngine::detect(&location) else {
        return InjectorOutcome::Inactive(InactiveReason::NotSearchPage);
    };

    let Some(query) = engine.extract_query(&location) else {
        return InjectorOutcome::Inactive(InactiveReason::NoQuery);
    };

    let results = match source.recommendations(&query).await {
        Ok(RelayResponse {
            success: true,
            results: Some(results),
            ..
        }) if !results.is_empty() => results,
        Ok(response) => {
            debug!("No recommendations for '{}': {:?}", query, response.error);
            return InjectorOutcome::Inactive(InactiveReason::NoRecommendations);
        }
        Err(e) => {
            debug!("Recommendation request failed: {}", e);
            return InjectorOutcome::Inactive(InactiveReason::NoRecommendations);
        }
    };

    render(page, engine, &results)
}

fn render(page: &dyn HostPage, engine: SearchEngine, results: &[SearchResult]) -> InjectorOutcome {
    if page.has_widget() {
        return InjectorOutcome::Inactive(InactiveReason::AlreadyRendered);
    }

    let Some(anchor) = engine
        .anchor_selectors()
        .iter()
        .find(|selector| page.has_anchor(selector))
    else {
        debug!("No results container found on {}", engine.name());
        return InjectorOutcome::Inactive(InactiveReason::NoAnchor);
    };

    let entries: Vec<RecommendationEntry> = results.iter().map(RecommendationEntry::from_result).collect();
    let count = entries.len();

    if page.mount(anchor, entries) {
        debug!("Rendered {} recommendations on {}", count, engine.name());
        InjectorOutcome::Rendered(count)
    } else {
        InjectorOutcome::Inactive(InactiveReason::NoAnchor)
    }
}
