/// Recommendation card injected into search results pages
///
/// Styles are inline because the host page's stylesheet is all there is.
use crate::injector::RecommendationEntry;
use yew::prelude::*;

const CARD_STYLE: &str = "margin: 0 0 16px 0; padding: 12px 16px; border: 1px solid #dadce0; border-radius: 8px; background-color: #ffffff; font-family: arial, sans-serif; max-width: 652px;";
const HEADER_STYLE: &str = "font-size: 13px; font-weight: bold; color: #5B4FE8; margin-bottom: 8px;";
const ENTRY_STYLE: &str = "display: flex; justify-content: space-between; align-items: flex-start; gap: 12px; padding: 6px 0; border-top: 1px solid #f1f3f4;";
const LINK_STYLE: &str = "font-size: 16px; color: #1a0dab; text-decoration: none;";
const DESCRIPTION_STYLE: &str = "font-size: 13px; color: #4d5156; margin: 2px 0 0 0;";

#[derive(Properties, PartialEq)]
pub struct RecommendationCardProps {
    pub entries: Vec<RecommendationEntry>,
}

#[function_component(RecommendationCard)]
pub fn recommendation_card(props: &RecommendationCardProps) -> Html {
    html! {
        <div style={CARD_STYLE}>
            <div style={HEADER_STYLE}>{"📚 From your bookmarks"}</div>
            {for props.entries.iter().map(|entry| html! {
                <div style={ENTRY_STYLE}>
                    <div>
                        <a
                            href={entry.url.clone()}
                            target="_blank"
                            rel="noopener noreferrer"
                            style={LINK_STYLE}
                        >
                            {&entry.title}
                        </a>
                        if let Some(description) = &entry.description {
                            <p style={DESCRIPTION_STYLE}>{description}</p>
                        }
                    </div>
                    <ScoreBadge label={entry.score_label.clone()} />
                </div>
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ScoreBadgeProps {
    pub label: String,
}

/// Relevance percentage pill, shared with the dashboard's search results
#[function_component(ScoreBadge)]
pub fn score_badge(props: &ScoreBadgeProps) -> Html {
    html! {
        <span style="flex-shrink: 0; padding: 2px 8px; border-radius: 10px; background-color: #5B4FE8; color: white; font-size: 12px; font-weight: bold;">
            {&props.label}
        </span>
    }
}
