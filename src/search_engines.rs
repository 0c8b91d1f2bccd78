/// Search results page detection and query extraction
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

/// A search engine whose results pages can host the recommendation widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEngine {
    Google,
    Bing,
    DuckDuckGo,
    Yahoo,
    YahooJapan,
    Baidu,
}

const ALL_ENGINES: [SearchEngine; 6] = [
    SearchEngine::Google,
    SearchEngine::Bing,
    SearchEngine::DuckDuckGo,
    SearchEngine::Yahoo,
    SearchEngine::YahooJapan,
    SearchEngine::Baidu,
];

fn google_host() -> &'static Regex {
    static GOOGLE: OnceLock<Regex> = OnceLock::new();
    // google.com, google.de, google.co.jp, google.com.au, ...
    GOOGLE.get_or_init(|| {
        Regex::new(r"^(www\.)?google\.(com|[a-z]{2}|co\.[a-z]{2}|com\.[a-z]{2})$")
            .expect("valid google host pattern")
    })
}

impl SearchEngine {
    /// Detect the search engine for a results page URL.
    ///
    /// Matching is host + path: a Google host only counts on `/search`, so
    /// Maps, Mail, and the home page stay untouched.
    ///
    /// Examples:
    /// - https://www.google.com/search?q=rust → Google
    /// - https://www.bing.com/search?q=rust → Bing
    /// - https://duckduckgo.com/?q=rust → DuckDuckGo
    /// - https://search.yahoo.co.jp/search?p=rust → YahooJapan
    /// - https://www.baidu.com/s?wd=rust → Baidu
    /// - https://www.google.com/maps → None
    pub fn detect(url: &str) -> Option<SearchEngine> {
        let parsed = Url::parse(url).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }

        let host = parsed.host_str()?.to_lowercase();
        let path = parsed.path();

        ALL_ENGINES
            .into_iter()
            .find(|engine| engine.matches_host(&host) && engine.matches_path(path))
    }

    fn matches_host(&self, host: &str) -> bool {
        match self {
            SearchEngine::Google => google_host().is_match(host),
            SearchEngine::Bing => matches!(host, "bing.com" | "www.bing.com" | "cn.bing.com"),
            SearchEngine::DuckDuckGo => matches!(host, "duckduckgo.com" | "html.duckduckgo.com"),
            SearchEngine::Yahoo => host == "search.yahoo.com" || host.ends_with(".search.yahoo.com"),
            SearchEngine::YahooJapan => host == "search.yahoo.co.jp",
            SearchEngine::Baidu => matches!(host, "baidu.com" | "www.baidu.com" | "m.baidu.com"),
        }
    }

    fn matches_path(&self, path: &str) -> bool {
        match self {
            SearchEngine::Google | SearchEngine::Bing | SearchEngine::YahooJapan => {
                path == "/search"
            }
            SearchEngine::DuckDuckGo => matches!(path, "/" | "/html" | "/html/"),
            SearchEngine::Yahoo => path.starts_with("/search"),
            SearchEngine::Baidu => path == "/s",
        }
    }

    /// Query-string parameters carrying the query, in priority order
    pub fn query_params(&self) -> &'static [&'static str] {
        match self {
            SearchEngine::Google | SearchEngine::Bing | SearchEngine::DuckDuckGo => &["q"],
            SearchEngine::Yahoo | SearchEngine::YahooJapan => &["q", "p"],
            SearchEngine::Baidu => &["q", "wd"],
        }
    }

    /// Candidate results containers, tried in order
    pub fn anchor_selectors(&self) -> &'static [&'static str] {
        match self {
            SearchEngine::Google => &["#rcnt", "#center_col", "#search"],
            SearchEngine::Bing => &["#b_results", "#b_content"],
            SearchEngine::DuckDuckGo => &["#react-layout", "#links", ".results"],
            SearchEngine::Yahoo => &["#web", "#results", "#main"],
            SearchEngine::YahooJapan => &["#contents__wrap", "#contents", "#main"],
            SearchEngine::Baidu => &["#content_left", "#results"],
        }
    }

    /// Extract the user's query from a results page URL
    pub fn extract_query(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;

        self.query_params().iter().find_map(|param| {
            parsed
                .query_pairs()
                .find(|(key, _)| key == param)
                .map(|(_, value)| value.trim().to_string())
                .filter(|value| !value.is_empty())
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchEngine::Google => "Google",
            SearchEngine::Bing => "Bing",
            SearchEngine::DuckDuckGo => "DuckDuckGo",
            SearchEngine::Yahoo => "Yahoo",
            SearchEngine::YahooJapan => "Yahoo! JAPAN",
            SearchEngine::Baidu => "Baidu",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_google() {
        assert_eq!(SearchEngine::detect("https://www.google.com/search?q=rust"), Some(SearchEngine::Google));
        assert_eq!(SearchEngine::detect("https://www.google.co.jp/search?q=rust"), Some(SearchEngine::Google));
        assert_eq!(SearchEngine::detect("https://google.com.au/search?q=rust"), Some(SearchEngine::Google));
        assert_eq!(SearchEngine::detect("https://www.google.de/search?q=rust"), Some(SearchEngine::Google));
    }

    #[test]
    fn test_detect_other_engines() {
        assert_eq!(SearchEngine::detect("https://www.bing.com/search?q=rust"), Some(SearchEngine::Bing));
        assert_eq!(SearchEngine::detect("https://duckduckgo.com/?q=rust"), Some(SearchEngine::DuckDuckGo));
        assert_eq!(SearchEngine::detect("https://html.duckduckgo.com/html/?q=rust"), Some(SearchEngine::DuckDuckGo));
        assert_eq!(SearchEngine::detect("https://search.yahoo.com/search?p=rust"), Some(SearchEngine::Yahoo));
        assert_eq!(SearchEngine::detect("https://search.yahoo.co.jp/search?p=rust"), Some(SearchEngine::YahooJapan));
    }

    #[test]
    fn test_detect_rejects_non_results_pages() {
        assert_eq!(SearchEngine::detect("https://www.google.com/maps?q=rust"), None);
        assert_eq!(SearchEngine::detect("https://mail.google.com/search?q=rust"), None);
        assert_eq!(SearchEngine::detect("https://www.google.evil.example/search?q=rust"), None);
        assert_eq!(SearchEngine::detect("https://github.com/search?q=rust"), None);
        assert_eq!(SearchEngine::detect("file:///search?q=rust"), None);
        assert_eq!(SearchEngine::detect("not-a-url"), None);
    }

    #[test]
    fn test_extract_query_decodes_plus_and_escapes() {
        let engine = SearchEngine::Google;
        assert_eq!(
            engine.extract_query("https://www.google.com/search?q=rust+systems"),
            Some("rust systems".to_string())
        );
        assert_eq!(
            engine.extract_query("https://www.google.com/search?hl=en&q=caf%C3%A9%20menu"),
            Some("café menu".to_string())
        );
    }

    #[test]
    fn test_extract_query_priority_order() {
        let engine = SearchEngine::Yahoo;
        assert_eq!(
            engine.extract_query("https://search.yahoo.com/search?p=second&q=first"),
            Some("first".to_string())
        );
        assert_eq!(
            engine.extract_query("https://search.yahoo.com/search?p=alternate"),
            Some("alternate".to_string())
        );
        // blank generic parameter falls through to the alternate
        assert_eq!(
            engine.extract_query("https://search.yahoo.com/search?q=++&p=alternate"),
            Some("alternate".to_string())
        );
    }

    #[test]
    fn test_extract_query_missing_or_blank() {
        let engine = SearchEngine::Bing;
        assert_eq!(engine.extract_query("https://www.bing.com/search"), None);
        assert_eq!(engine.extract_query("https://www.bing.com/search?q="), None);
        assert_eq!(engine.extract_query("https://www.bing.com/search?q=%20%20"), None);
        // Bing has no alternate parameter
        assert_eq!(engine.extract_query("https://www.bing.com/search?p=rust"), None);
    }

    #[test]
    fn test_baidu() {
        assert_eq!(SearchEngine::detect("https://www.baidu.com/s?wd=rust"), Some(SearchEngine::Baidu));
        assert_eq!(SearchEngine::detect("https://m.baidu.com/s?word=rust"), Some(SearchEngine::Baidu));
        assert_eq!(SearchEngine::detect("https://www.baidu.com/"), None);
        assert_eq!(SearchEngine::detect("https://map.baidu.com/s?wd=rust"), None);

        let engine = SearchEngine::Baidu;
        assert_eq!(
            engine.extract_query("https://www.baidu.com/s?ie=utf-8&wd=%E9%93%81%E9%94%88"),
            Some("铁锈".to_string())
        );
        assert_eq!(
            engine.extract_query("https://www.baidu.com/s?q=first&wd=second"),
            Some("first".to_string())
        );
        assert_eq!(engine.anchor_selectors(), &["#content_left", "#results"]);
    }

    #[test]
    fn test_every_engine_has_anchors() {
        for engine in ALL_ENGINES {
            assert!(!engine.anchor_selectors().is_empty(), "{} has no anchors", engine.name());
        }
    }
}
