//! HTML parser for extracting links and page signals
//!
//! This module parses fetched documents to extract:
//! - Raw anchor hrefs (unresolved, unfiltered, duplicates kept)
//! - The `meta robots` noindex directive
//! - The declared canonical URL
//! - Title, meta description and first `<h1>`
//!
//! Parsing is lenient: malformed markup never fails, so a broken document
//! simply reports as indexable with no canonical.

use scraper::{ElementRef, Html, Selector};

/// Signals read from one HTML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSignals {
    /// False once a `noindex` robots meta tag is seen
    pub indexable: bool,

    /// True if a `noindex` robots meta tag is present
    pub no_index: bool,

    /// First non-empty `<link rel="canonical">` href, empty if none
    pub canonical: String,

    /// Trimmed `<title>` text
    pub title: String,

    /// Trimmed `<meta name="description">` content
    pub description: String,

    /// Trimmed text of the first `<h1>`
    pub h1: String,
}

impl Default for PageSignals {
    fn default() -> Self {
        Self {
            indexable: true,
            no_index: false,
            canonical: String::new(),
            title: String::new(),
            description: String::new(),
            h1: String::new(),
        }
    }
}

/// Collects the `href` of every `<a>` element in document order
///
/// Values are returned exactly as written: nothing is resolved, validated or
/// deduplicated.
///
/// # Example
///
/// ```
/// use fawnbot::crawler::extract_links;
///
/// let html = r#"<a href="/a">A</a><a>no href</a><a href="/a">A again</a>"#;
/// assert_eq!(extract_links(html), vec!["/a", "/a"]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Reads indexability, canonical and content signals from a document
///
/// * `noindex`: any `<meta>` whose `name` is `robots` (any case) and whose
///   `content` contains `noindex` (any case)
/// * `canonical`: the first `<link>` with `rel` exactly `canonical` and a
///   non-empty `href`; later ones are ignored
pub fn extract_signals(html: &str) -> PageSignals {
    let document = Html::parse_document(html);
    let mut signals = PageSignals::default();

    if let Ok(selector) = Selector::parse("meta[name]") {
        for meta in document.select(&selector) {
            let name = meta.value().attr("name").unwrap_or_default();
            let content = meta.value().attr("content").unwrap_or_default();

            if name.eq_ignore_ascii_case("robots") && content.to_lowercase().contains("noindex") {
                signals.indexable = false;
                signals.no_index = true;
            } else if name.eq_ignore_ascii_case("description") && signals.description.is_empty() {
                signals.description = content.trim().to_string();
            }
        }
    }

    if let Ok(selector) = Selector::parse("link[rel][href]") {
        signals.canonical = document
            .select(&selector)
            .filter(|link| link.value().attr("rel") == Some("canonical"))
            .filter_map(|link| link.value().attr("href"))
            .find(|href| !href.is_empty())
            .unwrap_or_default()
            .to_string();
    }

    signals.title = first_text(&document, "title");
    signals.h1 = first_text(&document, "h1");

    signals
}

/// Trimmed text content of the first element matching `selector`
fn first_text(document: &Html, selector: &str) -> String {
    let Ok(selector) = Selector::parse(selector) else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
