//! HTML parser for extracting hrefs
//!
//! Only `<a href="...">` targets are considered links. Resolution against
//! the page URL is a separate step so that unresolvable hrefs can be
//! reported instead of silently dropped.

use scraper::{Html, Selector};
use url::Url;

/// How a raw href relates to the page it was found on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Absolute http(s) URL with its fragment removed
    Link(Url),

    /// Not a link worth checking (same-page anchor, mailto:, javascript:...)
    Skip,

    /// The href cannot be resolved into a URL
    Bad(String),
}

/// Collects the raw `href` attribute of every anchor in the document
///
/// # Example
///
/// ```
/// use sitecheck::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/page">Link</a><a>none</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/page".to_string()]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

/// Resolves an href found on `page`
///
/// Returns [`Resolved::Skip`] for:
/// - empty hrefs and same-page anchors (`#...`)
/// - URLs whose scheme is neither `http` nor `https`
pub fn resolve_href(page: &Url, href: &str) -> Resolved {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return Resolved::Skip;
    }

    match page.join(href) {
        Ok(mut target) => {
            if target.scheme() != "http" && target.scheme() != "https" {
                return Resolved::Skip;
            }
            target.set_fragment(None);
            Resolved::Link(target)
        }
        Err(e) => Resolved::Bad(e.to_string()),
    }
}
