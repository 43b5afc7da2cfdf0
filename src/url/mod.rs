//! URL helpers shared by the crawler and the report model
//!
//! Link identity throughout the crate is the canonical URL string produced by
//! [`canonicalize`]; hosts are compared through [`extract_domain`].

mod domain;

pub use domain::{extract_domain, host_of, same_host};

use url::Url;

/// Canonical string form of a URL: absolute, fragment removed
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitecheck::url::canonicalize;
///
/// let url = Url::parse("https://Example.com/docs#install").unwrap();
/// assert_eq!(canonicalize(&url), "https://example.com/docs");
/// ```
pub fn canonicalize(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

/// Display name for an entry URL: host and non-default port, or the raw
/// string when there is no host
pub fn host_or_raw(url: Option<&Url>, raw: &str) -> String {
    let Some(url) = url else {
        return raw.to_string();
    };
    match (extract_domain(url), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host,
        (None, _) => raw.to_string(),
    }
}
