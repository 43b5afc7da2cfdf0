use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (`mailto:`, `data:`), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitecheck::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Extracts the domain from a URL string, None if it does not parse
pub fn host_of(location: &str) -> Option<String> {
    Url::parse(location).ok().as_ref().and_then(extract_domain)
}

/// True when both URL strings parse and name the same host
pub fn same_host(a: &str, b: &str) -> bool {
    match (host_of(a), host_of(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
