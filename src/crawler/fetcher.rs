//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent
//! - Leaving redirects unfollowed so they can be reported
//! - Classifying responses into fetch results

use crate::config::CrawlerConfig;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

const CLICK_OPTIONS_HEADER: &str = "X-Click-Options";

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// 2xx response
    Success {
        /// Requested URL
        url: Url,
        status_code: u16,
        /// Body, only when it was requested and the response is HTML
        body: Option<String>,
    },

    /// Any non-2xx response, redirects included
    HttpError {
        url: Url,
        status_code: u16,
        /// `Location` header value
        redirect: Option<String>,
        /// Canonical reason phrase of the status
        reason: String,
    },

    /// No response at all (connection refused, timeout, TLS failure...)
    NetworkError { url: Url, error: String },
}

/// True for `text/html` content types, parameters and letter case ignored
fn is_html(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|essence| essence.trim().eq_ignore_ascii_case("text/html"))
        .unwrap_or(false)
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are never followed and no cookie store is attached.
///
/// # Example
///
/// ```no_run
/// use sitecheck::config::CrawlerConfig;
/// use sitecheck::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CLICK_OPTIONS_HEADER, HeaderValue::from_static("anonymously"));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `read_body` - Whether an HTML body should be downloaded for link extraction
pub async fn fetch_url(client: &Client, url: Url, read_body: bool) -> FetchResult {
    tracing::debug!("Fetching {}", url);

    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection refused: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { url, error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        let redirect = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        return FetchResult::HttpError {
            url,
            status_code: status.as_u16(),
            redirect,
            reason: status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_string(),
        };
    }

    let is_html = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(is_html)
        .unwrap_or(false);

    let body = if read_body && is_html {
        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!("Failed to read body of {}: {}", url, e);
                None
            }
        }
    } else {
        None
    };

    FetchResult::Success {
        url,
        status_code: status.as_u16(),
        body,
    }
}
