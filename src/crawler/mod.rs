//! Crawler collaborators
//!
//! A crawler walks one site from its entry URL and reports what it sees as
//! [`Event`](crate::event::Event)s. This module contains:
//! - The [`Crawler`] capability implemented by every strategy and test double
//! - [`HttpCrawler`], the reqwest-based strategy used by the binary
//! - HTTP fetching and HTML href extraction helpers

mod fetcher;
mod http;
mod parser;

pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use http::HttpCrawler;
pub use parser::{extract_hrefs, resolve_href, Resolved};

use crate::event::EventSink;
use crate::CrawlError;
use async_trait::async_trait;

/// Walks a site and reports every page and link it processes
///
/// # Contract
///
/// * Emits zero or more events describing the walk into `sink`.
/// * Closes `sink` exactly once, on success, on failure, and on an
///   unparsable entry URL alike. Dropping the sink also ends the stream but
///   is logged as a violation.
/// * A returned error becomes the site's crawl error; events emitted before
///   the failure are still part of the site's graph.
#[async_trait]
pub trait Crawler: Send + Sync {
    async fn visit(&self, entry: &str, sink: EventSink) -> Result<(), CrawlError>;
}
