//! Sitecheck: link reachability reports for one or more sites
//!
//! This crate walks every link reachable from a set of entry pages, turns the
//! resulting crawl events into a per-site page/link graph and renders that
//! graph as a colorized tree.

pub mod config;
pub mod crawler;
pub mod event;
pub mod output;
pub mod report;
pub mod url;

use thiserror::Error;

/// Main error type for Sitecheck operations
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors returned by a crawler collaborator for a whole site
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("parse entry point URL {url:?}: {source}")]
    InvalidEntry {
        url: String,
        source: ::url::ParseError,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("event sink closed before the walk finished")]
    SinkClosed,

    #[error("{0}")]
    Other(String),
}

/// Referential-integrity violations found while building a site graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("not consistent fetch result: {kind} {location:?} not found")]
    GraphInconsistency {
        kind: GraphNode,
        location: String,
    },

    #[error("unexpected event {kind:?} after end of stream")]
    UnexpectedEvent { kind: &'static str },
}

/// The side of a graph edge that failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphNode {
    Page,
    Link,
}

impl std::fmt::Display for GraphNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphNode::Page => f.write_str("page"),
            GraphNode::Link => f.write_str("link"),
        }
    }
}

/// Failure recorded on a single site of a report
///
/// A site error never aborts the report: it replaces that site's tree in the
/// output while every other site is rendered normally.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("parse rawURL {raw:?} for report: {source}")]
    Parse {
        raw: String,
        source: ::url::ParseError,
    },

    #[error("crawler is not provided")]
    NoCrawler,

    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("site task aborted: {0}")]
    Aborted(String),
}

/// Result type alias for Sitecheck operations
pub type Result<T> = std::result::Result<T, CheckError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, HttpCrawler};
pub use event::{channel, Event, EventSink, EventStream};
pub use output::{Printer, PrinterOptions, Theme};
pub use report::{Link, Page, Report, Site};
