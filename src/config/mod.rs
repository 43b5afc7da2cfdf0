//! Configuration module for Sitecheck
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; a missing file or section falls back to defaults.
//!
//! # Example
//!
//! ```no_run
//! use sitecheck::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitecheck.toml")).unwrap();
//! println!("Crawler will use {} concurrent requests", config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig};

// Re-export parser functions
pub use parser::{load_config, load_optional_config, parse_config};
