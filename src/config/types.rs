use serde::Deserialize;

/// Main configuration structure for Sitecheck
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Maximum number of in-flight requests per site
    pub concurrency: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Capacity of each site's event queue
    #[serde(rename = "event-buffer")]
    pub event_buffer: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("sitecheck/{}", env!("CARGO_PKG_VERSION")),
            concurrency: 8,
            timeout_secs: 10,
            event_buffer: 512,
        }
    }
}

/// Report rendering configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Colorize lines by outcome class
    pub colorize: bool,

    /// Percent-decode URLs before printing
    #[serde(rename = "decode-urls")]
    pub decode_urls: bool,

    /// Omit the error suffix of failed links
    #[serde(rename = "hide-error")]
    pub hide_error: bool,

    /// Omit the redirect target of redirected links
    #[serde(rename = "hide-redirect")]
    pub hide_redirect: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            colorize: true,
            decode_urls: false,
            hide_error: false,
            hide_redirect: false,
        }
    }
}
