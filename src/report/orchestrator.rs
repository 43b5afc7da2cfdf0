//! Report orchestrator - one concurrent task per requested site
//!
//! Each site runs on its own tokio task and is moved back out once its crawl
//! and graph build are done, so nothing outside that task ever sees a site
//! mid-crawl. A panicking site task is turned into an error on that site.

use crate::crawler::Crawler;
use crate::report::model::StatusClass;
use crate::report::site::Site;
use futures::future::join_all;
use futures::stream::{FuturesUnordered, Stream};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinError;

const DEFAULT_EVENT_BUFFER: usize = 512;

/// Ordered collection of sites, one per requested entry URL
pub struct Report {
    crawler: Option<Arc<dyn Crawler>>,
    event_buffer: usize,
    sites: Vec<Site>,
}

/// Totals over a filled report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub sites: usize,
    pub failed_sites: usize,
    pub pages: usize,
    pub links: usize,
    pub success: usize,
    pub warning: usize,
    pub danger: usize,
}

impl Report {
    /// Creates an empty report
    ///
    /// Without a crawler every site ends up with a "crawler is not provided"
    /// error once the report is filled.
    pub fn new(crawler: Option<Arc<dyn Crawler>>) -> Self {
        Self {
            crawler,
            event_buffer: DEFAULT_EVENT_BUFFER,
            sites: Vec::new(),
        }
    }

    /// Capacity of each site's event queue
    pub fn with_event_buffer(mut self, event_buffer: usize) -> Self {
        self.event_buffer = event_buffer.max(1);
        self
    }

    /// Adds one site per entry URL, parsing each immediately
    pub fn for_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sites.extend(urls.into_iter().map(Site::new));
        self
    }

    /// Crawls every site concurrently
    ///
    /// Sites keep their request order no matter which crawl finishes first.
    pub async fn fill(&mut self) {
        let crawler = self.crawler.clone();
        let event_buffer = self.event_buffer;
        let pending = std::mem::take(&mut self.sites)
            .into_iter()
            .map(|site| run_site(site, crawler.clone(), event_buffer));
        self.sites = join_all(pending).await;
    }

    /// Crawls every site concurrently, yielding each one as soon as it is done
    ///
    /// Every requested site is yielded exactly once, in completion order.
    pub fn stream(self) -> impl Stream<Item = Site> + Unpin + Send {
        let Report {
            crawler,
            event_buffer,
            sites,
        } = self;
        sites
            .into_iter()
            .map(|site| run_site(site, crawler.clone(), event_buffer))
            .collect::<FuturesUnordered<_>>()
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn summary(&self) -> ReportSummary {
        summarize(&self.sites)
    }
}

/// Totals over any set of finished sites
pub fn summarize<'a>(sites: impl IntoIterator<Item = &'a Site>) -> ReportSummary {
    let mut summary = ReportSummary::default();
    for site in sites {
        summary.sites += 1;
        if site.error().is_some() {
            summary.failed_sites += 1;
        }
        for page in site.pages() {
            summary.pages += 1;
            for link in &page.links {
                summary.links += 1;
                match link.class() {
                    StatusClass::Success => summary.success += 1,
                    StatusClass::Warning => summary.warning += 1,
                    StatusClass::Danger => summary.danger += 1,
                }
            }
        }
    }
    summary
}

fn run_site(
    site: Site,
    crawler: Option<Arc<dyn Crawler>>,
    event_buffer: usize,
) -> impl Future<Output = Site> + Send {
    let entry = site.entry().to_string();
    let task = tokio::spawn(async move {
        let mut site = site;
        site.fetch(crawler, event_buffer).await;
        site
    });
    async move {
        match task.await {
            Ok(site) => site,
            Err(e) => {
                let reason = abort_reason(e);
                tracing::error!("Site task for {} aborted: {}", entry, reason);
                Site::aborted(entry, reason)
            }
        }
    }
}

fn abort_reason(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic".to_string()
    }
}
