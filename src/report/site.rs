//! One entry URL and everything learned by crawling it

use crate::crawler::Crawler;
use crate::event::{channel, Event, ProblemEvent};
use crate::report::builder::{listen, SiteBuilder};
use crate::report::model::Page;
use crate::url::host_or_raw;
use crate::SiteError;
use std::sync::Arc;
use tokio::sync::oneshot;
use url::Url;

/// Result of crawling one entry URL
///
/// The entry URL is parsed on construction; a parse failure is recorded
/// immediately and no crawl is ever attempted for that site.
#[derive(Debug)]
pub struct Site {
    name: String,
    entry: String,
    url: Option<Url>,
    error: Option<SiteError>,
    pages: Vec<Page>,
    problems: Vec<ProblemEvent>,
}

impl Site {
    pub fn new(raw: impl Into<String>) -> Self {
        let entry = raw.into();
        let (url, error) = match Url::parse(&entry) {
            Ok(url) => (Some(url), None),
            Err(source) => (
                None,
                Some(SiteError::Parse {
                    raw: entry.clone(),
                    source,
                }),
            ),
        };
        Self {
            name: host_or_raw(url.as_ref(), &entry),
            entry,
            url,
            error,
            pages: Vec::new(),
            problems: Vec::new(),
        }
    }

    /// Builds a site from an already recorded event sequence
    ///
    /// No crawler is involved; the events go straight through the builder.
    pub fn from_events(raw: impl Into<String>, events: impl IntoIterator<Item = Event>) -> Self {
        let mut site = Self::new(raw);
        if site.error.is_some() {
            return site;
        }
        let mut builder = SiteBuilder::new();
        for event in events {
            builder.observe(event);
        }
        match builder.build() {
            Ok(graph) => {
                site.pages = graph.pages;
                site.problems = graph.problems;
            }
            Err(e) => site.error = Some(SiteError::Build(e)),
        }
        site
    }

    /// Site whose task died before it could hand its result back
    pub(crate) fn aborted(raw: impl Into<String>, reason: String) -> Self {
        let mut site = Self::new(raw);
        site.error = Some(SiteError::Aborted(reason));
        site
    }

    /// Host of the entry URL, or the raw entry when it has none
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry URL as requested
    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn error(&self) -> Option<&SiteError> {
        self.error.as_ref()
    }

    /// Visited pages in order of first walk
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn problems(&self) -> &[ProblemEvent] {
        &self.problems
    }

    /// Crawls the site and fills its graph
    ///
    /// The builder drains the event queue on its own task while the crawler
    /// runs, so a full queue only ever makes the crawler wait. A crawl error
    /// wins over a build error; a crawl error keeps whatever graph the
    /// emitted events describe, a build error leaves the site without pages.
    pub(crate) async fn fetch(&mut self, crawler: Option<Arc<dyn Crawler>>, event_buffer: usize) {
        if self.error.is_some() {
            return;
        }
        let Some(url) = self.url.clone() else {
            return;
        };
        let Some(crawler) = crawler else {
            self.error = Some(SiteError::NoCrawler);
            return;
        };

        tracing::info!("Checking {}", self.name);

        let (sink, stream) = channel(event_buffer);
        let (done_tx, done_rx) = oneshot::channel();
        let listener = tokio::spawn(listen(stream, done_rx));
        let crawled = crawler.visit(url.as_str(), sink).await;
        let _ = done_tx.send(());
        let built = listener.await;

        match (crawled, built) {
            (Ok(()), Ok(Ok(graph))) => {
                self.pages = graph.pages;
                self.problems = graph.problems;
            }
            (Err(e), Ok(Ok(graph))) => {
                self.pages = graph.pages;
                self.problems = graph.problems;
                self.error = Some(SiteError::Crawl(e));
            }
            (Err(e), _) => self.error = Some(SiteError::Crawl(e)),
            (Ok(()), Ok(Err(e))) => {
                tracing::warn!("Graph of {} is inconsistent: {}", self.name, e);
                self.error = Some(SiteError::Build(e));
            }
            (Ok(()), Err(e)) => {
                tracing::error!("Builder task of {} failed: {}", self.name, e);
                self.error = Some(SiteError::Aborted(e.to_string()));
            }
        }

        tracing::info!(
            "Finished {}: {} pages, {} problems",
            self.name,
            self.pages.len(),
            self.problems.len()
        );
    }
}
