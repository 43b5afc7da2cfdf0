//! Breadth-first HTTP crawler
//!
//! Every discovered http(s) URL is fetched exactly once. Only HTML pages on
//! the entry host are scanned for further links; everything else is checked
//! for reachability and left alone.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::parser::{extract_hrefs, resolve_href, Resolved};
use crate::crawler::Crawler;
use crate::event::{ErrorEvent, EventSink, ProblemEvent, ResponseEvent, WalkEvent};
use crate::url::{canonicalize, extract_domain};
use crate::CrawlError;
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Crawler backed by a reqwest client
#[derive(Debug, Clone, Default)]
pub struct HttpCrawler {
    config: CrawlerConfig,
}

/// Walk bookkeeping for one site
struct Frontier {
    queue: VecDeque<Url>,
    seen: HashSet<String>,
}

impl Frontier {
    fn new(entry: Url) -> Self {
        let mut seen = HashSet::new();
        seen.insert(canonicalize(&entry));
        Self {
            queue: VecDeque::from([entry]),
            seen,
        }
    }

    fn push(&mut self, url: Url) {
        if self.seen.insert(canonicalize(&url)) {
            self.queue.push_back(url);
        }
    }
}

impl HttpCrawler {
    pub fn new(config: CrawlerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    async fn walk(&self, entry: &str, sink: &EventSink) -> Result<(), CrawlError> {
        let mut base = Url::parse(entry).map_err(|source| CrawlError::InvalidEntry {
            url: entry.to_string(),
            source,
        })?;
        base.set_fragment(None);
        let base_domain = extract_domain(&base);
        let client = build_http_client(&self.config)?;

        tracing::info!("Crawling {}", base);

        let mut frontier = Frontier::new(base);
        let mut in_flight = FuturesUnordered::new();
        let mut fetched = 0usize;

        loop {
            while in_flight.len() < self.config.concurrency {
                let Some(url) = frontier.queue.pop_front() else {
                    break;
                };
                let scan = extract_domain(&url) == base_domain;
                in_flight.push(fetch_url(&client, url, scan));
            }

            let Some(result) = in_flight.next().await else {
                break;
            };
            fetched += 1;
            self.report(result, sink, &mut frontier).await?;
        }

        tracing::info!("Finished {}: {} URLs fetched", entry, fetched);
        Ok(())
    }

    /// Emits the events for one fetched URL and queues its links
    async fn report(
        &self,
        result: FetchResult,
        sink: &EventSink,
        frontier: &mut Frontier,
    ) -> Result<(), CrawlError> {
        match result {
            FetchResult::Success {
                url,
                status_code,
                body,
            } => {
                let page = canonicalize(&url);
                sink.emit(ResponseEvent {
                    status_code,
                    location: page.clone(),
                })
                .await?;

                let Some(body) = body else {
                    return Ok(());
                };
                for href in extract_hrefs(&body) {
                    match resolve_href(&url, &href) {
                        Resolved::Skip => {}
                        Resolved::Bad(reason) => {
                            tracing::debug!("bad href {:?} on {}: {}", href, page, reason);
                            sink.emit(ProblemEvent {
                                message: "bad url".to_string(),
                                context: format!("page={} href={:?}", page, href),
                            })
                            .await?;
                        }
                        Resolved::Link(target) => {
                            sink.emit(WalkEvent {
                                page: page.clone(),
                                href: canonicalize(&target),
                            })
                            .await?;
                            frontier.push(target);
                        }
                    }
                }
            }
            FetchResult::HttpError {
                url,
                status_code,
                redirect,
                reason,
            } => {
                tracing::debug!("{} returned {}", url, status_code);
                sink.emit(ErrorEvent {
                    status_code,
                    location: canonicalize(&url),
                    redirect,
                    error: Some(reason),
                })
                .await?;
            }
            FetchResult::NetworkError { url, error } => {
                tracing::debug!("{} unreachable: {}", url, error);
                sink.emit(ErrorEvent {
                    status_code: 0,
                    location: canonicalize(&url),
                    redirect: None,
                    error: Some(error),
                })
                .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Crawler for HttpCrawler {
    async fn visit(&self, entry: &str, sink: EventSink) -> Result<(), CrawlError> {
        let result = self.walk(entry, &sink).await;
        if let Err(e) = &result {
            tracing::warn!("Crawl of {} failed: {}", entry, e);
        }
        sink.close().await;
        result
    }
}
