//! Site builder - turns one site's event stream into a page/link graph
//!
//! Events arrive in no particular order: a page may be walked before its own
//! response is seen, and a link may be discovered before it is fetched. The
//! builder therefore records everything first and joins pages to links only
//! once the stream has ended.

use crate::event::{ErrorEvent, Event, EventStream, ProblemEvent, ResponseEvent, WalkEvent};
use crate::report::model::{Link, Page};
use crate::url::same_host;
use crate::{BuildError, GraphNode};
use std::collections::{HashMap, HashSet};
use tokio::sync::oneshot;

/// Fetch outcome recorded for a URL
#[derive(Debug, Clone)]
struct Outcome {
    status_code: u16,
    redirect: Option<String>,
    error: Option<String>,
}

/// Finished graph of one site, moved out of the builder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteGraph {
    pub pages: Vec<Page>,
    pub problems: Vec<ProblemEvent>,
}

/// Accumulates events for one site
#[derive(Debug, Default)]
pub struct SiteBuilder {
    outcomes: HashMap<String, Outcome>,
    pages: Vec<String>,
    seen_pages: HashSet<String>,
    // (href, page)
    edges: Vec<(String, String)>,
    problems: Vec<ProblemEvent>,
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one event; the first outcome seen for a URL wins
    pub fn observe(&mut self, event: Event) {
        match event {
            Event::Response(ResponseEvent {
                status_code,
                location,
            }) => self.record_outcome(
                location,
                Outcome {
                    status_code,
                    redirect: None,
                    error: None,
                },
            ),
            Event::Error(ErrorEvent {
                status_code,
                location,
                redirect,
                error,
            }) => self.record_outcome(
                location,
                Outcome {
                    status_code,
                    redirect: redirect.filter(|r| !r.is_empty()),
                    error: error.filter(|e| !e.is_empty()),
                },
            ),
            Event::Walk(WalkEvent { page, href }) => {
                if self.seen_pages.insert(page.clone()) {
                    self.pages.push(page.clone());
                }
                self.edges.push((href, page));
            }
            Event::Problem(problem) => {
                tracing::debug!("problem reported: {}", problem.message);
                self.problems.push(problem);
            }
        }
    }

    fn record_outcome(&mut self, location: String, outcome: Outcome) {
        if self.outcomes.contains_key(&location) {
            tracing::debug!("ignoring repeated outcome for {}", location);
            return;
        }
        self.outcomes.insert(location, outcome);
    }

    fn link(&self, location: &str, page: &str, kind: GraphNode) -> Result<Link, BuildError> {
        let outcome = self
            .outcomes
            .get(location)
            .ok_or_else(|| BuildError::GraphInconsistency {
                kind,
                location: location.to_string(),
            })?;
        Ok(Link {
            location: location.to_string(),
            status_code: outcome.status_code,
            redirect: outcome.redirect.clone(),
            error: outcome.error.clone(),
            internal: false,
            page: page.to_string(),
        })
    }

    /// Joins pages to their links
    ///
    /// Every walked page and every discovered href must have been confirmed by
    /// a response or error event; otherwise the graph is inconsistent.
    pub fn build(self) -> Result<SiteGraph, BuildError> {
        let mut pages = Vec::with_capacity(self.pages.len());
        let mut index = HashMap::with_capacity(self.pages.len());
        for location in &self.pages {
            let link = self.link(location, location, GraphNode::Page)?;
            index.insert(location.as_str(), pages.len());
            pages.push(Page {
                link,
                links: Vec::new(),
            });
        }

        let mut barrier: HashSet<(usize, &str)> = HashSet::with_capacity(self.edges.len());
        for (href, page_location) in &self.edges {
            let mut link = self.link(href, page_location, GraphNode::Link)?;
            let &page = index
                .get(page_location.as_str())
                .ok_or_else(|| BuildError::GraphInconsistency {
                    kind: GraphNode::Page,
                    location: page_location.clone(),
                })?;
            if !barrier.insert((page, href.as_str())) {
                continue;
            }
            link.internal = same_host(href, page_location);
            pages[page].links.push(link);
        }

        tracing::debug!(
            "built graph: {} pages, {} links, {} problems",
            pages.len(),
            barrier.len(),
            self.problems.len()
        );

        Ok(SiteGraph {
            pages,
            problems: self.problems,
        })
    }
}

/// Drains a site's event stream and builds its graph
///
/// `crawl_done` resolves once the crawler's `visit` has returned. Events are
/// consumed up to the end marker; after that the stream is only watched for
/// stray events until the crawl returns, so sink clones the crawler keeps
/// alive never stall the build.
pub async fn listen(
    mut stream: EventStream,
    mut crawl_done: oneshot::Receiver<()>,
) -> Result<SiteGraph, BuildError> {
    let mut builder = SiteBuilder::new();
    let returned_early = loop {
        tokio::select! {
            event = stream.next() => match event {
                Some(event) => builder.observe(event),
                None => break false,
            },
            _ = &mut crawl_done => break true,
        }
    };

    if returned_early {
        while let Some(event) = stream.try_next() {
            builder.observe(event);
        }
        stream.finish_now()?;
    } else {
        stream.finish(crawl_done).await?;
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::channel;

    fn response(status_code: u16, location: &str) -> Event {
        ResponseEvent {
            status_code,
            location: location.to_string(),
        }
        .into()
    }

    fn error(status_code: u16, location: &str, redirect: Option<&str>) -> Event {
        ErrorEvent {
            status_code,
            location: location.to_string(),
            redirect: redirect.map(str::to_string),
            error: Some("failed".to_string()),
        }
        .into()
    }

    fn walk(page: &str, href: &str) -> Event {
        WalkEvent {
            page: page.to_string(),
            href: href.to_string(),
        }
        .into()
    }

    fn build(events: Vec<Event>) -> Result<SiteGraph, BuildError> {
        let mut builder = SiteBuilder::new();
        for event in events {
            builder.observe(event);
        }
        builder.build()
    }

    #[test]
    fn test_walk_before_response() {
        let graph = build(vec![
            walk("http://test.dev/", "http://accepted.dev/"),
            walk("http://test.dev/", "http://redirect.dev/"),
            walk("http://test.dev/", "http://noaccess.dev/"),
            response(200, "http://test.dev/"),
            response(202, "http://accepted.dev/"),
            error(302, "http://redirect.dev/", Some("https://redirect.dev/")),
            error(403, "http://noaccess.dev/", None),
        ])
        .unwrap();

        assert_eq!(graph.pages.len(), 1);
        let page = &graph.pages[0];
        assert_eq!(page.location(), "http://test.dev/");
        assert_eq!(page.link.page, "http://test.dev/");
        let codes: Vec<u16> = page.links.iter().map(|l| l.status_code).collect();
        assert_eq!(codes, vec![202, 302, 403]);
        assert_eq!(page.links[1].redirect.as_deref(), Some("https://redirect.dev/"));
        assert!(page.links.iter().all(|l| l.page == "http://test.dev/"));
    }

    #[test]
    fn test_first_outcome_wins() {
        let graph = build(vec![
            response(200, "http://test.dev/"),
            walk("http://test.dev/", "http://test.dev/a"),
            error(404, "http://test.dev/a", None),
            response(200, "http://test.dev/a"),
            response(500, "http://test.dev/"),
        ])
        .unwrap();

        assert_eq!(graph.pages[0].link.status_code, 200);
        assert_eq!(graph.pages[0].links.len(), 1);
        assert_eq!(graph.pages[0].links[0].status_code, 404);
    }

    #[test]
    fn test_duplicate_edges_are_collapsed() {
        let graph = build(vec![
            response(200, "http://test.dev/"),
            response(200, "http://test.dev/a"),
            walk("http://test.dev/", "http://test.dev/a"),
            walk("http://test.dev/", "http://test.dev/a"),
            walk("http://test.dev/", "http://test.dev/a"),
        ])
        .unwrap();

        assert_eq!(graph.pages.len(), 1);
        assert_eq!(graph.pages[0].links.len(), 1);
    }

    #[test]
    fn test_shared_link_on_many_pages() {
        let graph = build(vec![
            response(200, "http://test.dev/"),
            response(200, "http://test.dev/about"),
            response(404, "http://test.dev/missing"),
            walk("http://test.dev/", "http://test.dev/about"),
            walk("http://test.dev/", "http://test.dev/missing"),
            walk("http://test.dev/about", "http://test.dev/missing"),
            walk("http://test.dev/about", "http://test.dev/missing"),
        ])
        .unwrap();

        assert_eq!(graph.pages.len(), 2);
        assert_eq!(graph.pages[0].links.len(), 2);
        assert_eq!(graph.pages[1].links.len(), 1);
        assert_eq!(graph.pages[1].links[0].page, "http://test.dev/about");
    }

    #[test]
    fn test_internal_links_are_marked() {
        let graph = build(vec![
            response(200, "http://test.dev/"),
            response(200, "http://test.dev/a"),
            response(200, "http://other.dev/"),
            walk("http://test.dev/", "http://test.dev/a"),
            walk("http://test.dev/", "http://other.dev/"),
        ])
        .unwrap();

        let links = &graph.pages[0].links;
        assert!(links[0].internal);
        assert!(!links[1].internal);
    }

    #[test]
    fn test_page_without_outcome_is_inconsistent() {
        let result = build(vec![
            response(200, "http://test.dev/"),
            walk("http://test.dev/without-response/", "http://test.dev/"),
        ]);

        assert_eq!(
            result,
            Err(BuildError::GraphInconsistency {
                kind: GraphNode::Page,
                location: "http://test.dev/without-response/".to_string(),
            })
        );
    }

    #[test]
    fn test_href_without_outcome_is_inconsistent() {
        let result = build(vec![
            response(200, "http://test.dev/"),
            walk("http://test.dev/", "http://test.dev/never-fetched"),
        ]);

        assert_eq!(
            result,
            Err(BuildError::GraphInconsistency {
                kind: GraphNode::Link,
                location: "http://test.dev/never-fetched".to_string(),
            })
        );
    }

    #[test]
    fn test_problems_do_not_abort() {
        let graph = build(vec![
            ProblemEvent {
                message: "bad url".to_string(),
                context: ":bad".to_string(),
            }
            .into(),
            response(200, "http://test.dev/"),
        ])
        .unwrap();

        assert!(graph.pages.is_empty());
        assert_eq!(graph.problems.len(), 1);
    }

    #[test]
    fn test_empty_redirect_and_error_are_dropped() {
        let graph = build(vec![
            response(200, "http://test.dev/"),
            ErrorEvent {
                status_code: 0,
                location: "http://down.dev/".to_string(),
                redirect: Some(String::new()),
                error: Some(String::new()),
            }
            .into(),
            walk("http://test.dev/", "http://down.dev/"),
        ])
        .unwrap();

        let link = &graph.pages[0].links[0];
        assert_eq!(link.redirect, None);
        assert_eq!(link.error, None);
    }

    #[tokio::test]
    async fn test_listen_drains_stream() {
        let (sink, stream) = channel(2);
        let (done_tx, done_rx) = oneshot::channel();
        let listener = tokio::spawn(listen(stream, done_rx));
        for event in [
            walk("http://test.dev/", "http://test.dev/a"),
            response(200, "http://test.dev/"),
            response(200, "http://test.dev/a"),
            walk("http://test.dev/", "http://test.dev/a"),
        ] {
            sink.emit(event).await.unwrap();
        }
        sink.close().await;
        done_tx.send(()).unwrap();

        let graph = listener.await.unwrap().unwrap();
        assert_eq!(graph.pages.len(), 1);
        assert_eq!(graph.pages[0].links.len(), 1);
    }

    #[tokio::test]
    async fn test_listen_with_unclosed_sink() {
        let (sink, stream) = channel(8);
        let (done_tx, done_rx) = oneshot::channel();
        let listener = tokio::spawn(listen(stream, done_rx));
        sink.emit(response(200, "http://test.dev/")).await.unwrap();
        sink.emit(walk("http://test.dev/", "http://test.dev/"))
            .await
            .unwrap();
        done_tx.send(()).unwrap();

        let graph = tokio::time::timeout(std::time::Duration::from_secs(2), listener)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(graph.pages.len(), 1);
        drop(sink);
    }
}
