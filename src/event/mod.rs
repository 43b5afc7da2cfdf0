//! Crawl events
//!
//! A crawler describes everything it does on one site as a stream of four
//! event kinds, delivered through an [`EventSink`] and consumed by the site
//! builder through the matching [`EventStream`].

mod channel;

pub use channel::{channel, EventSink, EventStream};

/// A page or link was fetched successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEvent {
    pub status_code: u16,
    pub location: String,
}

/// A fetch failed, or stopped at a redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    /// 0 when no response was received at all
    pub status_code: u16,
    pub location: String,
    /// `Location` header of a redirect response
    pub redirect: Option<String>,
    pub error: Option<String>,
}

/// `href` was discovered on `page`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEvent {
    pub page: String,
    pub href: String,
}

/// Something odd that does not fit the graph, such as an unparsable href
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemEvent {
    pub message: String,
    pub context: String,
}

/// One observation made while crawling a single site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Response(ResponseEvent),
    Error(ErrorEvent),
    Walk(WalkEvent),
    Problem(ProblemEvent),
}

impl Event {
    /// Short name of the event kind, used in logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Response(_) => "response",
            Event::Error(_) => "error",
            Event::Walk(_) => "walk",
            Event::Problem(_) => "problem",
        }
    }
}

impl From<ResponseEvent> for Event {
    fn from(event: ResponseEvent) -> Self {
        Event::Response(event)
    }
}

impl From<ErrorEvent> for Event {
    fn from(event: ErrorEvent) -> Self {
        Event::Error(event)
    }
}

impl From<WalkEvent> for Event {
    fn from(event: WalkEvent) -> Self {
        Event::Walk(event)
    }
}

impl From<ProblemEvent> for Event {
    fn from(event: ProblemEvent) -> Self {
        Event::Problem(event)
    }
}
