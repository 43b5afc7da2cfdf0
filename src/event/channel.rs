use crate::event::Event;
use crate::{BuildError, CrawlError};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::sync::oneshot;

/// What actually travels through the queue: events, then one end marker
#[derive(Debug)]
enum Envelope {
    Event(Event),
    End,
}

impl Envelope {
    fn kind(&self) -> &'static str {
        match self {
            Envelope::Event(event) => event.kind(),
            Envelope::End => "end",
        }
    }
}

/// Creates a bounded event queue for one site
///
/// The sink goes to the crawler, the stream to the site builder. `capacity`
/// bounds how many events may be buffered before `emit` waits.
pub fn channel(capacity: usize) -> (EventSink, EventStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        EventSink { tx },
        EventStream {
            rx,
            ended: false,
        },
    )
}

/// Write half of a site's event queue
///
/// Clones may be handed to worker tasks. Exactly one handle must be closed
/// when the walk terminates. Handles still alive after the crawl returns are
/// never waited for.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::Sender<Envelope>,
}

impl EventSink {
    /// Sends one event, waiting for queue capacity
    pub async fn emit(&self, event: impl Into<Event>) -> Result<(), CrawlError> {
        self.tx
            .send(Envelope::Event(event.into()))
            .await
            .map_err(|_| CrawlError::SinkClosed)
    }

    /// Marks the end of the stream
    pub async fn close(self) {
        if self.tx.send(Envelope::End).await.is_err() {
            tracing::debug!("event stream already dropped before close");
        }
    }
}

/// Read half of a site's event queue
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::Receiver<Envelope>,
    ended: bool,
}

impl EventStream {
    /// Receives the next event, None once the stream has ended
    pub async fn next(&mut self) -> Option<Event> {
        if self.ended {
            return None;
        }
        match self.rx.recv().await {
            Some(Envelope::Event(event)) => Some(event),
            Some(Envelope::End) => {
                self.ended = true;
                None
            }
            None => {
                tracing::warn!("event sink dropped without close");
                self.ended = true;
                None
            }
        }
    }

    /// Takes the next queued event without waiting
    ///
    /// Meant for after the crawl has returned: an empty queue without an end
    /// marker means the crawler never closed its sink, and ends the stream.
    pub fn try_next(&mut self) -> Option<Event> {
        if self.ended {
            return None;
        }
        match self.rx.try_recv() {
            Ok(Envelope::Event(event)) => Some(event),
            Ok(Envelope::End) => {
                self.ended = true;
                None
            }
            Err(TryRecvError::Disconnected) => {
                tracing::warn!("event sink dropped without close");
                self.ended = true;
                None
            }
            Err(TryRecvError::Empty) => {
                tracing::warn!("crawler returned without closing the event sink");
                self.ended = true;
                None
            }
        }
    }

    /// Keeps the queue drained after the end marker until the crawl returns
    ///
    /// Anything that arrives in the meantime, an event or a second close,
    /// breaks the close-once contract. Sink clones the crawler still holds
    /// are not waited for.
    pub async fn finish(mut self, crawl_done: oneshot::Receiver<()>) -> Result<(), BuildError> {
        let mut crawl_done = crawl_done;
        let mut stray = None;
        loop {
            tokio::select! {
                received = self.rx.recv() => match received {
                    Some(envelope) => {
                        stray.get_or_insert(envelope.kind());
                    }
                    None => {
                        let _ = (&mut crawl_done).await;
                        break;
                    }
                },
                _ = &mut crawl_done => break,
            }
        }
        self.check_trailing(stray)
    }

    /// Checks, without waiting, that nothing is queued after the end marker
    pub fn finish_now(mut self) -> Result<(), BuildError> {
        self.check_trailing(None)
    }

    fn check_trailing(&mut self, mut stray: Option<&'static str>) -> Result<(), BuildError> {
        while let Ok(envelope) = self.rx.try_recv() {
            stray.get_or_insert(envelope.kind());
        }
        match stray {
            Some(kind) => Err(BuildError::UnexpectedEvent { kind }),
            None => Ok(()),
        }
    }
}
