//! Event sinks: where pipeline progress is reported
//!
//! Pipeline stages never print. They hand [`Event`]s to an injected
//! [`EventSink`], so parsing and crawling stay testable without capturing
//! output.

use crate::types::Event;
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Capacity of the broadcast channel used by [`EventBus`]
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Receiver of pipeline progress events
///
/// Recording is fire-and-forget: implementations must not block and must not fail.
pub trait EventSink: Send + Sync {
    /// Record one event
    fn record(&self, event: Event);
}

/// Sink that logs every event through `tracing`
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: Event) {
        log_event(&event);
    }
}

/// Default sink: logs through `tracing` and broadcasts to subscribers
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Subscribe to events recorded from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus {
    fn record(&self, event: Event) {
        log_event(&event);
        // send() returns Err if there are no receivers, which is fine - we just drop the event
        self.tx.send(event).ok();
    }
}

/// Sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far
    pub fn events(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: Event) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

fn log_event(event: &Event) {
    match event {
        Event::PageCrawled { url } => tracing::info!(url = %url, "crawled thread page"),
        Event::PageProcessed { url, floors } => {
            tracing::info!(url = %url, floors, "processed thread page")
        }
        Event::ThreadCrawled { url, floors } => {
            tracing::info!(url = %url, floors, "processed thread")
        }
        Event::UnrecognizedNode { floor, kind } => {
            tracing::debug!(floor = %floor, kind = %kind, "skipped unrecognized content node")
        }
        Event::MarkdownWritten { path } => {
            tracing::info!(path = %path.display(), "wrote thread to markdown file")
        }
        Event::JsonWritten { path } => {
            tracing::info!(path = %path.display(), "wrote thread to json file")
        }
        Event::ImageDownloaded { url, path } => {
            tracing::info!(url = %url, path = %path.display(), "downloaded image")
        }
        Event::ImageSkipped { path } => {
            tracing::debug!(path = %path.display(), "image already exists, skipping")
        }
        Event::ImageFailed { url, error } => {
            tracing::warn!(url = %url, error = %error, "image download failed")
        }
        Event::Exported { path, images } => {
            tracing::info!(path = %path.display(), images, "exported thread")
        }
    }
}
