//! Thread archiver: crawling, export and image fetching
//!
//! The `TiebaArchiver` struct and its methods are organized by stage:
//! - [`source`] - Page fetching boundary ([`PageSource`])
//! - [`crawl`] - Page parsing and batched thread crawling
//! - [`export`] - Markdown and JSON export
//! - [`images`] - Bounded-concurrency image downloads

mod crawl;
mod export;
mod images;
mod source;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use crawl::page_url;
pub use images::ensure_dir;
pub use source::{HttpPageSource, PageSource};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::{EventBus, EventSink};
use crate::types::Event;
use std::sync::Arc;
use url::Url;

/// Archives forum threads as Markdown with local images
///
/// Cheap to clone; clones share the HTTP client, page source and event sink.
#[derive(Clone)]
pub struct TiebaArchiver {
    /// Validated configuration
    pub(crate) config: Arc<Config>,
    /// Parsed `config.site.base_url`
    pub(crate) base_url: Url,
    /// HTTP client used for image downloads
    pub(crate) http: reqwest::Client,
    /// Where thread pages are read from
    pub(crate) pages: Arc<dyn PageSource>,
    /// Where progress events go
    pub(crate) sink: Arc<dyn EventSink>,
    /// Broadcast bus backing [`TiebaArchiver::subscribe`]
    pub(crate) events: EventBus,
}

impl TiebaArchiver {
    /// Create an archiver that fetches pages over HTTP and reports to an [`EventBus`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid or the HTTP
    /// client cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tieba_archive::{Config, TiebaArchiver};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let archiver = TiebaArchiver::new(Config::default())?;
    ///     archiver
    ///         .download_thread_as_markdown("https://tieba.baidu.com/p/100", 1, 3, "out/thread.md")
    ///         .await?;
    ///     Ok(())
    /// }
    /// ```
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let base_url = config.base_url()?;

        let mut builder = reqwest::Client::builder().user_agent(config.crawl.user_agent.clone());
        if let Some(timeout) = config.crawl.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| Error::Config {
            message: format!("failed to create HTTP client: {e}"),
            key: None,
        })?;

        let events = EventBus::new();
        Ok(Self {
            config: Arc::new(config),
            base_url,
            pages: Arc::new(HttpPageSource::new(http.clone())),
            http,
            sink: Arc::new(events.clone()),
            events,
        })
    }

    /// Replace the page source
    pub fn with_page_source(mut self, pages: Arc<dyn PageSource>) -> Self {
        self.pages = pages;
        self
    }

    /// Replace the event sink
    ///
    /// Events then go only to `sink`; [`TiebaArchiver::subscribe`] receivers
    /// stop receiving them.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Subscribe to progress events (only while the default sink is in use)
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn emit(&self, event: Event) {
        self.sink.record(event);
    }
}
