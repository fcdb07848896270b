//! # tieba-archive
//!
//! Archive Baidu Tieba threads as self-contained Markdown documents with
//! their images saved locally.
//!
//! ## Pipeline
//!
//! 1. [`TiebaArchiver::crawl_thread`] fetches a page range in bounded batches
//!    and keeps floors in page order.
//! 2. [`parser`] turns each page into typed [`Floor`] records, dropping
//!    advertisement floors and classifying images.
//! 3. [`TiebaArchiver::export_markdown`] writes the document and downloads
//!    every referenced image into a sibling `images/` directory.
//!
//! Progress is reported through an [`EventSink`]; nothing is printed.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tieba_archive::{Config, TiebaArchiver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let archiver = TiebaArchiver::new(Config::default())?;
//!
//!     // Subscribe to events
//!     let mut events = archiver.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     archiver
//!         .download_thread_as_markdown("https://tieba.baidu.com/p/100", 1, 5, "archive/thread.md")
//!         .await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Crawling, export and image fetching
pub mod archiver;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Event sinks
pub mod events;
/// Markdown rendering
pub mod markdown;
/// Thread page parsing
pub mod parser;
/// Core types and events
pub mod types;

// Re-export commonly used types
pub use archiver::{HttpPageSource, PageSource, TiebaArchiver};
pub use config::{Config, CrawlConfig, SiteConfig};
pub use error::{Error, ErrorKind, Result};
pub use events::{EventBus, EventSink, MemorySink, TracingSink};
pub use types::{ContentItem, Event, Floor, Image};
