//! Error types for tieba-archive
//!
//! Every stage of the pipeline (page parse, thread crawl, markdown write,
//! image batch) surfaces its failure through [`Error`]. Nothing recovers
//! internally: a failed page aborts the crawl, a failed image aborts the
//! image batch.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tieba-archive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tieba-archive
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "crawl.page_batch_size")
        key: Option<String>,
    },

    /// Page fetch failed (transport error or non-2xx response)
    #[error("failed to fetch {url}: {reason}")]
    FetchFailed {
        /// The URL that could not be fetched
        url: String,
        /// Transport error or HTTP status description
        reason: String,
    },

    /// A URL could not be parsed or has no usable path segment
    #[error("malformed URL {url:?}: {reason}")]
    MalformedUrl {
        /// The offending URL text
        url: String,
        /// Why the URL was rejected
        reason: String,
    },

    /// Required floor metadata is absent from the page markup
    #[error("missing {field} in floor {}", .floor.as_deref().unwrap_or("<unknown>"))]
    MissingField {
        /// Name of the missing field ("author", "time", "floor", "content")
        field: &'static str,
        /// Label of the floor being mapped, when already known
        floor: Option<String>,
    },

    /// Target path exists but is not a directory
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The occupied path
        path: PathBuf,
    },

    /// Image download failed (request, status or body stream error)
    #[error("failed to download image {url}: {reason}")]
    DownloadFailed {
        /// Source URL of the image
        url: String,
        /// The reason the download failed
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Flat classification of [`Error`] variants
///
/// Useful for comparing failures without matching on their payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::Config`]
    Config,
    /// See [`Error::FetchFailed`]
    FetchFailed,
    /// See [`Error::MalformedUrl`]
    MalformedUrl,
    /// See [`Error::MissingField`]
    MissingField,
    /// See [`Error::NotADirectory`]
    NotADirectory,
    /// See [`Error::DownloadFailed`]
    DownloadFailed,
    /// See [`Error::Io`]
    Io,
    /// See [`Error::Serialization`]
    Serialization,
}

impl ErrorKind {
    /// Machine-readable error code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config_error",
            ErrorKind::FetchFailed => "fetch_failed",
            ErrorKind::MalformedUrl => "malformed_url",
            ErrorKind::MissingField => "missing_field",
            ErrorKind::NotADirectory => "not_a_directory",
            ErrorKind::DownloadFailed => "download_failed",
            ErrorKind::Io => "io_error",
            ErrorKind::Serialization => "serialization_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. } => ErrorKind::Config,
            Error::FetchFailed { .. } => ErrorKind::FetchFailed,
            Error::MalformedUrl { .. } => ErrorKind::MalformedUrl,
            Error::MissingField { .. } => ErrorKind::MissingField,
            Error::NotADirectory { .. } => ErrorKind::NotADirectory,
            Error::DownloadFailed { .. } => ErrorKind::DownloadFailed,
            Error::Io(_) => ErrorKind::Io,
            Error::Serialization(_) => ErrorKind::Serialization,
        }
    }

    pub(crate) fn malformed_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Error::MalformedUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn missing(field: &'static str, floor: Option<&str>) -> Self {
        Error::MissingField {
            field,
            floor: floor.map(str::to_string),
        }
    }
}
