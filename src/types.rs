//! Core types for tieba-archive

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Format of [`Floor::time`]
pub const FLOOR_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A resolved image reference
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Image {
    /// File name under the `images/` directory
    pub filename: String,
    /// URL the image is downloaded from
    pub url: String,
}

/// One unit of a floor's body
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ContentItem {
    /// Literal text, a line break (`"\n"`), or emphasis-wrapped text
    Text(String),
    /// Hyperlink
    Link {
        /// Anchor text
        text: String,
        /// Absolute target URL
        url: String,
    },
    /// Inline image (emoticon or content photo)
    Image(Image),
}

impl ContentItem {
    /// Shorthand for a text item
    pub fn text(value: impl Into<String>) -> Self {
        ContentItem::Text(value.into())
    }

    /// Shorthand for a link item
    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        ContentItem::Link {
            text: text.into(),
            url: url.into(),
        }
    }

    /// The image carried by this item, if any
    pub fn as_image(&self) -> Option<&Image> {
        match self {
            ContentItem::Image(image) => Some(image),
            _ => None,
        }
    }
}

/// One reply in a thread
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    /// Displayed floor index, e.g. "12楼"
    pub label: String,
    /// Author display name
    pub author: String,
    /// Post time as shown on the page (`YYYY-MM-DD HH:MM`)
    pub time: String,
    /// Body items in document order
    pub content: Vec<ContentItem>,
}

impl Floor {
    /// Parse [`Floor::time`] into a timestamp
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.time, FLOOR_TIME_FORMAT).ok()
    }

    /// Images in this floor, in content order
    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.content.iter().filter_map(ContentItem::as_image)
    }
}

/// Progress event emitted by the archiving pipeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A thread page was fetched
    PageCrawled {
        /// Page URL
        url: String,
    },

    /// A thread page was parsed into floors
    PageProcessed {
        /// Page URL
        url: String,
        /// Number of floors kept (advertisements excluded)
        floors: usize,
    },

    /// Every page of a thread range was parsed
    ThreadCrawled {
        /// Thread URL (without page parameter)
        url: String,
        /// Total floors across all pages
        floors: usize,
    },

    /// A content node of an unhandled kind was skipped
    UnrecognizedNode {
        /// Floor label the node belongs to
        floor: String,
        /// Node tag name (or node type for non-elements)
        kind: String,
    },

    /// The Markdown document was written
    MarkdownWritten {
        /// Output file path
        path: PathBuf,
    },

    /// Floors were dumped as JSON
    JsonWritten {
        /// Output file path
        path: PathBuf,
    },

    /// An image was downloaded
    ImageDownloaded {
        /// Source URL
        url: String,
        /// Destination path
        path: PathBuf,
    },

    /// An image already existed on disk and was not fetched
    ImageSkipped {
        /// Destination path
        path: PathBuf,
    },

    /// An image download failed
    ImageFailed {
        /// Source URL
        url: String,
        /// Error message
        error: String,
    },

    /// Markdown and images for a thread were exported
    Exported {
        /// Output file path
        path: PathBuf,
        /// Number of images referenced by the document
        images: usize,
    },
}
