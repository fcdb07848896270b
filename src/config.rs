//! Configuration types for tieba-archive

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Site-specific locations and markers
///
/// Groups the constants that tie the parser to one forum's URL layout.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Canonical site URL that relative `at` anchors are joined onto
    /// (default: "https://tieba.baidu.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Image host prefix for content photos; thumbnails are rewritten to
    /// `{image_host}{last path segment}`
    /// (default: "https://imgsrc.baidu.com/forum/pic/item/")
    #[serde(default = "default_image_host")]
    pub image_host: String,

    /// Path marker identifying emoticon assets (default: "image_emoticon")
    #[serde(default = "default_emoticon_marker")]
    pub emoticon_marker: String,

    /// Query parameter carrying the page number (default: "pn")
    #[serde(default = "default_page_param")]
    pub page_param: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_host: default_image_host(),
            emoticon_marker: default_emoticon_marker(),
            page_param: default_page_param(),
        }
    }
}

/// Network behavior: concurrency bounds and HTTP client settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Pages fetched concurrently per batch; batches run sequentially (default: 3)
    #[serde(default = "default_page_batch_size")]
    pub page_batch_size: usize,

    /// Maximum image downloads in flight (default: 5)
    #[serde(default = "default_image_batch_size")]
    pub image_batch_size: usize,

    /// Per-request timeout (None = wait indefinitely)
    #[serde(default, with = "optional_duration_serde")]
    pub request_timeout: Option<Duration>,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            page_batch_size: default_page_batch_size(),
            image_batch_size: default_image_batch_size(),
            request_timeout: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Main configuration for tieba-archive
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site locations and markers
    #[serde(default)]
    pub site: SiteConfig,

    /// Concurrency and HTTP settings
    #[serde(default)]
    pub crawl: CrawlConfig,
}

impl Config {
    /// Check that the configuration can drive a crawl
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a batch size is zero or a site URL does not parse.
    pub fn validate(&self) -> Result<()> {
        if self.crawl.page_batch_size == 0 {
            return Err(Error::Config {
                message: "page batch size must be at least 1".to_string(),
                key: Some("crawl.page_batch_size".to_string()),
            });
        }
        if self.crawl.image_batch_size == 0 {
            return Err(Error::Config {
                message: "image batch size must be at least 1".to_string(),
                key: Some("crawl.image_batch_size".to_string()),
            });
        }
        self.base_url()?;
        Url::parse(&self.site.image_host).map_err(|e| Error::Config {
            message: format!("invalid image host {:?}: {}", self.site.image_host, e),
            key: Some("site.image_host".to_string()),
        })?;
        if self.site.page_param.is_empty() {
            return Err(Error::Config {
                message: "page parameter name must not be empty".to_string(),
                key: Some("site.page_param".to_string()),
            });
        }
        Ok(())
    }

    /// Parsed site base URL
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.site.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL {:?}: {}", self.site.base_url, e),
            key: Some("site.base_url".to_string()),
        })
    }
}

fn default_base_url() -> String {
    "https://tieba.baidu.com".to_string()
}

fn default_image_host() -> String {
    "https://imgsrc.baidu.com/forum/pic/item/".to_string()
}

fn default_emoticon_marker() -> String {
    "image_emoticon".to_string()
}

fn default_page_param() -> String {
    "pn".to_string()
}

fn default_page_batch_size() -> usize {
    3
}

fn default_image_batch_size() -> usize {
    5
}

fn default_user_agent() -> String {
    concat!("tieba-archive/", env!("CARGO_PKG_VERSION")).to_string()
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
