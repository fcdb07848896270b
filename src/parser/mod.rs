//! Thread page parsing
//!
//! Turns the HTML of one thread page into [`Floor`] records:
//! - [`floor`] - content mapping for a single reply container
//! - [`image`] - emoticon/photo classification and naming
//!
//! Parsing is synchronous and side-effect free apart from the injected
//! [`EventSink`]; fetching lives in [`crate::archiver`].

mod floor;
mod image;

pub use floor::map_floor;
pub use image::resolve_image;

use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::types::Floor;
use scraper::{ElementRef, Html};
use url::Url;

/// Everything a floor needs to resolve links and images
#[derive(Clone, Copy)]
pub struct ParseContext<'a> {
    /// URL of the page being parsed; image sources are resolved against it
    pub page_url: &'a Url,
    /// Site base URL for relative `at` anchors
    pub base_url: &'a Url,
    /// Site markers and image host
    pub site: &'a SiteConfig,
    /// Diagnostics sink
    pub sink: &'a dyn EventSink,
}

/// CSS selectors and patterns for the thread page markup
#[allow(clippy::expect_used)]
pub(crate) mod selectors {
    use regex::Regex;
    use scraper::Selector;
    use std::sync::LazyLock;

    fn css(selector: &str) -> Selector {
        Selector::parse(selector).expect("static selector is valid")
    }

    /// Reply container
    pub(crate) static FLOOR: LazyLock<Selector> = LazyLock::new(|| css(".l_post"));
    /// Present only inside advertisement floors
    pub(crate) static AD_MARKER: LazyLock<Selector> = LazyLock::new(|| css(".ad_bottom_view"));
    /// Author display name
    pub(crate) static AUTHOR: LazyLock<Selector> = LazyLock::new(|| css(".p_author_name"));
    /// Reply body
    pub(crate) static CONTENT: LazyLock<Selector> = LazyLock::new(|| css(".d_post_content"));
    /// Metadata row (client, floor index, time)
    pub(crate) static TAIL: LazyLock<Selector> = LazyLock::new(|| css(".post-tail-wrap"));

    pub(crate) static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}").expect("static regex is valid")
    });
    pub(crate) static FLOOR_INDEX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\d+楼$").expect("static regex is valid"));
}

/// Element children of a floor's metadata row
pub(crate) fn metadata_entries<'a>(
    floor_root: ElementRef<'a>,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    floor_root
        .select(&selectors::TAIL)
        .next()
        .into_iter()
        .flat_map(|tail| tail.children().filter_map(ElementRef::wrap))
}

/// Displayed floor index (e.g. "12楼") from the metadata row
///
/// # Errors
///
/// Returns [`Error::MissingField`] if no metadata entry looks like a floor index.
pub fn floor_label(floor_root: ElementRef<'_>) -> Result<String> {
    metadata_entries(floor_root)
        .map(|entry| entry.text().collect::<String>().trim().to_string())
        .find(|text| selectors::FLOOR_INDEX.is_match(text))
        .ok_or_else(|| Error::missing("floor", None))
}

/// Whether a floor container is an advertisement
pub fn is_advertisement(floor_root: ElementRef<'_>) -> bool {
    floor_root.select(&selectors::AD_MARKER).next().is_some()
}

/// Parse one thread page into its floors, in document order
///
/// Advertisement floors are dropped before mapping.
///
/// # Errors
///
/// Any floor that fails to map aborts the whole page; no partial result is returned.
pub fn parse_page_html(html: &str, ctx: &ParseContext<'_>) -> Result<Vec<Floor>> {
    let document = Html::parse_document(html);
    document
        .select(&selectors::FLOOR)
        .filter(|floor| !is_advertisement(*floor))
        .map(|floor| {
            let label = floor_label(floor)?;
            map_floor(floor, &label, ctx)
        })
        .collect()
}
