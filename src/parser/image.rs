//! Image identity: emoticon vs. content photo

use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::types::Image;
use url::Url;

/// Extension given to synthesized content-photo filenames
const PHOTO_EXTENSION: &str = "jpg";

/// Classify an image source and compute its stable filename and download URL
///
/// Emoticons keep their server-assigned filename and source URL. Content
/// photos are renamed to `{floor_label}.{ordinal}.jpg` and fetched from
/// `site.image_host` by their last path segment, which drops the thumbnail
/// prefix the CDN puts in front of the original.
///
/// # Errors
///
/// Returns [`Error::MalformedUrl`] if `source_url` is not an absolute URL or
/// its path has no final segment.
///
/// # Examples
///
/// ```
/// use tieba_archive::config::SiteConfig;
/// use tieba_archive::parser::resolve_image;
///
/// let site = SiteConfig::default();
/// let image = resolve_image(
///     "http://tiebapic.baidu.com/forum/w%3D580/sign=x/abc.jpg",
///     "12楼",
///     3,
///     &site,
/// )
/// .unwrap();
/// assert_eq!(image.filename, "12楼.3.jpg");
/// assert_eq!(image.url, "https://imgsrc.baidu.com/forum/pic/item/abc.jpg");
/// ```
pub fn resolve_image(
    source_url: &str,
    floor_label: &str,
    ordinal: usize,
    site: &SiteConfig,
) -> Result<Image> {
    let parsed = Url::parse(source_url).map_err(|e| Error::malformed_url(source_url, e))?;
    let last_segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| Error::malformed_url(source_url, "no file name in path"))?;

    if parsed.path().contains(&site.emoticon_marker) {
        return Ok(Image {
            filename: last_segment.to_string(),
            url: source_url.to_string(),
        });
    }

    Ok(Image {
        filename: format!("{floor_label}.{ordinal}.{PHOTO_EXTENSION}"),
        url: format!("{}{}", site.image_host, last_segment),
    })
}
