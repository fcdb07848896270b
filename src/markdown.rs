//! Markdown rendering of a crawled thread

use crate::types::{ContentItem, Floor, Image};

/// Directory, relative to the Markdown file, that images are saved into
pub const IMAGES_DIR: &str = "images";

/// Separator between floors
const FLOOR_SEPARATOR: &str = "\n\n";

fn render_item(item: &ContentItem) -> String {
    match item {
        ContentItem::Link { text, url } => format!("[{text}]({url})"),
        ContentItem::Image(Image { filename, .. }) => {
            format!("![{filename}]({IMAGES_DIR}/{filename})")
        }
        ContentItem::Text(text) if text == "\n" => "\n\n".to_string(),
        ContentItem::Text(text) => text.trim().to_string(),
    }
}

/// Render one floor: its items run together, followed by an attribution line
///
/// # Examples
///
/// ```
/// use tieba_archive::markdown::render_floor;
/// use tieba_archive::{ContentItem, Floor};
///
/// let floor = Floor {
///     label: "1楼".to_string(),
///     author: "alice".to_string(),
///     time: "2020-01-01 00:00".to_string(),
///     content: vec![
///         ContentItem::text("hello"),
///         ContentItem::text("\n"),
///         ContentItem::link("jsdom", "http://x"),
///     ],
/// };
/// assert_eq!(
///     render_floor(&floor),
///     "hello\n\n[jsdom](http://x)\n\n*by alice at 2020-01-01 00:00*"
/// );
/// ```
pub fn render_floor(floor: &Floor) -> String {
    let mut out: String = floor.content.iter().map(render_item).collect();
    out.push_str(&format!("\n\n*by {} at {}*", floor.author, floor.time));
    out
}

/// Render a whole thread, floors separated by a blank line
pub fn render_markdown(floors: &[Floor]) -> String {
    floors
        .iter()
        .map(render_floor)
        .collect::<Vec<_>>()
        .join(FLOOR_SEPARATOR)
}

/// Every image referenced by `floors`, in floor order then content order
pub fn collect_images(floors: &[Floor]) -> Vec<Image> {
    floors
        .iter()
        .flat_map(|floor| floor.images().cloned())
        .collect()
}
