//! Floor content mapping: one reply container to a typed [`Floor`]

use super::{ParseContext, image::resolve_image, selectors};
use crate::error::{Error, Result};
use crate::types::{ContentItem, Event, Floor};
use scraper::{ElementRef, Node};

/// Anchor class whose `href` is already absolute
const DIRECT_LINK_CLASS: &str = "j-no-opener-url";

/// Anchor class whose `href` is relative to the site base URL
const SITE_LINK_CLASS: &str = "at";

/// Kind of one child node of a floor's content container
#[derive(Debug)]
enum NodeKind<'a> {
    Text(&'a str),
    LineBreak,
    Emphasis(ElementRef<'a>),
    Strong(ElementRef<'a>),
    Anchor(ElementRef<'a>),
    Image(ElementRef<'a>),
    /// Lightbox wrapper around a single image; holds the nested `img`
    WrappedImage(ElementRef<'a>),
    Other(String),
}

impl<'a> NodeKind<'a> {
    fn of_element(element: ElementRef<'a>) -> Self {
        match element.value().name() {
            "br" => NodeKind::LineBreak,
            "em" | "i" => NodeKind::Emphasis(element),
            "strong" | "b" => NodeKind::Strong(element),
            "a" => NodeKind::Anchor(element),
            "img" => NodeKind::Image(element),
            "div" | "span" => match single_image_child(element) {
                Some(img) => NodeKind::WrappedImage(img),
                None => NodeKind::Other(element.value().name().to_string()),
            },
            other => NodeKind::Other(other.to_string()),
        }
    }

    fn of_node(node: &'a Node) -> Self {
        match node {
            Node::Text(text) => NodeKind::Text(&**text),
            Node::Comment(_) => NodeKind::Other("#comment".to_string()),
            _ => NodeKind::Other("#node".to_string()),
        }
    }
}

/// The only `img` inside `element`, if it wraps nothing else of substance
fn single_image_child(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut found = None;
    for child in element.children() {
        match child.value() {
            Node::Text(text) if text.trim().is_empty() => {}
            Node::Element(el) if el.name() == "img" && found.is_none() => {
                found = ElementRef::wrap(child);
            }
            _ => return None,
        }
    }
    found
}

/// Visible text of an element
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Map one floor container to a [`Floor`]
///
/// `floor_label` is the displayed floor index (e.g. "12楼"); it is stored on
/// the record and used to name content photos. Every child node of the
/// content container is visited in order; an image's ordinal is its 0-based
/// position among all of those children, including ones that are skipped.
///
/// # Errors
///
/// - [`Error::MissingField`] if the author, time or content container is absent
/// - [`Error::MalformedUrl`] if an image source or site link cannot be resolved
pub fn map_floor(
    floor_root: ElementRef<'_>,
    floor_label: &str,
    ctx: &ParseContext<'_>,
) -> Result<Floor> {
    let author = floor_root
        .select(&selectors::AUTHOR)
        .next()
        .map(|el| text_of(el).trim().to_string())
        .ok_or_else(|| Error::missing("author", Some(floor_label)))?;

    let time = floor_time(floor_root).ok_or_else(|| Error::missing("time", Some(floor_label)))?;

    let body = floor_root
        .select(&selectors::CONTENT)
        .next()
        .ok_or_else(|| Error::missing("content", Some(floor_label)))?;

    let mut content = Vec::new();
    for (ordinal, child) in body.children().enumerate() {
        let kind = match ElementRef::wrap(child) {
            Some(element) => NodeKind::of_element(element),
            None => NodeKind::of_node(child.value()),
        };
        if let Some(item) = visit(kind, floor_label, ordinal, ctx)? {
            content.push(item);
        }
    }

    Ok(Floor {
        label: floor_label.to_string(),
        author,
        time,
        content,
    })
}

fn visit(
    kind: NodeKind<'_>,
    floor_label: &str,
    ordinal: usize,
    ctx: &ParseContext<'_>,
) -> Result<Option<ContentItem>> {
    let item = match kind {
        NodeKind::Text(text) => ContentItem::text(text),
        NodeKind::LineBreak => ContentItem::text("\n"),
        NodeKind::Emphasis(el) => ContentItem::Text(format!("*{}*", text_of(el))),
        NodeKind::Strong(el) => ContentItem::Text(format!("**{}**", text_of(el))),
        NodeKind::Anchor(el) => map_anchor(el, ctx)?,
        NodeKind::Image(img) | NodeKind::WrappedImage(img) => {
            let src = img
                .value()
                .attr("src")
                .ok_or_else(|| Error::malformed_url("", "image without src"))?;
            let source = ctx
                .page_url
                .join(src)
                .map_err(|e| Error::malformed_url(src, e))?;
            ContentItem::Image(resolve_image(
                source.as_str(),
                floor_label,
                ordinal,
                ctx.site,
            )?)
        }
        NodeKind::Other(kind) => {
            ctx.sink.record(Event::UnrecognizedNode {
                floor: floor_label.to_string(),
                kind,
            });
            return Ok(None);
        }
    };
    Ok(Some(item))
}

/// Anchors become links only for the two known link classes; anything else
/// (floor-jump controls, unclassed anchors) degrades to its text.
fn map_anchor(anchor: ElementRef<'_>, ctx: &ParseContext<'_>) -> Result<ContentItem> {
    let text = text_of(anchor);
    let Some(href) = anchor.value().attr("href") else {
        return Ok(ContentItem::Text(text));
    };
    let has_class = |class: &str| anchor.value().classes().any(|c| c == class);

    if has_class(DIRECT_LINK_CLASS) {
        return Ok(ContentItem::link(text, href));
    }
    if has_class(SITE_LINK_CLASS) {
        let url = ctx
            .base_url
            .join(href)
            .map_err(|e| Error::malformed_url(href, e))?;
        return Ok(ContentItem::link(text, url.to_string()));
    }
    Ok(ContentItem::Text(text))
}

/// First metadata entry whose text carries a `YYYY-MM-DD HH:MM` timestamp
fn floor_time(floor_root: ElementRef<'_>) -> Option<String> {
    super::metadata_entries(floor_root).find_map(|entry| {
        selectors::TIMESTAMP
            .find(&text_of(entry))
            .map(|m| m.as_str().to_string())
    })
}
