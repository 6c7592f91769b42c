//! In-memory document tree serialized into the IDML package.

use super::geometry::{Bounds, PageSide, Transform};
use crate::markup::Paragraph;

/// Applied paragraph and character style names.
pub mod styles {
    pub const NO_CHARACTER_STYLE: &str = "CharacterStyle/$ID/[No character style]";
    pub const NO_PARAGRAPH_STYLE: &str = "ParagraphStyle/$ID/[No paragraph style]";

    pub const POST_BODY: &str = "PostBody";
    pub const POST_DATE: &str = "PostDate";
    pub const AUTHOR_NAME: &str = "AuthorName";

    /// `ParagraphStyle/<name>`
    pub fn paragraph(name: &str) -> String {
        format!("ParagraphStyle/{name}")
    }

    /// `CharacterStyle/<name>`
    pub fn character(name: &str) -> String {
        format!("CharacterStyle/{name}")
    }
}

/// One or two facing pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Spread {
    pub id: String,
    pub pages: Vec<Page>,
    /// 0 for the solitary first page, 1 for facing pages
    pub binding_location: u8,
    pub transform: Transform,
}

impl Spread {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// A page and the frames placed on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub id: String,
    /// 1-based document page number
    pub number: usize,
    /// `0 0 height width`
    pub bounds: Bounds,
    pub transform: Transform,
    pub frames: Vec<Frame>,
}

impl Page {
    pub fn side(&self) -> PageSide {
        PageSide::of(self.number)
    }
}

/// A text frame threaded to a story.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFrame {
    pub id: String,
    pub story_id: String,
    pub bounds: Bounds,
    pub transform: Transform,
}

/// A graphic frame holding a linked image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFrame {
    pub id: String,
    pub image_id: String,
    pub link_id: String,
    /// Package-relative path, e.g. `Links/chan/media/1.jpg`
    pub link_path: String,
    pub bounds: Bounds,
    pub transform: Transform,
    /// Stroke in points; `None` draws no border
    pub stroke_weight: Option<f64>,
}

/// A page item.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Text(TextFrame),
    /// Rectangular image
    Image(ImageFrame),
    /// Circular author picture
    Avatar(ImageFrame),
}

impl Frame {
    pub fn id(&self) -> &str {
        match self {
            Frame::Text(f) => &f.id,
            Frame::Image(f) | Frame::Avatar(f) => &f.id,
        }
    }

    pub fn bounds(&self) -> &Bounds {
        match self {
            Frame::Text(f) => &f.bounds,
            Frame::Image(f) | Frame::Avatar(f) => &f.bounds,
        }
    }
}

/// Paragraphs sharing one paragraph and character style.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryRange {
    /// Style name without the `ParagraphStyle/` prefix
    pub paragraph_style: &'static str,
    /// Style name without the `CharacterStyle/` prefix
    pub character_style: &'static str,
    pub paragraphs: Vec<Paragraph>,
}

impl StoryRange {
    pub fn new(style: &'static str, paragraphs: Vec<Paragraph>) -> Self {
        Self {
            paragraph_style: style,
            character_style: style,
            paragraphs,
        }
    }
}

/// A text flow.
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    pub id: String,
    pub ranges: Vec<StoryRange>,
}

impl Story {
    /// Total paragraphs across all ranges.
    pub fn paragraph_count(&self) -> usize {
        self.ranges.iter().map(|r| r.paragraphs.len()).sum()
    }
}

/// An image link registered for the package.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: String,
    pub path: String,
}
