//! Frozen page layouts produced by the browser renderer.
//!
//! A frozen layout records where every post landed after the channel was
//! paginated for print. Coordinates are millimetres: `top` is measured from
//! the page-break boundary, `left` is already absolute within the margin box.
//!
//! ```json
//! {
//!   "pages": [
//!     {
//!       "page_number": 1,
//!       "posts": [
//!         {
//!           "telegram_id": 42,
//!           "channel_id": "llamasass",
//!           "bounds": {"top": 0, "left": 20, "width": 170, "height": 40},
//!           "media": [
//!             {"type": "image", "bounds": {"top": 12, "left": 20, "width": 80, "height": 60}, "border_width": 2}
//!           ]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PressError, Result};

/// Slack allowed for slightly negative positions from the renderer.
pub const POSITION_TOLERANCE_MM: f64 = -10.0;

/// A rectangle in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectMm {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl RectMm {
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Positive size and a position within tolerance.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.top >= POSITION_TOLERANCE_MM
            && self.left >= POSITION_TOLERANCE_MM
    }
}

/// Kind of a media element in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    /// Anything the renderer drew that isn't a placeable image (video poster, poll, ...)
    #[default]
    #[serde(other)]
    Other,
}

/// A media box inside a frozen post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaElement {
    #[serde(rename = "type", default)]
    pub kind: MediaKind,

    pub bounds: RectMm,

    /// Border width in CSS pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,

    /// Album member shown in this box; defaults to the frozen post itself
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_id: Option<i64>,
}

impl MediaElement {
    /// Creates an image element.
    pub fn image(bounds: RectMm) -> Self {
        Self {
            kind: MediaKind::Image,
            bounds,
            border_width: None,
            telegram_id: None,
        }
    }

    /// Sets the border width in pixels.
    #[must_use]
    pub fn with_border(mut self, px: f64) -> Self {
        self.border_width = Some(px);
        self
    }

    /// Points the element at an album member.
    #[must_use]
    pub fn for_post(mut self, telegram_id: i64) -> Self {
        self.telegram_id = Some(telegram_id);
        self
    }

    pub fn has_valid_bounds(&self) -> bool {
        self.bounds.is_valid()
    }
}

/// One post placed on a frozen page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrozenPost {
    pub telegram_id: i64,
    pub channel_id: String,
    pub bounds: RectMm,

    #[serde(default)]
    pub media: Vec<MediaElement>,

    /// Overrides the post's own date in the date line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl FrozenPost {
    pub fn new(telegram_id: i64, channel_id: impl Into<String>, bounds: RectMm) -> Self {
        Self {
            telegram_id,
            channel_id: channel_id.into(),
            bounds,
            media: Vec::new(),
            date: None,
        }
    }

    /// Adds a media element.
    #[must_use]
    pub fn with_media(mut self, media: MediaElement) -> Self {
        self.media.push(media);
        self
    }

    /// Overrides the date line.
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// A page of a frozen layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrozenPage {
    /// 1-based page number
    pub page_number: usize,

    #[serde(default)]
    pub posts: Vec<FrozenPost>,
}

/// A whole frozen layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrozenLayout {
    #[serde(default)]
    pub pages: Vec<FrozenPage>,
}

impl FrozenLayout {
    /// Parses and validates a layout document.
    ///
    /// Page numbers must be at least 1 and unique. Media boxes are not
    /// checked here: bad ones are skipped with a warning at export time.
    pub fn from_json(json: &str) -> Result<Self> {
        let layout: FrozenLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Loads a layout document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| match e {
            PressError::InvalidLayout { message, path: None } => {
                PressError::invalid_layout(message, Some(path.to_path_buf()))
            }
            other => other,
        })
    }

    fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for page in &self.pages {
            if page.page_number == 0 {
                return Err(PressError::invalid_layout("page_number must be >= 1", None));
            }
            if !seen.insert(page.page_number) {
                return Err(PressError::invalid_layout(
                    format!("page {} appears more than once", page.page_number),
                    None,
                ));
            }
        }
        Ok(())
    }

    /// Pages in ascending page-number order.
    pub fn sorted_pages(&self) -> Vec<&FrozenPage> {
        let mut pages: Vec<_> = self.pages.iter().collect();
        pages.sort_by_key(|p| p.page_number);
        pages
    }

    /// Total number of placed posts.
    pub fn post_count(&self) -> usize {
        self.pages.iter().map(|p| p.posts.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_validity() {
        assert!(RectMm::new(0.0, 0.0, 10.0, 10.0).is_valid());
        assert!(RectMm::new(-10.0, -10.0, 1.0, 1.0).is_valid());
        assert!(!RectMm::new(-10.5, 0.0, 1.0, 1.0).is_valid());
        assert!(!RectMm::new(0.0, 0.0, 0.0, 1.0).is_valid());
        assert!(!RectMm::new(0.0, 0.0, 1.0, -1.0).is_valid());
    }

    #[test]
    fn test_media_kind_unknown_is_other() {
        let json = r#"{"type": "video", "bounds": {"top": 0, "left": 0, "width": 1, "height": 1}}"#;
        let media: MediaElement = serde_json::from_str(json).unwrap();
        assert_eq!(media.kind, MediaKind::Other);

        let json = r#"{"type": "image", "bounds": {"top": 0, "left": 0, "width": 1, "height": 1}}"#;
        let media: MediaElement = serde_json::from_str(json).unwrap();
        assert_eq!(media.kind, MediaKind::Image);
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"pages": [
            {"page_number": 2, "posts": []},
            {"page_number": 1, "posts": [
                {"telegram_id": 1, "channel_id": "c", "bounds": {"top": 0, "left": 20, "width": 100, "height": 30}}
            ]}
        ]}"#;
        let layout = FrozenLayout::from_json(json).unwrap();
        assert_eq!(layout.post_count(), 1);
        let order: Vec<_> = layout.sorted_pages().iter().map(|p| p.page_number).collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[test]
    fn test_from_json_rejects_page_zero() {
        let err = FrozenLayout::from_json(r#"{"pages": [{"page_number": 0}]}"#).unwrap_err();
        assert!(err.is_invalid_layout());
    }

    #[test]
    fn test_from_json_rejects_duplicate_pages() {
        let json = r#"{"pages": [{"page_number": 1}, {"page_number": 1}]}"#;
        assert!(FrozenLayout::from_json(json).unwrap_err().is_invalid_layout());
    }

    #[test]
    fn test_from_path_attaches_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        fs::write(&path, r#"{"pages": [{"page_number": 0}]}"#).unwrap();
        let err = FrozenLayout::from_path(&path).unwrap_err();
        assert!(err.to_string().contains("layout.json"));
    }
}
