//! Configuration types for pagination and IDML export.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`PrintSettings`] - per-channel print options (page size name, margins,
//!   chunk sizing). Stored on the channel; missing fields fall back to defaults.
//! - [`LayoutConfig`] - the named page-size table and unit conversion
//!   constants. Loaded from external configuration; [`LayoutConfig::default`]
//!   carries the common sizes.
//! - [`ExportOptions`] - everything a whole-layout export needs besides the data.
//!
//! # Example
//!
//! ```rust
//! use tgpress::config::{LayoutConfig, PrintSettings};
//!
//! let settings = PrintSettings::new()
//!     .with_page_size("A5")
//!     .with_items_per_chunk(30);
//!
//! let layout = LayoutConfig::default();
//! let a5 = layout.page_size(&settings.page_size).unwrap();
//! assert_eq!(a5.width_mm, 148.0);
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PressError, Result};

/// Millimetres per inch.
const MM_PER_INCH: f64 = 25.4;

/// Print options for one channel.
///
/// Margins and gutter are expressed in millimetres; the document builder
/// converts them to points once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintSettings {
    /// Page size name, looked up in [`LayoutConfig::page_sizes`] (default: `A4`)
    pub page_size: String,

    /// Margins in mm: top, left, bottom, right (default: 20 mm each)
    pub margins_mm: [f64; 4],

    /// Gap between text columns in mm (default: 5 mm)
    pub column_gutter_mm: f64,

    /// Target weight of one chunk (default: 50)
    pub items_per_chunk: usize,

    /// Allowed overflow above the target, as a fraction (default: 0.2)
    pub overflow_threshold: f64,

    /// Prefix post bodies with a formatted date line (default: true)
    pub show_post_dates: bool,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            page_size: "A4".to_string(),
            margins_mm: [20.0, 20.0, 20.0, 20.0],
            column_gutter_mm: 5.0,
            items_per_chunk: 50,
            overflow_threshold: 0.2,
            show_post_dates: true,
        }
    }
}

impl PrintSettings {
    /// Creates settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size name.
    #[must_use]
    pub fn with_page_size(mut self, name: impl Into<String>) -> Self {
        self.page_size = name.into();
        self
    }

    /// Sets the margins in mm (top, left, bottom, right).
    #[must_use]
    pub fn with_margins_mm(mut self, margins: [f64; 4]) -> Self {
        self.margins_mm = margins;
        self
    }

    /// Sets the target chunk weight.
    #[must_use]
    pub fn with_items_per_chunk(mut self, items: usize) -> Self {
        self.items_per_chunk = items;
        self
    }

    /// Sets the overflow tolerance.
    #[must_use]
    pub fn with_overflow_threshold(mut self, threshold: f64) -> Self {
        self.overflow_threshold = threshold;
        self
    }

    /// Enables or disables the date line above post bodies.
    #[must_use]
    pub fn with_post_dates(mut self, enabled: bool) -> Self {
        self.show_post_dates = enabled;
        self
    }

    /// Top margin in mm.
    pub fn margin_top_mm(&self) -> f64 {
        self.margins_mm[0]
    }
}

/// Physical page dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Page width in mm
    pub width_mm: f64,
    /// Page height in mm
    pub height_mm: f64,
}

impl PageSize {
    /// Creates a page size from millimetres.
    pub const fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }
}

/// Unit conversion constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Units {
    /// Points per millimetre (default: 2.83465)
    pub pt_per_mm: f64,

    /// CSS pixels per millimetre (default: 96 dpi, i.e. 3.7795)
    pub px_per_mm: f64,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            pt_per_mm: 2.83465,
            px_per_mm: 96.0 / MM_PER_INCH,
        }
    }
}

impl Units {
    /// Converts millimetres to points.
    pub fn mm_to_pt(&self, mm: f64) -> f64 {
        mm * self.pt_per_mm
    }

    /// Converts points to millimetres.
    pub fn pt_to_mm(&self, pt: f64) -> f64 {
        pt / self.pt_per_mm
    }

    /// Points per CSS pixel.
    pub fn pt_per_px(&self) -> f64 {
        self.pt_per_mm / self.px_per_mm
    }

    /// Converts CSS pixels to points.
    pub fn px_to_pt(&self, px: f64) -> f64 {
        px * self.pt_per_px()
    }
}

/// Page-size table and unit constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Named page sizes in mm
    pub page_sizes: BTreeMap<String, PageSize>,

    /// Unit conversion constants
    pub units: Units,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let mut page_sizes = BTreeMap::new();
        page_sizes.insert("A4".to_string(), PageSize::new(210.0, 297.0));
        page_sizes.insert("A5".to_string(), PageSize::new(148.0, 210.0));
        page_sizes.insert("US_LETTER".to_string(), PageSize::new(215.9, 279.4));
        Self {
            page_sizes,
            units: Units::default(),
        }
    }
}

impl LayoutConfig {
    /// Loads a layout config from a JSON file.
    ///
    /// Keys missing from the file keep their defaults; a `page_sizes` object
    /// replaces the default table entirely.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Looks up a page size by name.
    pub fn page_size(&self, name: &str) -> Result<PageSize> {
        self.page_sizes
            .get(name)
            .copied()
            .ok_or_else(|| PressError::UnknownPageSize {
                name: name.to_string(),
                known: self
                    .page_sizes
                    .keys()
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Options for a whole frozen-layout export.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Directory that media and avatar paths are relative to
    pub media_root: PathBuf,

    /// Page sizes and units
    pub layout: LayoutConfig,
}

impl ExportOptions {
    /// Creates options with the current directory as media root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the media root.
    #[must_use]
    pub fn with_media_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.media_root = root.into();
        self
    }

    /// Sets the layout config.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }
}
