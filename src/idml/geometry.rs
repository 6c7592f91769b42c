//! Point-space geometry of pages, spreads and frames.
//!
//! IDML places every page item with an `ItemTransform` that moves the item's
//! own origin to its centre. Pages hang from the vertical centre of their
//! spread; left pages sit one page width to the left of the binding.
//!
//! All values are in points.

use std::fmt;

/// Vertical gap between stacked spreads.
pub const SPREAD_GAP_PT: f64 = 36.0;

/// Formats a number with at most four decimals and no trailing zeros.
///
/// ```
/// use tgpress::idml::geometry::fmt_num;
///
/// assert_eq!(fmt_num(12.0), "12");
/// assert_eq!(fmt_num(-420.94526), "-420.9453");
/// assert_eq!(fmt_num(0.1 + 0.2), "0.3");
/// assert_eq!(fmt_num(-0.00001), "0");
/// ```
pub fn fmt_num(value: f64) -> String {
    let s = format!("{value:.4}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// An axis-aligned rectangle in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Bounds {
    /// Creates bounds from edges.
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Creates bounds from a top-left corner and a size.
    pub fn from_size(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self::new(top, left, top + height, left + width)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Returns a copy with the top edge moved down by `dy`, never past the bottom.
    #[must_use]
    pub fn shrink_top(&self, dy: f64) -> Self {
        Self {
            top: (self.top + dy).min(self.bottom),
            ..*self
        }
    }

    /// `GeometricBounds` attribute value: `top left bottom right`.
    pub fn to_idml(&self) -> String {
        format!(
            "{} {} {} {}",
            fmt_num(self.top),
            fmt_num(self.left),
            fmt_num(self.bottom),
            fmt_num(self.right)
        )
    }

    /// Corner points relative to the centre, clockwise from top-left.
    pub fn path_points(&self) -> [(f64, f64); 4] {
        let hw = self.width() / 2.0;
        let hh = self.height() / 2.0;
        [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
    }
}

/// Bezier handle length for a quarter circle, relative to the radius.
const KAPPA: f64 = 0.552_284_749_8;

/// A path anchor with its two direction handles, relative to the frame centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub anchor: (f64, f64),
    pub left: (f64, f64),
    pub right: (f64, f64),
}

impl PathPoint {
    /// A corner point: both handles sit on the anchor.
    pub const fn corner(x: f64, y: f64) -> Self {
        Self {
            anchor: (x, y),
            left: (x, y),
            right: (x, y),
        }
    }
}

/// Rectangle path through the four corners.
pub fn rect_path(bounds: &Bounds) -> [PathPoint; 4] {
    bounds.path_points().map(|(x, y)| PathPoint::corner(x, y))
}

/// Ellipse inscribed in `bounds`, clockwise from the top.
pub fn ellipse_path(bounds: &Bounds) -> [PathPoint; 4] {
    let rx = bounds.width() / 2.0;
    let ry = bounds.height() / 2.0;
    let kx = KAPPA * rx;
    let ky = KAPPA * ry;
    [
        PathPoint {
            anchor: (0.0, -ry),
            left: (-kx, -ry),
            right: (kx, -ry),
        },
        PathPoint {
            anchor: (rx, 0.0),
            left: (rx, -ky),
            right: (rx, ky),
        },
        PathPoint {
            anchor: (0.0, ry),
            left: (kx, ry),
            right: (-kx, ry),
        },
        PathPoint {
            anchor: (-rx, 0.0),
            left: (-rx, ky),
            right: (-rx, -ky),
        },
    ]
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Margins {
    /// Builds margins from a `[top, left, bottom, right]` array.
    pub fn from_array([top, left, bottom, right]: [f64; 4]) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// The text area of a `width` x `height` page.
    pub fn content_box(&self, width: f64, height: f64) -> Bounds {
        Bounds::new(self.top, self.left, height - self.bottom, width - self.right)
    }
}

/// A 2x3 affine transform, serialized as `a b c d tx ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Transform {
    pub const IDENTITY: Self = Self::translate(0.0, 0.0);

    /// A pure translation.
    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            tx,
            ty,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            fmt_num(self.a),
            fmt_num(self.b),
            fmt_num(self.c),
            fmt_num(self.d),
            fmt_num(self.tx),
            fmt_num(self.ty)
        )
    }
}

/// Which side of the binding a page sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSide {
    Left,
    Right,
}

impl PageSide {
    /// Page 1 and odd pages are right pages; even pages are left pages.
    pub fn of(page_number: usize) -> Self {
        if page_number > 1 && page_number % 2 == 0 {
            PageSide::Left
        } else {
            PageSide::Right
        }
    }
}

/// Page placement within its spread.
pub fn page_transform(side: PageSide, page_width: f64, page_height: f64) -> Transform {
    match side {
        PageSide::Right => Transform::translate(0.0, -page_height / 2.0),
        PageSide::Left => Transform::translate(-page_width, -page_height / 2.0),
    }
}

/// Spread placement in document space; spreads stack downwards without overlap.
pub fn spread_transform(spread_index: usize, page_height: f64) -> Transform {
    Transform::translate(0.0, spread_index as f64 * (page_height + SPREAD_GAP_PT))
}

/// Frame placement: translation to the frame centre in spread coordinates.
pub fn frame_transform(
    bounds: &Bounds,
    page_number: usize,
    page_width: f64,
    page_height: f64,
) -> Transform {
    let mut cx = (bounds.left + bounds.right) / 2.0;
    let cy = (bounds.top + bounds.bottom) / 2.0 - page_height / 2.0;
    if PageSide::of(page_number) == PageSide::Left {
        cx -= page_width;
    }
    Transform::translate(cx, cy)
}
