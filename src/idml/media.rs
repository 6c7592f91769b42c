//! Image files: pixel dimensions and proportional placement.

use std::path::Path;

use super::geometry::Bounds;

/// Reads the pixel size of an image without decoding it.
///
/// Returns `None` for unreadable, unsupported or zero-sized images.
pub fn image_dimensions(path: &Path) -> Option<(u32, u32)> {
    match image::image_dimensions(path) {
        Ok((w, h)) if w > 0 && h > 0 => Some((w, h)),
        Ok(_) => {
            tracing::warn!(path = %path.display(), "image has zero size");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read image dimensions");
            None
        }
    }
}

/// Places an image of `dimensions` pixels at the left of `area`, starting at `top`.
///
/// The image takes the full area width; when that makes it taller than
/// `max_height`, it is scaled down to `max_height` keeping its aspect ratio.
pub fn fit_image_bounds(
    (width_px, height_px): (u32, u32),
    area: &Bounds,
    top: f64,
    max_height: Option<f64>,
) -> Bounds {
    let aspect = f64::from(width_px) / f64::from(height_px);
    let mut width = area.width();
    let mut height = width / aspect;

    if let Some(max) = max_height.filter(|max| height > *max) {
        height = max;
        width = height * aspect;
    }

    Bounds::from_size(top, area.left, width, height)
}
