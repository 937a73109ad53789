//! Edge significance map.
//!
//! The classifier only needs a boolean per pixel: is there a significant
//! intensity discontinuity here? The reference detector is Canny with
//! hysteresis linking over a grayscale projection; any detector honoring
//! that contract could be substituted.

use image::{GrayImage, RgbImage};
use imageproc::edges::canny;

/// Per-pixel edge significance, congruent to the source image.
///
/// Built once per image and read-only thereafter.
#[derive(Debug, Clone)]
pub struct EdgeMap {
    inner: GrayImage,
}

impl EdgeMap {
    /// Map width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Map height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Whether the cell at `(x, y)` is marked edge-significant.
    #[must_use]
    pub fn is_edge(&self, x: u32, y: u32) -> bool {
        self.inner.get_pixel(x, y)[0] != 0
    }

    /// Wrap a raw single-channel map (nonzero = edge).
    ///
    /// Useful for substituting a custom detector or fixed maps in tests.
    #[must_use]
    pub fn from_gray(inner: GrayImage) -> Self {
        Self { inner }
    }
}

/// Detect edges in an image with Canny hysteresis thresholds.
///
/// The image is projected to grayscale first; the returned map marks a cell
/// wherever the detector judged a significant discontinuity present.
/// Thresholds follow the usual Canny convention: gradient magnitudes above
/// `high` seed edges, magnitudes between `low` and `high` extend them.
#[must_use]
pub fn detect_edges(image: &RgbImage, low: f32, high: f32) -> EdgeMap {
    if image.width() == 0 || image.height() == 0 {
        return EdgeMap {
            inner: GrayImage::new(image.width(), image.height()),
        };
    }
    let gray = image::imageops::grayscale(image);
    EdgeMap {
        inner: canny(&gray, low, high),
    }
}
