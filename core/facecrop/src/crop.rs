use std::fmt;

use image::RgbaImage;

use crate::error::FaceCropError;
use crate::face_detector::BoundingBox;

/// Crop region within the source image, as half-open pixel edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    /// Left edge (pixels).
    pub left: u32,
    /// Top edge (pixels).
    pub top: u32,
    /// Right edge, exclusive (pixels).
    pub right: u32,
    /// Bottom edge, exclusive (pixels).
    pub bottom: u32,
}

impl CropRect {
    /// Horizontal extent in pixels.
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    /// Vertical extent in pixels.
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Number of pixels covered.
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// True when the rectangle covers no pixels.
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Top-left corner: the translation from source-image to cropped-image
    /// coordinates.
    pub fn offset(&self) -> (u32, u32) {
        (self.left, self.top)
    }
}

impl fmt::Display for CropRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Compute the padded crop rectangle for a face box on a `width` x `height`
/// image.
///
/// Each edge is clamped into the image, then pushed outward by
/// `floor(clamped_width * padding_percent)` and clamped again. The result
/// always satisfies `left <= right <= width` and `top <= bottom <= height`,
/// but may be empty; [`crop_to_rectangle`] rejects empty rectangles.
pub fn compute_crop_rectangle(
    width: u32,
    height: u32,
    bbox: &BoundingBox,
    padding_percent: f32,
) -> CropRect {
    let (w, h) = (width as i64, height as i64);

    let left = (bbox.left as i64).clamp(0, w);
    let top = (bbox.top as i64).clamp(0, h);
    // An inverted box collapses onto its left/top edge.
    let right = (bbox.right as i64).clamp(0, w).max(left);
    let bottom = (bbox.bottom as i64).clamp(0, h).max(top);

    let padding = if padding_percent.is_finite() && padding_percent > 0.0 {
        ((right - left) as f64 * padding_percent as f64).floor() as i64
    } else {
        0
    };

    let rect = CropRect {
        left: left.saturating_sub(padding).clamp(0, w) as u32,
        top: top.saturating_sub(padding).clamp(0, h) as u32,
        right: right.saturating_add(padding).clamp(0, w) as u32,
        bottom: bottom.saturating_add(padding).clamp(0, h) as u32,
    };
    tracing::debug!(%rect, padding, "computed crop rectangle");
    rect
}

/// Copy the pixels inside `rect` into a new image.
pub fn crop_to_rectangle(image: &RgbaImage, rect: CropRect) -> Result<RgbaImage, FaceCropError> {
    let (width, height) = image.dimensions();
    if rect.is_degenerate() || rect.right > width || rect.bottom > height {
        return Err(FaceCropError::CropFailure {
            rect,
            width,
            height,
        });
    }

    Ok(image::imageops::crop_imm(image, rect.left, rect.top, rect.width(), rect.height()).to_image())
}
