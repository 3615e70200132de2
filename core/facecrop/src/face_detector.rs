use std::collections::BTreeMap;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::FaceCropError;

/// Axis-aligned face rectangle in the pixel space of the image it was
/// detected on.
///
/// Detectors may report edges outside the image or with `left > right`;
/// consumers clamp before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge (pixels).
    pub left: i32,
    /// Top edge (pixels).
    pub top: i32,
    /// Right edge, exclusive (pixels).
    pub right: i32,
    /// Bottom edge, exclusive (pixels).
    pub bottom: i32,
}

impl BoundingBox {
    /// Create a box from its four edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal extent. Negative for an inverted box.
    pub fn width(&self) -> i64 {
        self.right as i64 - self.left as i64
    }

    /// Vertical extent. Negative for an inverted box.
    pub fn height(&self) -> i64 {
        self.bottom as i64 - self.top as i64
    }

    /// Area of the box, zero when either extent is not positive.
    pub fn area(&self) -> i64 {
        self.width().max(0) * self.height().max(0)
    }
}

/// A contour point in the coordinate space of the original, uncropped image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourPoint {
    /// X coordinate (pixels).
    pub x: f32,
    /// Y coordinate (pixels).
    pub y: f32,
}

impl ContourPoint {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Named facial contours a detector may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourType {
    /// Outline of the face.
    Face,
    /// Top edge of the left eyebrow.
    LeftEyebrowTop,
    /// Bottom edge of the left eyebrow.
    LeftEyebrowBottom,
    /// Top edge of the right eyebrow.
    RightEyebrowTop,
    /// Bottom edge of the right eyebrow.
    RightEyebrowBottom,
    /// Outline of the left eye.
    LeftEye,
    /// Outline of the right eye.
    RightEye,
    /// Top edge of the upper lip.
    UpperLipTop,
    /// Bottom edge of the upper lip.
    UpperLipBottom,
    /// Top edge of the lower lip.
    LowerLipTop,
    /// Bottom edge of the lower lip.
    LowerLipBottom,
    /// Nose bridge.
    NoseBridge,
    /// Bottom of the nose.
    NoseBottom,
    /// Center of the left cheek.
    LeftCheek,
    /// Center of the right cheek.
    RightCheek,
}

impl ContourType {
    /// The snake_case name used in serialized detector output.
    pub fn name(&self) -> &'static str {
        match self {
            ContourType::Face => "face",
            ContourType::LeftEyebrowTop => "left_eyebrow_top",
            ContourType::LeftEyebrowBottom => "left_eyebrow_bottom",
            ContourType::RightEyebrowTop => "right_eyebrow_top",
            ContourType::RightEyebrowBottom => "right_eyebrow_bottom",
            ContourType::LeftEye => "left_eye",
            ContourType::RightEye => "right_eye",
            ContourType::UpperLipTop => "upper_lip_top",
            ContourType::UpperLipBottom => "upper_lip_bottom",
            ContourType::LowerLipTop => "lower_lip_top",
            ContourType::LowerLipBottom => "lower_lip_bottom",
            ContourType::NoseBridge => "nose_bridge",
            ContourType::NoseBottom => "nose_bottom",
            ContourType::LeftCheek => "left_cheek",
            ContourType::RightCheek => "right_cheek",
        }
    }
}

/// One face reported by a [`FaceDetector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    /// Face rectangle in original-image pixels.
    pub bounding_box: BoundingBox,
    /// Ordered contour points keyed by contour name.
    #[serde(default)]
    pub contours: BTreeMap<ContourType, Vec<ContourPoint>>,
    /// Detector score, when the backend reports one.
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl DetectedFace {
    /// A face with a bounding box and no contours.
    pub fn new(bounding_box: BoundingBox) -> Self {
        Self {
            bounding_box,
            contours: BTreeMap::new(),
            confidence: None,
        }
    }

    /// Attach the points of one contour, replacing any previous points for it.
    pub fn with_contour(mut self, kind: ContourType, points: Vec<ContourPoint>) -> Self {
        self.contours.insert(kind, points);
        self
    }

    /// Attach a detector score.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Points of the named contour, if the detector reported it.
    pub fn contour(&self, kind: ContourType) -> Option<&[ContourPoint]> {
        self.contours.get(&kind).map(Vec::as_slice)
    }
}

/// Pluggable face detection backend.
///
/// Implement this trait to plug an on-device model, a remote service, or a
/// fixed set of synthetic faces into [`crate::FaceProcessor`]. Faces are
/// returned in the backend's own order.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in `image`. Backend failures are reported as
    /// [`FaceCropError::DetectorFailure`].
    fn detect(&self, image: &RgbaImage) -> Result<Vec<DetectedFace>, FaceCropError>;
}

impl<F> FaceDetector for F
where
    F: Fn(&RgbaImage) -> Result<Vec<DetectedFace>, FaceCropError> + Send + Sync,
{
    fn detect(&self, image: &RgbaImage) -> Result<Vec<DetectedFace>, FaceCropError> {
        self(image)
    }
}
