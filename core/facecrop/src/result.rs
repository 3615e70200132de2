use image::RgbaImage;

use crate::error::FaceCropError;
use crate::face_detector::DetectedFace;

/// Outcome of one [`crate::FaceProcessor::process`] call.
///
/// Exactly one variant is produced per call. On `Success` every artifact is
/// present; the other variants carry no partial images.
#[must_use]
#[derive(Debug, Clone)]
pub enum ProcessingResult {
    /// A face was found, cropped, and annotated.
    Success {
        /// The image that was processed.
        original: RgbaImage,
        /// Every face the detector reported, in detector order.
        faces: Vec<DetectedFace>,
        /// The padded crop around the selected face.
        cropped_face: RgbaImage,
        /// `cropped_face` with contour points drawn on it.
        annotated: RgbaImage,
    },

    /// The detector found no faces.
    NoFaceDetected,

    /// Processing failed.
    Error {
        /// Human-readable cause.
        message: String,
    },
}

impl ProcessingResult {
    /// True for [`ProcessingResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingResult::Success { .. })
    }

    /// The annotated image, if processing succeeded.
    pub fn annotated(&self) -> Option<&RgbaImage> {
        match self {
            ProcessingResult::Success { annotated, .. } => Some(annotated),
            ProcessingResult::NoFaceDetected | ProcessingResult::Error { .. } => None,
        }
    }
}

impl From<FaceCropError> for ProcessingResult {
    fn from(err: FaceCropError) -> Self {
        ProcessingResult::Error {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_keep_their_message() {
        let result = ProcessingResult::from(FaceCropError::DetectorFailure("model offline".into()));
        match result {
            ProcessingResult::Error { message } => {
                assert_eq!(message, "face detection failed: model offline")
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn only_success_has_artifacts() {
        assert!(ProcessingResult::NoFaceDetected.annotated().is_none());
        assert!(!ProcessingResult::NoFaceDetected.is_success());

        let success = ProcessingResult::Success {
            original: RgbaImage::new(4, 4),
            faces: Vec::new(),
            cropped_face: RgbaImage::new(2, 2),
            annotated: RgbaImage::new(2, 2),
        };
        assert!(success.is_success());
        assert_eq!(success.annotated().map(RgbaImage::dimensions), Some((2, 2)));
    }
}
