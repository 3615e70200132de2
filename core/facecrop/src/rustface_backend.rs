use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use image::RgbaImage;

use crate::error::FaceCropError;
use crate::face_detector::{BoundingBox, DetectedFace, FaceDetector};

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// Reports bounding boxes and scores only. SeetaFace has no landmark
/// stage, so faces carry no contours.
pub struct RustfaceDetector {
    model: rustface::Model,
    min_face_size: u32,
    score_thresh: f64,
}

impl RustfaceDetector {
    /// Load a SeetaFace model file (e.g. `seeta_fd_frontal_v1.0.bin`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FaceCropError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| FaceCropError::ModelLoad(format!("{}: {e}", path.display())))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a SeetaFace model from any reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, FaceCropError> {
        let model =
            rustface::read_model(reader).map_err(|e| FaceCropError::ModelLoad(e.to_string()))?;
        Ok(Self {
            model,
            min_face_size: 20,
            score_thresh: 2.0,
        })
    }

    /// Smallest face edge, in pixels, the detector searches for (default: 20).
    pub fn min_face_size(mut self, size: u32) -> Self {
        self.min_face_size = size;
        self
    }

    /// Minimum detection score (default: 2.0).
    pub fn score_thresh(mut self, thresh: f64) -> Self {
        self.score_thresh = thresh;
        self
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, image: &RgbaImage) -> Result<Vec<DetectedFace>, FaceCropError> {
        let gray = image::imageops::grayscale(image);
        let (width, height) = gray.dimensions();

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.min_face_size);
        detector.set_score_thresh(self.score_thresh);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));
        tracing::debug!(count = faces.len(), "rustface detection finished");

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                let left = bbox.x();
                let top = bbox.y();
                DetectedFace::new(BoundingBox::new(
                    left,
                    top,
                    left.saturating_add(bbox.width() as i32),
                    top.saturating_add(bbox.height() as i32),
                ))
                .with_confidence(face.score() as f32)
            })
            .collect())
    }
}
