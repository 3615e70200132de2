//! Face cropping: find a face, crop it with padding, and mark its eye contours.
//!
//! Detection is delegated to a [`FaceDetector`]; this crate owns the geometry
//! that turns a detected face into a padded, bounds-safe crop and an
//! annotated copy of it.
//!
//! # Example
//!
//! ```no_run
//! use facecrop::{BoundingBox, DetectedFace, FaceCropError, FaceProcessor, ProcessingResult};
//! use image::RgbaImage;
//!
//! fn detect(_: &RgbaImage) -> Result<Vec<DetectedFace>, FaceCropError> {
//!     Ok(vec![DetectedFace::new(BoundingBox::new(100, 100, 300, 300))])
//! }
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! match FaceProcessor::new(Box::new(detect)).process_bytes(&bytes) {
//!     ProcessingResult::Success { annotated, .. } => annotated.save("face.png").unwrap(),
//!     ProcessingResult::NoFaceDetected => println!("no face"),
//!     ProcessingResult::Error { message } => eprintln!("{message}"),
//! }
//! ```
#![warn(missing_docs)]

mod annotate;
mod codec;
mod crop;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
mod pipeline;
mod result;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;
/// Filesystem history of processed faces.
pub mod storage;

use image::{Rgba, RgbaImage};

/// Contour drawing helpers.
pub use annotate::{annotate_contours, annotate_eye_contours, EYE_CONTOURS};
/// Crop geometry.
pub use crop::{compute_crop_rectangle, crop_to_rectangle, CropRect};
/// Error type returned by facecrop operations.
pub use error::FaceCropError;
/// Face detection trait and face data types.
pub use face_detector::{BoundingBox, ContourPoint, ContourType, DetectedFace, FaceDetector};
/// Outcome of a processing run.
pub use result::ProcessingResult;
#[cfg(feature = "rustface")]
/// Built-in detector that loads a SeetaFace model.
pub use rustface_backend::RustfaceDetector;
/// Filesystem-backed image history.
pub use storage::{FaceStore, SavedImage};

/// Default padding around the face, as a fraction of the face box width.
pub const DEFAULT_PADDING_PERCENT: f32 = 0.2;

/// Default radius of contour points in pixels.
pub const DEFAULT_POINT_RADIUS: f32 = 2.0;

/// Default contour point color.
pub const DEFAULT_CONTOUR_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

/// Which detected face to crop when the detector reports several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FaceSelection {
    /// The first face in detector order.
    #[default]
    First,

    /// The face with the largest bounding box. Ties go to the earlier face.
    Largest,

    /// The face with the highest detector confidence. Faces without a score
    /// rank last; if none has one, the first face is used.
    HighestConfidence,
}

/// Builder for detecting, cropping, and annotating faces.
///
/// Holds no per-call state, so a single processor can be shared across
/// threads and used for any number of images.
pub struct FaceProcessor {
    detector: Box<dyn FaceDetector>,
    padding_percent: f32,
    point_radius: f32,
    contour_color: Rgba<u8>,
    selection: FaceSelection,
    contours: Vec<ContourType>,
}

impl FaceProcessor {
    /// Create a processor around `detector` with default settings.
    pub fn new(detector: Box<dyn FaceDetector>) -> Self {
        Self {
            detector,
            padding_percent: DEFAULT_PADDING_PERCENT,
            point_radius: DEFAULT_POINT_RADIUS,
            contour_color: DEFAULT_CONTOUR_COLOR,
            selection: FaceSelection::default(),
            contours: EYE_CONTOURS.to_vec(),
        }
    }

    /// Set the padding fraction added on every side of the face (default: 0.2).
    ///
    /// The padding in pixels is `floor(face_width * padding_percent)`, where
    /// `face_width` is measured after clamping the face box to the image.
    /// Must be finite and non-negative.
    pub fn padding_percent(mut self, padding_percent: f32) -> Self {
        self.padding_percent = padding_percent;
        self
    }

    /// Set the radius of drawn contour points (default: 2.0).
    ///
    /// Points are drawn on the pixel grid, so the radius is rounded to the
    /// nearest whole pixel (2.5 draws as 3). Radii larger than the crop's
    /// width plus height draw the same as that bound. Must be finite and
    /// non-negative.
    pub fn point_radius(mut self, radius: f32) -> Self {
        self.point_radius = radius;
        self
    }

    /// Set the color of drawn contour points (default: opaque red).
    pub fn contour_color(mut self, color: Rgba<u8>) -> Self {
        self.contour_color = color;
        self
    }

    /// Set how the face to crop is chosen (default: [`FaceSelection::First`]).
    pub fn selection(mut self, selection: FaceSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Set which contours are drawn (default: left and right eye).
    pub fn contours(mut self, contours: &[ContourType]) -> Self {
        self.contours = contours.to_vec();
        self
    }

    /// Run the detector on `image`.
    pub fn detect_faces(&self, image: &RgbaImage) -> Result<Vec<DetectedFace>, FaceCropError> {
        self.detector.detect(image)
    }

    /// Pick a face from `faces` according to the selection policy.
    pub fn select_face<'a>(&self, faces: &'a [DetectedFace]) -> Option<&'a DetectedFace> {
        pipeline::select_face(faces, self.selection)
    }

    /// Crop `face` out of `image` with the configured padding.
    ///
    /// Returns the crop rectangle alongside the cropped image; its top-left
    /// corner is the offset between the two coordinate spaces.
    pub fn crop_face(
        &self,
        image: &RgbaImage,
        face: &DetectedFace,
    ) -> Result<(CropRect, RgbaImage), FaceCropError> {
        pipeline::crop_face(image, face, self.padding_percent)
    }

    /// Detect, crop, and annotate the selected face in `image`.
    ///
    /// Never panics on bad input and never returns partial artifacts: every
    /// failure is reported as [`ProcessingResult::Error`].
    pub fn process(&self, image: &RgbaImage) -> ProcessingResult {
        let settings = pipeline::PipelineSettings {
            padding_percent: self.padding_percent,
            point_radius: self.point_radius,
            color: self.contour_color,
            selection: self.selection,
            contours: &self.contours,
        };
        pipeline::process_pipeline(image, self.detector.as_ref(), &settings)
    }

    /// Decode raw image bytes (JPEG, PNG, or WebP) and [`process`](Self::process) them.
    pub fn process_bytes(&self, input: &[u8]) -> ProcessingResult {
        match codec::decode_image(input) {
            Ok(image) => self.process(&image),
            Err(err) => err.into(),
        }
    }
}
