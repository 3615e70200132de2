use image::{Rgba, RgbaImage};

use crate::annotate::annotate_contours;
use crate::crop::{compute_crop_rectangle, crop_to_rectangle, CropRect};
use crate::error::FaceCropError;
use crate::face_detector::{ContourType, DetectedFace, FaceDetector};
use crate::result::ProcessingResult;
use crate::FaceSelection;

/// Resolved settings for one processing run.
pub(crate) struct PipelineSettings<'a> {
    pub padding_percent: f32,
    pub point_radius: f32,
    pub color: Rgba<u8>,
    pub selection: FaceSelection,
    pub contours: &'a [ContourType],
}

/// Pick the face to crop from the detector's output.
pub(crate) fn select_face(faces: &[DetectedFace], selection: FaceSelection) -> Option<&DetectedFace> {
    let mut best = faces.first()?;
    match selection {
        FaceSelection::First => {}
        FaceSelection::Largest => {
            for face in &faces[1..] {
                if face.bounding_box.area() > best.bounding_box.area() {
                    best = face;
                }
            }
        }
        FaceSelection::HighestConfidence => {
            for face in &faces[1..] {
                let better = match (face.confidence, best.confidence) {
                    (Some(candidate), Some(current)) => candidate > current,
                    (Some(_), None) => true,
                    _ => false,
                };
                if better {
                    best = face;
                }
            }
        }
    }
    Some(best)
}

/// Crop `face` out of `image` with padding. Returns the rectangle used so
/// contour points can be translated into the crop.
pub(crate) fn crop_face(
    image: &RgbaImage,
    face: &DetectedFace,
    padding_percent: f32,
) -> Result<(CropRect, RgbaImage), FaceCropError> {
    validate_padding(padding_percent)?;
    let rect = compute_crop_rectangle(image.width(), image.height(), &face.bounding_box, padding_percent);
    let cropped = crop_to_rectangle(image, rect)?;
    Ok((rect, cropped))
}

fn validate_padding(padding_percent: f32) -> Result<(), FaceCropError> {
    if !padding_percent.is_finite() || padding_percent < 0.0 {
        return Err(FaceCropError::InvalidPadding(padding_percent));
    }
    Ok(())
}

/// Full pipeline: detect → select → crop → annotate.
pub(crate) fn process_pipeline(
    image: &RgbaImage,
    detector: &dyn FaceDetector,
    settings: &PipelineSettings<'_>,
) -> ProcessingResult {
    match run(image, detector, settings) {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(error = %err, "face processing failed");
            err.into()
        }
    }
}

fn run(
    image: &RgbaImage,
    detector: &dyn FaceDetector,
    settings: &PipelineSettings<'_>,
) -> Result<ProcessingResult, FaceCropError> {
    validate_padding(settings.padding_percent)?;
    if !settings.point_radius.is_finite() || settings.point_radius < 0.0 {
        return Err(FaceCropError::InvalidPointRadius(settings.point_radius));
    }

    let faces = detector.detect(image)?;
    let Some(face) = select_face(&faces, settings.selection) else {
        tracing::info!("no face detected");
        return Ok(ProcessingResult::NoFaceDetected);
    };
    if image.width() == 0 || image.height() == 0 {
        return Err(FaceCropError::ZeroDimensions);
    }

    let (rect, cropped_face) = crop_face(image, face, settings.padding_percent)?;
    let (offset_x, offset_y) = rect.offset();
    let annotated = annotate_contours(
        &cropped_face,
        face,
        settings.contours,
        offset_x,
        offset_y,
        settings.point_radius,
        settings.color,
    );

    tracing::info!(
        faces = faces.len(),
        width = cropped_face.width(),
        height = cropped_face.height(),
        "face processed"
    );
    Ok(ProcessingResult::Success {
        original: image.clone(),
        faces,
        cropped_face,
        annotated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face_detector::BoundingBox;

    fn face(left: i32, top: i32, right: i32, bottom: i32) -> DetectedFace {
        DetectedFace::new(BoundingBox::new(left, top, right, bottom))
    }

    #[test]
    fn empty_detection_selects_nothing() {
        for selection in [
            FaceSelection::First,
            FaceSelection::Largest,
            FaceSelection::HighestConfidence,
        ] {
            assert!(select_face(&[], selection).is_none());
        }
    }

    #[test]
    fn first_keeps_detector_order() {
        let faces = [face(0, 0, 10, 10), face(0, 0, 50, 50)];
        let picked = select_face(&faces, FaceSelection::First).unwrap();
        assert_eq!(picked.bounding_box.right, 10);
    }

    #[test]
    fn largest_prefers_area_and_first_on_ties() {
        let faces = [face(0, 0, 10, 10), face(0, 0, 40, 40), face(5, 5, 45, 45)];
        let picked = select_face(&faces, FaceSelection::Largest).unwrap();
        assert_eq!(picked.bounding_box, BoundingBox::new(0, 0, 40, 40));
    }

    #[test]
    fn highest_confidence_ranks_unscored_faces_last() {
        let faces = [
            face(0, 0, 10, 10),
            face(0, 0, 20, 20).with_confidence(0.4),
            face(0, 0, 30, 30).with_confidence(0.9),
        ];
        let picked = select_face(&faces, FaceSelection::HighestConfidence).unwrap();
        assert_eq!(picked.confidence, Some(0.9));
    }

    #[test]
    fn highest_confidence_without_scores_falls_back_to_first() {
        let faces = [face(0, 0, 10, 10), face(0, 0, 30, 30)];
        let picked = select_face(&faces, FaceSelection::HighestConfidence).unwrap();
        assert_eq!(picked.bounding_box.right, 10);
    }

    #[test]
    fn crop_face_rejects_negative_padding() {
        let image = RgbaImage::new(10, 10);
        let err = crop_face(&image, &face(0, 0, 5, 5), -0.1).unwrap_err();
        assert!(matches!(err, FaceCropError::InvalidPadding(_)));
    }
}
