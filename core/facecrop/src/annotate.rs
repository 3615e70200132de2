use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;

use crate::face_detector::{ContourPoint, ContourType, DetectedFace};

/// Contours drawn by [`annotate_eye_contours`].
pub const EYE_CONTOURS: [ContourType; 2] = [ContourType::LeftEye, ContourType::RightEye];

/// Draw the left and right eye contour points of `face` onto a copy of
/// `cropped`.
///
/// Contour points are in original-image coordinates; `(offset_x, offset_y)`
/// is the top-left corner of the crop that produced `cropped`. Points that
/// land outside the cropped image are clipped. Contours the detector did
/// not report are skipped.
pub fn annotate_eye_contours(
    cropped: &RgbaImage,
    face: &DetectedFace,
    offset_x: u32,
    offset_y: u32,
    point_radius: f32,
    color: Rgba<u8>,
) -> RgbaImage {
    annotate_contours(
        cropped,
        face,
        &EYE_CONTOURS,
        offset_x,
        offset_y,
        point_radius,
        color,
    )
}

/// Draw the points of each contour in `kinds` onto a copy of `cropped`.
pub fn annotate_contours(
    cropped: &RgbaImage,
    face: &DetectedFace,
    kinds: &[ContourType],
    offset_x: u32,
    offset_y: u32,
    point_radius: f32,
    color: Rgba<u8>,
) -> RgbaImage {
    let mut annotated = cropped.clone();
    // A circle wider than the canvas covers no more of it, so cap the radius
    // before it reaches integer drawing math.
    let max_radius = cropped.width() as f32 + cropped.height() as f32;
    let radius = point_radius.max(0.0).min(max_radius).round() as i32;

    for kind in kinds {
        let Some(points) = face.contour(*kind) else {
            tracing::debug!(contour = kind.name(), "contour not reported, skipping");
            continue;
        };
        for point in points {
            draw_point(&mut annotated, point, offset_x, offset_y, radius, color);
        }
    }

    annotated
}

fn draw_point(
    canvas: &mut RgbaImage,
    point: &ContourPoint,
    offset_x: u32,
    offset_y: u32,
    radius: i32,
    color: Rgba<u8>,
) {
    let x = point.x - offset_x as f32;
    let y = point.y - offset_y as f32;
    if !x.is_finite() || !y.is_finite() {
        return;
    }

    // A circle entirely off the canvas draws nothing; skip it before the
    // float-to-int conversion can saturate.
    let reach = radius as f32 + 1.0;
    let (width, height) = (canvas.width() as f32, canvas.height() as f32);
    if x < -reach || y < -reach || x > width + reach || y > height + reach {
        return;
    }

    draw_filled_circle_mut(canvas, (x.round() as i32, y.round() as i32), radius, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face_detector::BoundingBox;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GRAY: Rgba<u8> = Rgba([90, 90, 90, 255]);

    fn gray_image(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, GRAY)
    }

    fn face_with_eyes(left: Vec<ContourPoint>, right: Vec<ContourPoint>) -> DetectedFace {
        DetectedFace::new(BoundingBox::new(0, 0, 100, 100))
            .with_contour(ContourType::LeftEye, left)
            .with_contour(ContourType::RightEye, right)
    }

    #[test]
    fn points_are_translated_by_crop_offset() {
        let cropped = gray_image(40, 40);
        let face = face_with_eyes(
            vec![ContourPoint::new(70.0, 65.0)],
            vec![ContourPoint::new(85.0, 65.0)],
        );
        let annotated = annotate_eye_contours(&cropped, &face, 60, 60, 2.0, RED);

        assert_eq!(annotated.get_pixel(10, 5), &RED);
        assert_eq!(annotated.get_pixel(25, 5), &RED);
        assert_eq!(annotated.get_pixel(30, 30), &GRAY);
    }

    #[test]
    fn input_image_is_not_mutated() {
        let cropped = gray_image(20, 20);
        let before = cropped.clone();
        let face = face_with_eyes(
            vec![ContourPoint::new(5.0, 5.0)],
            vec![ContourPoint::new(15.0, 5.0)],
        );
        let annotated = annotate_eye_contours(&cropped, &face, 0, 0, 2.0, RED);

        assert_eq!(cropped.as_raw(), before.as_raw());
        assert_ne!(annotated.as_raw(), before.as_raw());
    }

    #[test]
    fn missing_contours_draw_nothing() {
        let cropped = gray_image(20, 20);
        let face = DetectedFace::new(BoundingBox::new(0, 0, 20, 20))
            .with_contour(ContourType::NoseBridge, vec![ContourPoint::new(10.0, 10.0)]);
        let annotated = annotate_eye_contours(&cropped, &face, 0, 0, 2.0, RED);
        assert_eq!(annotated.as_raw(), cropped.as_raw());
    }

    #[test]
    fn points_outside_the_crop_are_clipped() {
        let cropped = gray_image(20, 20);
        let face = face_with_eyes(
            vec![
                ContourPoint::new(-1.0e9, 5.0),
                ContourPoint::new(f32::NAN, 5.0),
                ContourPoint::new(21.0, 10.0),
            ],
            vec![ContourPoint::new(1.0e9, 1.0e9)],
        );
        let annotated = annotate_eye_contours(&cropped, &face, 0, 0, 2.0, RED);

        assert_eq!(annotated.dimensions(), (20, 20));
        // The circle at x = 21 reaches back into the last column
        assert_eq!(annotated.get_pixel(19, 10), &RED);
        assert_eq!(annotated.get_pixel(5, 5), &GRAY);
    }

    #[test]
    fn huge_radius_floods_the_canvas() {
        let cropped = gray_image(64, 64);
        let face = face_with_eyes(vec![ContourPoint::new(10.0, 10.0)], Vec::new());
        let annotated = annotate_eye_contours(&cropped, &face, 0, 0, 3.0e9, RED);
        assert_eq!(annotated.get_pixel(0, 0), &RED);
        assert_eq!(annotated.get_pixel(63, 63), &RED);
    }

    #[test]
    fn other_contours_can_be_selected() {
        let cropped = gray_image(20, 20);
        let face = DetectedFace::new(BoundingBox::new(0, 0, 20, 20))
            .with_contour(ContourType::NoseBottom, vec![ContourPoint::new(10.0, 12.0)]);
        let annotated =
            annotate_contours(&cropped, &face, &[ContourType::NoseBottom], 0, 0, 1.0, RED);
        assert_eq!(annotated.get_pixel(10, 12), &RED);
    }
}
