use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageEncoder, RgbImage, RgbaImage};

use crate::error::FaceCropError;

/// Decode JPEG, PNG, or WebP bytes into an RGBA buffer.
pub(crate) fn decode_image(input: &[u8]) -> Result<RgbaImage, FaceCropError> {
    let decoded =
        image::load_from_memory(input).map_err(|e| FaceCropError::DecodeError(e.to_string()))?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(FaceCropError::ZeroDimensions);
    }
    Ok(decoded.to_rgba8())
}

/// Open an image file and scale it to exactly `size` x `size`.
pub(crate) fn load_thumbnail(
    path: &std::path::Path,
    size: u32,
) -> Result<RgbaImage, FaceCropError> {
    let bytes = std::fs::read(path)?;
    let image = decode_image(&bytes)?;
    Ok(DynamicImage::ImageRgba8(image)
        .resize_exact(size, size, FilterType::Triangle)
        .to_rgba8())
}

/// Flatten alpha channel by compositing onto a white background.
pub(crate) fn flatten_alpha(rgba: &RgbaImage) -> RgbImage {
    let (width, height) = rgba.dimensions();
    let mut rgb = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        let out_r = (r as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_g = (g as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_b = (b as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([out_r, out_g, out_b]));
    }

    rgb
}

/// Encode an RGBA image as JPEG at `quality` (1-100), flattening alpha first.
pub(crate) fn encode_jpeg(image: &RgbaImage, quality: u8) -> Result<Vec<u8>, FaceCropError> {
    let rgb = flatten_alpha(image);
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| FaceCropError::EncodeError(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_png(width: u32, height: u32) -> Vec<u8> {
        use image::codecs::png::PngEncoder;

        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
            ]);
        }
        let mut buffer = Vec::new();
        PngEncoder::new(&mut buffer)
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
        buffer
    }

    #[test]
    fn decode_png() {
        let img = decode_image(&make_test_png(30, 20)).unwrap();
        assert_eq!(img.dimensions(), (30, 20));
        assert_eq!(img.get_pixel(0, 0).0[3], 255);
    }

    #[test]
    fn decode_garbage_fails() {
        let err = decode_image(b"not an image").unwrap_err();
        assert!(matches!(err, FaceCropError::DecodeError(_)));
    }

    #[test]
    fn flatten_alpha_composites_over_white() {
        let mut rgba = RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([255, 0, 0, 0]));
        let rgb = flatten_alpha(&rgba);
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
    }

    #[test]
    fn flatten_alpha_preserves_opaque() {
        let mut rgba = RgbaImage::new(1, 1);
        rgba.put_pixel(0, 0, image::Rgba([100, 150, 200, 255]));
        let rgb = flatten_alpha(&rgba);
        assert_eq!(rgb.get_pixel(0, 0), &image::Rgb([100, 150, 200]));
    }

    #[test]
    fn encode_jpeg_produces_valid_output() {
        let img = RgbaImage::from_pixel(48, 64, image::Rgba([10, 20, 30, 255]));
        let data = encode_jpeg(&img, 100).unwrap();
        assert_eq!(data[0], 0xFF);
        assert_eq!(data[1], 0xD8);
        let decoded = decode_image(&data).unwrap();
        assert_eq!(decoded.dimensions(), (48, 64));
    }
}
