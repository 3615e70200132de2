use thiserror::Error;

use crate::crop::CropRect;

#[derive(Debug, Error)]
pub enum FaceCropError {
    #[error("face detection failed: {0}")]
    DetectorFailure(String),

    #[error("Failed to crop face: rectangle {rect} is empty or outside a {width}x{height} image")]
    CropFailure {
        rect: CropRect,
        width: u32,
        height: u32,
    },

    #[error("failed to store image: {0}")]
    StorageFailure(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    DecodeError(String),

    #[error("failed to encode image: {0}")]
    EncodeError(String),

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("padding percent must be finite and >= 0.0, got {0}")]
    InvalidPadding(f32),

    #[error("point radius must be finite and >= 0.0, got {0}")]
    InvalidPointRadius(f32),

    #[error("failed to load face detection model: {0}")]
    ModelLoad(String),
}
