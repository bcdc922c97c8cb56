use enough::StopReason;

use crate::color::ColorFormat;

/// Errors from PNG decoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("failed to allocate {what} ({bytes} bytes)")]
    Allocation { what: &'static str, bytes: usize },

    #[error("failed to decode PNG image config: {0}")]
    InvalidHeader(String),

    #[error("failed to decode PNG frame: {0}")]
    Frame(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// A [`crate::DecodeEngine`] was driven out of order.
    #[error("decode engine misuse: {0}")]
    Protocol(&'static str),

    /// A typed view was requested for a pixel type that doesn't match the
    /// decoded layout.
    #[error("color format mismatch: expected {expected:?}, got {actual:?}")]
    ColorMismatch {
        expected: ColorFormat,
        actual: ColorFormat,
    },

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for DecodeError {
    fn from(r: StopReason) -> Self {
        DecodeError::Cancelled(r)
    }
}

/// Errors from PNG encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("unsupported color format for encoding: {0:?} (supported: Rgb, Rgba)")]
    UnsupportedFormat(ColorFormat),

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    Encode(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for EncodeError {
    fn from(r: StopReason) -> Self {
        EncodeError::Cancelled(r)
    }
}
