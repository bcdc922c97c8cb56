use crate::engine::{DecodeEngine, PngDecodeEngine};
use crate::error::DecodeError;

/// Color type stored in the PNG header.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NativeColor {
    Grayscale,
    GrayscaleAlpha,
    Rgb,
    Rgba,
    /// Palette-based; expands to RGB or RGBA on decode.
    Indexed,
}

impl NativeColor {
    pub(crate) fn from_png(color: png::ColorType) -> Self {
        match color {
            png::ColorType::Grayscale => Self::Grayscale,
            png::ColorType::GrayscaleAlpha => Self::GrayscaleAlpha,
            png::ColorType::Rgb => Self::Rgb,
            png::ColorType::Rgba => Self::Rgba,
            png::ColorType::Indexed => Self::Indexed,
        }
    }
}

/// Image metadata from the PNG header, obtained without decoding pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    /// Column count.
    pub width: u32,
    /// Row count.
    pub height: u32,
    pub native_color: NativeColor,
    /// Bits per sample (1, 2, 4, 8 or 16).
    pub bit_depth: u8,
    /// Alpha channel or tRNS transparency present.
    pub has_alpha: bool,
    /// Adam7 interlaced.
    pub interlaced: bool,
    /// APNG animation control chunk present. Only the default image decodes.
    pub animated: bool,
}

impl ImageInfo {
    /// Probe PNG header for dimensions and native color type.
    pub fn from_bytes(data: &[u8]) -> Result<ImageInfo, DecodeError> {
        PngDecodeEngine::new(data).read_header()
    }
}
