//! # zenpngcodec
//!
//! PNG decode and encode to and from caller-chosen pixel layouts.
//!
//! Decoding produces a tightly packed, row-major buffer in any
//! [`ColorFormat`] (RGB, BGR, RGBA, BGRA, RGBX, BGRX, CMYK) regardless of
//! the color type stored in the file. Encoding accepts RGB or RGBA.
//!
//! Bitstream parsing, unfiltering, inflate/deflate and CRC checks are done
//! by the [`png`](https://docs.rs/png) crate. This crate negotiates the
//! pixel format, sizes the buffers, and converts the engine's native
//! 8-bit samples to the requested layout.
//!
//! ## Layout conversion
//!
//! - Palette, low bit depth and tRNS transparency are expanded; 16-bit
//!   samples keep their high byte.
//! - Gray replicates into R, G and B. Missing alpha reads as 255.
//! - Targets without alpha (RGB, BGR, RGBX, BGRX, CMYK) composite
//!   transparent pixels over black. Padding bytes are 255.
//! - CMYK is not inverted: `K = 255 - max(R, G, B)`.
//!
//! ## Non-Goals
//!
//! - Animation (only the default image of an APNG decodes)
//! - 16-bit output
//! - Color management
//!
//! ## Usage
//!
//! ```no_run
//! use zenpngcodec::{ColorFormat, ImageInfo, Unstoppable};
//!
//! let data: &[u8] = &[]; // your PNG bytes
//!
//! // Probe without decoding
//! let info = ImageInfo::from_bytes(data)?;
//! println!("{}x{} {:?}", info.width, info.height, info.native_color);
//!
//! // Decode to BGRA
//! let decoded = zenpngcodec::decode(data, ColorFormat::Bgra, Unstoppable)?;
//! assert_eq!(decoded.pixels().len(), (info.width * info.height * 4) as usize);
//!
//! // Encode RGBA back to PNG
//! let rgba = zenpngcodec::decode_rgba(data, Unstoppable)?;
//! let png = zenpngcodec::encode(
//!     rgba.pixels(), rgba.width, rgba.height, ColorFormat::Rgba, Unstoppable,
//! )?;
//! # let _ = png;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod color;
mod convert;
mod decode;
mod encode;
mod engine;
mod error;
mod info;
mod limits;

// Re-exports
#[cfg(feature = "rgb")]
pub use color::DecodePixel;
pub use color::ColorFormat;
pub use decode::{DecodeOutput, DecodeRequest};
pub use encode::EncodeRequest;
pub use engine::{Compression, DecodeEngine, EncodeEngine, PngDecodeEngine, PngEncodeEngine};
pub use enough::{Stop, Unstoppable};
pub use error::{DecodeError, EncodeError};
pub use info::{ImageInfo, NativeColor};
pub use limits::Limits;

/// Decode PNG `data` to `color`, returning pixels and dimensions.
pub fn decode(
    data: &[u8],
    color: ColorFormat,
    stop: impl Stop,
) -> Result<DecodeOutput, DecodeError> {
    DecodeRequest::new(data).with_color(color).decode(stop)
}

/// Decode PNG `data` to RGBA.
pub fn decode_rgba(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, DecodeError> {
    decode(data, ColorFormat::Rgba, stop)
}

/// Run the decode protocol on a custom [`DecodeEngine`].
pub fn decode_with_engine<E: DecodeEngine>(
    engine: E,
    color: ColorFormat,
    limits: Option<&Limits>,
    stop: impl Stop,
) -> Result<DecodeOutput, DecodeError> {
    decode::run(engine, color, limits, &stop)
}

/// Encode `width` x `height` pixels (Rgb or Rgba) to PNG with fast compression.
pub fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    color: ColorFormat,
    stop: impl Stop,
) -> Result<Vec<u8>, EncodeError> {
    EncodeRequest::new().encode(pixels, width, height, color, stop)
}

/// Run the encode protocol on a custom [`EncodeEngine`].
pub fn encode_with_engine<E: EncodeEngine>(
    engine: E,
    pixels: &[u8],
    width: u32,
    height: u32,
    color: ColorFormat,
    stop: impl Stop,
) -> Result<Vec<u8>, EncodeError> {
    encode::run(engine, pixels, width, height, color, &stop)
}
