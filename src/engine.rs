//! Engine capabilities driven by the decode and encode adapters.
//!
//! [`PngDecodeEngine`] and [`PngEncodeEngine`] wrap the `png` crate. Any
//! other backend can be substituted by implementing [`DecodeEngine`] or
//! [`EncodeEngine`] and calling [`crate::decode_with_engine`] /
//! [`crate::encode_with_engine`].

use log::trace;

use crate::color::ColorFormat;
use crate::convert::convert_frame;
use crate::error::{DecodeError, EncodeError};
use crate::info::{ImageInfo, NativeColor};

/// Decoding capability, driven in order: [`read_header`](Self::read_header),
/// [`configure`](Self::configure), [`workbuf_len`](Self::workbuf_len),
/// [`decode_frame`](Self::decode_frame).
pub trait DecodeEngine {
    /// Parse up to the start of pixel data.
    fn read_header(&mut self) -> Result<ImageInfo, DecodeError>;

    /// Set the output layout and dimensions for [`decode_frame`](Self::decode_frame).
    fn configure(&mut self, color: ColorFormat, width: u32, height: u32)
    -> Result<(), DecodeError>;

    /// Scratch bytes the engine needs for the configured frame.
    fn workbuf_len(&self) -> usize;

    /// Decode the whole frame into `dst`, which holds exactly
    /// `width * height * color.bytes_per_pixel()` bytes.
    fn decode_frame(&mut self, dst: &mut [u8], workbuf: &mut [u8]) -> Result<(), DecodeError>;
}

/// Encoding capability: one-shot memory-to-memory compression.
pub trait EncodeEngine {
    /// Compress `pixels` (exactly `width * height * channels` bytes).
    fn encode(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: u8,
    ) -> Result<Vec<u8>, EncodeError>;
}

/// [`DecodeEngine`] backed by the `png` crate.
pub struct PngDecodeEngine<'a> {
    data: &'a [u8],
    max_bytes: Option<usize>,
    reader: Option<png::Reader<&'a [u8]>>,
    target: Option<(ColorFormat, u32, u32)>,
}

impl<'a> PngDecodeEngine<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            max_bytes: None,
            reader: None,
            target: None,
        }
    }

    /// Cap the engine's internal allocations (decompressed chunks, text, ICC).
    pub fn with_max_bytes(mut self, bytes: usize) -> Self {
        self.max_bytes = Some(bytes);
        self
    }
}

impl DecodeEngine for PngDecodeEngine<'_> {
    fn read_header(&mut self) -> Result<ImageInfo, DecodeError> {
        let mut decoder = match self.max_bytes {
            Some(bytes) => png::Decoder::new_with_limits(self.data, png::Limits { bytes }),
            None => png::Decoder::new(self.data),
        };
        decoder.set_transformations(png::Transformations::normalize_to_color8());
        let reader = decoder
            .read_info()
            .map_err(|e| DecodeError::InvalidHeader(e.to_string()))?;

        let info = reader.info();
        let header = ImageInfo {
            width: info.width,
            height: info.height,
            native_color: NativeColor::from_png(info.color_type),
            bit_depth: info.bit_depth as u8,
            has_alpha: matches!(
                info.color_type,
                png::ColorType::GrayscaleAlpha | png::ColorType::Rgba
            ) || info.trns.is_some(),
            interlaced: info.interlaced,
            animated: info.animation_control.is_some(),
        };
        self.reader = Some(reader);
        Ok(header)
    }

    fn configure(
        &mut self,
        color: ColorFormat,
        width: u32,
        height: u32,
    ) -> Result<(), DecodeError> {
        let reader = self
            .reader
            .as_ref()
            .ok_or(DecodeError::Protocol("configure before read_header"))?;
        let info = reader.info();
        if (info.width, info.height) != (width, height) {
            return Err(DecodeError::Protocol(
                "configured dimensions differ from the header",
            ));
        }
        self.target = Some((color, width, height));
        Ok(())
    }

    fn workbuf_len(&self) -> usize {
        let Some(reader) = self.reader.as_ref() else {
            return 0;
        };
        match self.target {
            Some((color, _, _)) if writes_in_place(reader.output_color_type(), color) => 0,
            _ => reader.output_buffer_size(),
        }
    }

    fn decode_frame(&mut self, dst: &mut [u8], workbuf: &mut [u8]) -> Result<(), DecodeError> {
        let (color, _, _) = self
            .target
            .ok_or(DecodeError::Protocol("decode_frame before configure"))?;
        let reader = self
            .reader
            .as_mut()
            .ok_or(DecodeError::Protocol("decode_frame before read_header"))?;

        if writes_in_place(reader.output_color_type(), color) {
            trace!("native frame already {color:?}, decoding into output");
            reader
                .next_frame(dst)
                .map_err(|e| DecodeError::Frame(e.to_string()))?;
            return Ok(());
        }

        let frame = reader
            .next_frame(workbuf)
            .map_err(|e| DecodeError::Frame(e.to_string()))?;
        let native = &workbuf[..frame.buffer_size()];
        let (native_color, _) = reader.output_color_type();
        trace!(
            "native frame {:?}, {} bytes -> {:?}, {} bytes",
            native_color,
            native.len(),
            color,
            dst.len()
        );
        convert_frame(native, native_color.samples(), dst, color)
    }
}

/// The normalized 8-bit output already has `color`'s layout.
fn writes_in_place(native: (png::ColorType, png::BitDepth), color: ColorFormat) -> bool {
    matches!(
        (native, color),
        ((png::ColorType::Rgb, png::BitDepth::Eight), ColorFormat::Rgb)
            | ((png::ColorType::Rgba, png::BitDepth::Eight), ColorFormat::Rgba)
    )
}

/// Deflate effort for [`PngEncodeEngine`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compression {
    /// Fastest encode, larger files.
    #[default]
    Fast,
    /// Balanced speed and size.
    Default,
    /// Smallest files, slowest encode.
    Best,
}

impl Compression {
    fn to_png(self) -> png::Compression {
        match self {
            Compression::Fast => png::Compression::Fast,
            Compression::Default => png::Compression::Default,
            Compression::Best => png::Compression::Best,
        }
    }
}

/// [`EncodeEngine`] backed by the `png` crate.
#[derive(Clone, Debug, Default)]
pub struct PngEncodeEngine {
    compression: Compression,
}

impl PngEncodeEngine {
    pub fn new(compression: Compression) -> Self {
        Self { compression }
    }
}

impl EncodeEngine for PngEncodeEngine {
    fn encode(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: u8,
    ) -> Result<Vec<u8>, EncodeError> {
        let color_type = match channels {
            3 => png::ColorType::Rgb,
            4 => png::ColorType::Rgba,
            n => {
                return Err(EncodeError::Encode(format!(
                    "cannot encode {n} channels (supported: 3, 4)"
                )));
            }
        };

        let mut out = Vec::new();
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(self.compression.to_png());

        let mut writer = encoder
            .write_header()
            .map_err(|e| EncodeError::Encode(e.to_string()))?;
        writer
            .write_image_data(pixels)
            .map_err(|e| EncodeError::Encode(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| EncodeError::Encode(e.to_string()))?;
        Ok(out)
    }
}
