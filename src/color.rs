/// Pixel memory layout for decode output and encode input.
///
/// The discriminant is the pixel-format configuration value handed to the
/// decode engine. Its low 16 bits are four 4-bit channel depth codes, from
/// which [`ColorFormat::bits_per_pixel`] is derived.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    /// 3 channels, 8-bit, B,G,R.
    Bgr = 0x8000_0888,
    /// 4 channels, 8-bit, B,G,R,A (straight alpha).
    Bgra = 0x8100_8888,
    /// 4 channels, 8-bit, B,G,R,X (opaque; 4th byte is padding, always 0xFF).
    Bgrx = 0x9000_8888,
    /// 3 channels, 8-bit, R,G,B.
    Rgb = 0xA000_0888,
    /// 4 channels, 8-bit, R,G,B,A (straight alpha).
    #[default]
    Rgba = 0xA100_8888,
    /// 4 channels, 8-bit, R,G,B,X (opaque; 4th byte is padding, always 0xFF).
    Rgbx = 0xB000_8888,
    /// 4 channels, 8-bit, C,M,Y,K (not inverted).
    Cmyk = 0xD003_8888,
}

/// Bit widths indexed by a 4-bit depth code.
const DEPTH_BITS: [u32; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 10, 12, 16, 24, 32, 48, 64];

impl ColorFormat {
    /// Every variant, in declaration order.
    pub const ALL: [ColorFormat; 7] = [
        Self::Bgr,
        Self::Bgra,
        Self::Bgrx,
        Self::Rgb,
        Self::Rgba,
        Self::Rgbx,
        Self::Cmyk,
    ];

    /// Engine pixel-format configuration value.
    pub const fn pixel_format_repr(self) -> u32 {
        self as u32
    }

    /// Bits per pixel, summed over the channel depth codes.
    pub fn bits_per_pixel(&self) -> u32 {
        let repr = self.pixel_format_repr();
        (0..4)
            .map(|i| DEPTH_BITS[((repr >> (4 * i)) & 0xF) as usize])
            .sum()
    }

    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel() / 8) as usize
    }

    /// Number of channels stored per pixel (padding counts).
    pub fn channels(&self) -> usize {
        match self {
            Self::Bgr | Self::Rgb => 3,
            Self::Bgra | Self::Bgrx | Self::Rgba | Self::Rgbx | Self::Cmyk => 4,
        }
    }

    /// Whether the 4th byte carries meaningful alpha.
    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Bgra | Self::Rgba)
    }

    /// Channel count for the PNG encoder, or `None` if encoding from this
    /// layout is not supported.
    pub fn encode_channels(&self) -> Option<u8> {
        match self {
            Self::Rgb => Some(3),
            Self::Rgba => Some(4),
            _ => None,
        }
    }

    /// Whether this layout has the same memory representation as `other`.
    ///
    /// For example, `Bgra` and `Bgrx` are compatible (same 4-byte B,G,R,X/A layout).
    pub fn is_memory_compatible(&self, other: ColorFormat) -> bool {
        if *self == other {
            return true;
        }
        matches!(
            (*self, other),
            (Self::Bgra, Self::Bgrx)
                | (Self::Bgrx, Self::Bgra)
                | (Self::Rgba, Self::Rgbx)
                | (Self::Rgbx, Self::Rgba)
        )
    }
}

impl TryFrom<u32> for ColorFormat {
    type Error = u32;

    /// Look up a layout by its engine configuration value.
    fn try_from(repr: u32) -> Result<Self, u32> {
        Self::ALL
            .into_iter()
            .find(|c| c.pixel_format_repr() == repr)
            .ok_or(repr)
    }
}

/// Pixel types that can view decoded bytes directly.
#[cfg(feature = "rgb")]
pub trait DecodePixel: Copy + 'static {
    /// Layout whose bytes this pixel type reinterprets.
    fn color() -> ColorFormat;
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::Rgb<u8> {
    fn color() -> ColorFormat {
        ColorFormat::Rgb
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::Rgba<u8> {
    fn color() -> ColorFormat {
        ColorFormat::Rgba
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::Bgr<u8> {
    fn color() -> ColorFormat {
        ColorFormat::Bgr
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::Bgra<u8> {
    fn color() -> ColorFormat {
        ColorFormat::Bgra
    }
}
