//! Native PNG samples to the requested [`ColorFormat`].
//!
//! The engine hands over 8-bit gray, gray+alpha, RGB or RGBA (palette and
//! low bit depths already expanded, 16-bit already stripped). Opaque targets
//! composite alpha sources over black; padding bytes are written as 0xFF.

use crate::color::ColorFormat;
use crate::error::DecodeError;

/// Convert a full frame of `src_channels`-sample pixels into `dst`.
pub(crate) fn convert_frame(
    src: &[u8],
    src_channels: usize,
    dst: &mut [u8],
    target: ColorFormat,
) -> Result<(), DecodeError> {
    if !(1..=4).contains(&src_channels) {
        return Err(DecodeError::Frame(format!(
            "unexpected native sample count {src_channels}"
        )));
    }
    let bpp = target.bytes_per_pixel();
    let pixel_count = src.len() / src_channels;
    if src.len() % src_channels != 0 || pixel_count.checked_mul(bpp) != Some(dst.len()) {
        return Err(DecodeError::Frame(format!(
            "native frame of {} bytes does not fill a {} byte {target:?} buffer",
            src.len(),
            dst.len()
        )));
    }

    match (src_channels, target) {
        (3, ColorFormat::Rgb) | (4, ColorFormat::Rgba) => {
            dst.copy_from_slice(src);
            return Ok(());
        }
        #[cfg(feature = "simd")]
        (channels, target) => {
            if swizzle_simd(src, channels, dst, target)? {
                return Ok(());
            }
        }
        #[cfg(not(feature = "simd"))]
        _ => {}
    }

    for (s, d) in src.chunks_exact(src_channels).zip(dst.chunks_exact_mut(bpp)) {
        let [r, g, b, a] = read_rgba(s);
        write_pixel([r, g, b, a], d, target);
    }
    Ok(())
}

fn read_rgba(s: &[u8]) -> [u8; 4] {
    match *s {
        [v] => [v, v, v, 0xFF],
        [v, a] => [v, v, v, a],
        [r, g, b] => [r, g, b, 0xFF],
        [r, g, b, a] => [r, g, b, a],
        _ => [0, 0, 0, 0xFF],
    }
}

fn write_pixel([r, g, b, a]: [u8; 4], d: &mut [u8], target: ColorFormat) {
    if target.has_alpha() {
        match target {
            ColorFormat::Bgra => d.copy_from_slice(&[b, g, r, a]),
            _ => d.copy_from_slice(&[r, g, b, a]),
        }
        return;
    }
    let [r, g, b] = if a == 0xFF {
        [r, g, b]
    } else {
        [premultiply(r, a), premultiply(g, a), premultiply(b, a)]
    };
    match target {
        ColorFormat::Bgr => d.copy_from_slice(&[b, g, r]),
        ColorFormat::Rgb => d.copy_from_slice(&[r, g, b]),
        ColorFormat::Bgrx => d.copy_from_slice(&[b, g, r, 0xFF]),
        ColorFormat::Cmyk => d.copy_from_slice(&rgb_to_cmyk(r, g, b)),
        _ => d.copy_from_slice(&[r, g, b, 0xFF]),
    }
}

/// `c * a / 255`, rounded.
fn premultiply(c: u8, a: u8) -> u8 {
    ((u16::from(c) * u16::from(a) + 127) / 255) as u8
}

fn rgb_to_cmyk(r: u8, g: u8, b: u8) -> [u8; 4] {
    let max = r.max(g).max(b);
    if max == 0 {
        return [0, 0, 0, 0xFF];
    }
    let m = u16::from(max);
    let ink = |c: u8| ((m - u16::from(c)) * 255 / m) as u8;
    [ink(r), ink(g), ink(b), 0xFF - max]
}

/// Opaque-source and pure-swizzle cases handled by `garb`. Returns
/// `Ok(false)` when the pair has no SIMD path.
#[cfg(feature = "simd")]
fn swizzle_simd(
    src: &[u8],
    src_channels: usize,
    dst: &mut [u8],
    target: ColorFormat,
) -> Result<bool, DecodeError> {
    use garb::bytes;
    let res = match (src_channels, target) {
        (1, ColorFormat::Rgba | ColorFormat::Bgra | ColorFormat::Rgbx | ColorFormat::Bgrx) => {
            bytes::gray_to_rgba(src, dst)
        }
        (2, ColorFormat::Rgba | ColorFormat::Bgra) => bytes::gray_alpha_to_rgba(src, dst),
        (3, ColorFormat::Rgba | ColorFormat::Rgbx) => bytes::rgb_to_rgba(src, dst),
        (3, ColorFormat::Bgra | ColorFormat::Bgrx) => bytes::rgb_to_bgra(src, dst),
        (3, ColorFormat::Bgr) => bytes::rgb_to_bgr(src, dst),
        (4, ColorFormat::Bgra) => bytes::rgba_to_bgra(src, dst),
        _ => return Ok(false),
    };
    res.map_err(|e| DecodeError::Frame(format!("swizzle failed: {e}")))?;
    Ok(true)
}
