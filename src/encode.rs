use enough::Stop;
use log::debug;

use crate::color::ColorFormat;
use crate::engine::{Compression, EncodeEngine, PngEncodeEngine};
use crate::error::EncodeError;

/// Encode request builder.
///
/// ```no_run
/// use zenpngcodec::{ColorFormat, Compression, EncodeRequest, Unstoppable};
///
/// let pixels = vec![255u8; 2 * 2 * 4];
/// let png = EncodeRequest::new()
///     .with_compression(Compression::Best)
///     .encode(&pixels, 2, 2, ColorFormat::Rgba, Unstoppable)?;
/// # Ok::<(), zenpngcodec::EncodeError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct EncodeRequest {
    compression: Compression,
}

impl EncodeRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Encode `width` x `height` pixels laid out as `color` (Rgb or Rgba).
    pub fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        color: ColorFormat,
        stop: impl Stop,
    ) -> Result<Vec<u8>, EncodeError> {
        run(
            PngEncodeEngine::new(self.compression),
            pixels,
            width,
            height,
            color,
            &stop,
        )
    }
}

/// Validate the layout and buffer, then hand off to `engine`.
///
/// The format is checked before the buffer is inspected. Bytes past
/// `width * height * channels` are ignored.
pub(crate) fn run<E: EncodeEngine>(
    mut engine: E,
    pixels: &[u8],
    width: u32,
    height: u32,
    color: ColorFormat,
    stop: &dyn Stop,
) -> Result<Vec<u8>, EncodeError> {
    let channels = color
        .encode_channels()
        .ok_or(EncodeError::UnsupportedFormat(color))?;

    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(usize::from(channels)))
        .ok_or(EncodeError::DimensionsTooLarge { width, height })?;
    if pixels.len() < expected {
        return Err(EncodeError::BufferTooSmall {
            needed: expected,
            actual: pixels.len(),
        });
    }
    debug!("encoding {width}x{height} {color:?} ({channels} channels) to PNG");

    stop.check()?;
    engine.encode(&pixels[..expected], width, height, channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enough::Unstoppable;

    #[derive(Default)]
    struct MockEngine {
        calls: usize,
        seen: Option<(usize, u32, u32, u8)>,
    }

    impl EncodeEngine for &mut MockEngine {
        fn encode(
            &mut self,
            pixels: &[u8],
            width: u32,
            height: u32,
            channels: u8,
        ) -> Result<Vec<u8>, EncodeError> {
            self.calls += 1;
            self.seen = Some((pixels.len(), width, height, channels));
            Ok(b"\x89PNG".to_vec())
        }
    }

    #[test]
    fn unsupported_formats_never_reach_engine() {
        for color in [
            ColorFormat::Bgr,
            ColorFormat::Bgra,
            ColorFormat::Bgrx,
            ColorFormat::Rgbx,
            ColorFormat::Cmyk,
        ] {
            let mut mock = MockEngine::default();
            // Deliberately mis-sized: the format check comes first.
            let err = run(&mut mock, &[], 4, 4, color, &Unstoppable).unwrap_err();
            assert!(
                matches!(err, EncodeError::UnsupportedFormat(c) if c == color),
                "{color:?}: {err:?}"
            );
            assert_eq!(mock.calls, 0);
        }
    }

    #[test]
    fn channel_count_follows_format() {
        let mut mock = MockEngine::default();
        run(&mut mock, &[0; 12], 2, 2, ColorFormat::Rgb, &Unstoppable).unwrap();
        assert_eq!(mock.seen, Some((12, 2, 2, 3)));

        let mut mock = MockEngine::default();
        run(&mut mock, &[0; 16], 2, 2, ColorFormat::Rgba, &Unstoppable).unwrap();
        assert_eq!(mock.seen, Some((16, 2, 2, 4)));
    }

    #[test]
    fn short_buffer_rejected() {
        let mut mock = MockEngine::default();
        let err = run(&mut mock, &[0; 15], 2, 2, ColorFormat::Rgba, &Unstoppable).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::BufferTooSmall {
                needed: 16,
                actual: 15
            }
        ));
        assert_eq!(mock.calls, 0);
    }

    #[test]
    fn trailing_bytes_ignored() {
        let mut mock = MockEngine::default();
        run(&mut mock, &[0; 20], 2, 2, ColorFormat::Rgba, &Unstoppable).unwrap();
        assert_eq!(mock.seen, Some((16, 2, 2, 4)));
    }
}
