use enough::Stop;
use log::{debug, trace};

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::color::ColorFormat;
use crate::engine::{DecodeEngine, PngDecodeEngine};
use crate::error::DecodeError;
use crate::limits::Limits;

/// Decoded image output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    /// Column count.
    pub width: u32,
    /// Row count.
    pub height: u32,
    pub color: ColorFormat,
}

impl DecodeOutput {
    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Split into `(pixels, rows, columns)`.
    pub fn into_parts(self) -> (Vec<u8>, u32, u32) {
        (self.pixels, self.height, self.width)
    }

    pub fn rows(&self) -> u32 {
        self.height
    }

    pub fn columns(&self) -> u32 {
        self.width
    }

    /// Reinterpret pixel data as typed pixel slice.
    ///
    /// Returns [`DecodeError::ColorMismatch`] if the color format doesn't match `P`.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::DecodePixel>(&self) -> Result<&[P], DecodeError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        if !self.color.is_memory_compatible(P::color()) {
            return Err(DecodeError::ColorMismatch {
                expected: P::color(),
                actual: self.color,
            });
        }
        Ok(self.pixels().as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::DecodePixel>(
        &self,
    ) -> Result<imgref::ImgRef<'_, P>, DecodeError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to an [`imgref::ImgVec`] of typed pixels.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: crate::DecodePixel>(&self) -> Result<imgref::ImgVec<P>, DecodeError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width as usize,
            self.height as usize,
        ))
    }
}

/// Decode request builder.
///
/// ```no_run
/// use zenpngcodec::{ColorFormat, DecodeRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // your PNG bytes
/// let limits = Limits { max_pixels: Some(1 << 24), ..Default::default() };
/// let decoded = DecodeRequest::new(data)
///     .with_color(ColorFormat::Bgra)
///     .with_limits(&limits)
///     .decode(Unstoppable)?;
/// # Ok::<(), zenpngcodec::DecodeError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    color: ColorFormat,
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    /// Decode `data` to RGBA unless [`with_color`](Self::with_color) says otherwise.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            color: ColorFormat::Rgba,
            limits: None,
        }
    }

    pub fn with_color(mut self, color: ColorFormat) -> Self {
        self.color = color;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, DecodeError> {
        let mut engine = PngDecodeEngine::new(self.data);
        if let Some(bytes) = self.limits.and_then(Limits::engine_bytes) {
            engine = engine.with_max_bytes(bytes);
        }
        run(engine, self.color, self.limits, &stop)
    }
}

/// Drive `engine` through header, configure, workspace and frame decode.
///
/// The workspace and the engine are dropped on every return path; nothing
/// partially decoded escapes on error.
pub(crate) fn run<E: DecodeEngine>(
    mut engine: E,
    color: ColorFormat,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, DecodeError> {
    let header = engine.read_header()?;
    let (width, height) = (header.width, header.height);
    debug!(
        "PNG {width}x{height} {:?} {}-bit, decoding to {color:?}",
        header.native_color, header.bit_depth
    );
    if let Some(limits) = limits {
        limits.check(width, height)?;
    }
    stop.check()?;

    engine.configure(color, width, height)?;

    let workbuf_len = engine.workbuf_len();
    if let Some(limits) = limits {
        limits.check_memory(workbuf_len)?;
    }
    let mut workbuf = alloc_scratch(workbuf_len)?;

    let total = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(color.bytes_per_pixel()))
        .ok_or(DecodeError::DimensionsTooLarge { width, height })?;
    if let Some(limits) = limits {
        limits.check_memory(total)?;
    }
    let mut pixels = alloc_zeroed(total, "pixel buffer")?;
    trace!("workspace {workbuf_len} bytes, output {total} bytes");

    stop.check()?;
    engine.decode_frame(&mut pixels, &mut workbuf)?;

    Ok(DecodeOutput {
        pixels,
        width,
        height,
        color,
    })
}

/// Engines that write straight into the output report a zero-length
/// workspace, which allocates nothing.
fn alloc_scratch(bytes: usize) -> Result<Vec<u8>, DecodeError> {
    if bytes == 0 {
        return Ok(Vec::new());
    }
    alloc_zeroed(bytes, "decode workspace")
}

fn alloc_zeroed(bytes: usize, what: &'static str) -> Result<Vec<u8>, DecodeError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(bytes)
        .map_err(|_| DecodeError::Allocation { what, bytes })?;
    buf.resize(bytes, 0);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::{ImageInfo, NativeColor};
    use enough::Unstoppable;

    #[derive(Default)]
    struct MockEngine {
        width: u32,
        height: u32,
        workbuf_len: usize,
        fail_header: bool,
        fail_frame: bool,
        calls: Vec<&'static str>,
        configured: Option<ColorFormat>,
        seen_workbuf: usize,
    }

    impl DecodeEngine for &mut MockEngine {
        fn read_header(&mut self) -> Result<ImageInfo, DecodeError> {
            self.calls.push("read_header");
            if self.fail_header {
                return Err(DecodeError::InvalidHeader("bad signature".into()));
            }
            Ok(ImageInfo {
                width: self.width,
                height: self.height,
                native_color: NativeColor::Rgb,
                bit_depth: 8,
                has_alpha: false,
                interlaced: false,
                animated: false,
            })
        }

        fn configure(
            &mut self,
            color: ColorFormat,
            _width: u32,
            _height: u32,
        ) -> Result<(), DecodeError> {
            self.calls.push("configure");
            self.configured = Some(color);
            Ok(())
        }

        fn workbuf_len(&self) -> usize {
            self.workbuf_len
        }

        fn decode_frame(
            &mut self,
            dst: &mut [u8],
            workbuf: &mut [u8],
        ) -> Result<(), DecodeError> {
            self.calls.push("decode_frame");
            self.seen_workbuf = workbuf.len();
            if self.fail_frame {
                return Err(DecodeError::Frame("checksum mismatch".into()));
            }
            dst.fill(0xAB);
            Ok(())
        }
    }

    #[test]
    fn protocol_runs_in_order() {
        let mut mock = MockEngine {
            width: 3,
            height: 2,
            workbuf_len: 21,
            ..Default::default()
        };
        let out = run(&mut mock, ColorFormat::Bgr, None, &Unstoppable).unwrap();
        assert_eq!(mock.calls, ["read_header", "configure", "decode_frame"]);
        assert_eq!(mock.configured, Some(ColorFormat::Bgr));
        assert_eq!(mock.seen_workbuf, 21);
        assert_eq!(out.pixels().len(), 3 * 2 * 3);
        assert_eq!(out.into_parts(), (vec![0xAB; 18], 2, 3));
    }

    #[test]
    fn zero_workspace_is_not_allocated() {
        let mut mock = MockEngine {
            width: 2,
            height: 2,
            workbuf_len: 0,
            ..Default::default()
        };
        let out = run(&mut mock, ColorFormat::Rgba, None, &Unstoppable).unwrap();
        assert_eq!(mock.seen_workbuf, 0);
        assert_eq!(out.pixels(), &[0xAB; 16][..]);
    }

    #[test]
    fn header_failure_stops_early() {
        let mut mock = MockEngine {
            fail_header: true,
            ..Default::default()
        };
        let err = run(&mut mock, ColorFormat::Rgba, None, &Unstoppable).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidHeader(_)));
        assert_eq!(mock.calls, ["read_header"]);
    }

    #[test]
    fn frame_failure_returns_no_pixels() {
        let mut mock = MockEngine {
            width: 1,
            height: 1,
            fail_frame: true,
            ..Default::default()
        };
        let err = run(&mut mock, ColorFormat::Rgba, None, &Unstoppable).unwrap_err();
        assert!(matches!(err, DecodeError::Frame(msg) if msg.contains("checksum")));
    }

    #[test]
    fn impossible_workspace_is_allocation_failure() {
        let mut mock = MockEngine {
            width: 1,
            height: 1,
            workbuf_len: usize::MAX,
            ..Default::default()
        };
        let err = run(&mut mock, ColorFormat::Rgba, None, &Unstoppable).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Allocation {
                what: "decode workspace",
                ..
            }
        ));
        assert!(!mock.calls.contains(&"decode_frame"));
    }

    #[test]
    fn overflowing_output_size_is_rejected() {
        let mut mock = MockEngine {
            width: u32::MAX,
            height: u32::MAX,
            ..Default::default()
        };
        let err = run(&mut mock, ColorFormat::Rgba, None, &Unstoppable).unwrap_err();
        // 64-bit targets overflow in the multiply; 32-bit ones already fail in the product.
        assert!(matches!(
            err,
            DecodeError::DimensionsTooLarge { .. } | DecodeError::Allocation { .. }
        ));
    }

    #[test]
    fn memory_limit_checked_before_allocating() {
        let mut mock = MockEngine {
            width: 4,
            height: 4,
            ..Default::default()
        };
        let limits = Limits {
            max_memory_bytes: Some(63),
            ..Default::default()
        };
        let err = run(&mut mock, ColorFormat::Rgba, Some(&limits), &Unstoppable).unwrap_err();
        assert!(matches!(err, DecodeError::LimitExceeded(_)));
        assert!(!mock.calls.contains(&"decode_frame"));
    }

    #[test]
    fn stop_token_cancels_before_frame() {
        struct AlwaysStop;
        impl Stop for AlwaysStop {
            fn check(&self) -> Result<(), enough::StopReason> {
                Err(enough::StopReason::Cancelled)
            }
        }
        let mut mock = MockEngine {
            width: 1,
            height: 1,
            ..Default::default()
        };
        let err = run(&mut mock, ColorFormat::Rgba, None, &AlwaysStop).unwrap_err();
        assert!(matches!(err, DecodeError::Cancelled(_)));
        assert!(!mock.calls.contains(&"decode_frame"));
    }
}
