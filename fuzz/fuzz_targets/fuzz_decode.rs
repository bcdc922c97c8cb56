#![no_main]
use libfuzzer_sys::fuzz_target;
use zenpngcodec::{ColorFormat, ImageInfo, Limits};

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 22),
        max_memory_bytes: Some(1 << 26),
        ..Default::default()
    };

    // Probe and decode to every layout — must never panic
    let _ = ImageInfo::from_bytes(data);
    for color in ColorFormat::ALL {
        if let Ok(decoded) = zenpngcodec::DecodeRequest::new(data)
            .with_color(color)
            .with_limits(&limits)
            .decode(enough::Unstoppable)
        {
            let expected =
                decoded.width as usize * decoded.height as usize * color.bytes_per_pixel();
            assert_eq!(decoded.pixels().len(), expected);
        }
    }
});
