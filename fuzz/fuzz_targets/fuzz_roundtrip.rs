#![no_main]
use libfuzzer_sys::fuzz_target;
use zenpngcodec::*;

fuzz_target!(|data: &[u8]| {
    // First byte picks the layout and width, the rest are pixels
    let Some((&sel, pixels)) = data.split_first() else {
        return;
    };
    let color = if sel & 1 == 0 { ColorFormat::Rgb } else { ColorFormat::Rgba };
    let bpp = color.bytes_per_pixel();
    let width = u32::from(sel >> 1).max(1);
    let row = width as usize * bpp;
    let height = (pixels.len() / row) as u32;
    if height == 0 {
        return;
    }
    let pixels = &pixels[..row * height as usize];

    let Ok(encoded) = encode(pixels, width, height, color, enough::Unstoppable) else {
        panic!("encoding a correctly sized buffer failed");
    };
    let Ok(decoded) = decode(&encoded, color, enough::Unstoppable) else {
        panic!("encoded data failed to decode");
    };

    assert_eq!(decoded.pixels(), pixels, "roundtrip pixel mismatch");
    assert_eq!(decoded.width, width);
    assert_eq!(decoded.height, height);
});
