#!/usr/bin/env -S cargo +nightly -Zscript
---
[dependencies]
png = "0.17.16"
---
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn write_png(w: u32, h: u32, color: png::ColorType, depth: png::BitDepth, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, w, h);
    encoder.set_color(color);
    encoder.set_depth(depth);
    if color == png::ColorType::Indexed {
        encoder.set_palette(vec![0, 0, 0, 255, 255, 255]);
    }
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(data).unwrap();
    writer.finish().unwrap();
    out
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // RGB 2x2
    let rgb = write_png(2, 2, png::ColorType::Rgb, png::BitDepth::Eight, &[
        0xff, 0x00, 0x00, 0x00, 0xff, 0x00, 0x00, 0x00, 0xff, 0x80, 0x80, 0x80,
    ]);
    fs::write(format!("{dir}/rgb_2x2.png"), &rgb).unwrap();

    // RGBA 1x1
    let rgba = write_png(1, 1, png::ColorType::Rgba, png::BitDepth::Eight, &[0xff, 0x00, 0x00, 0x80]);
    fs::write(format!("{dir}/rgba_1x1.png"), rgba).unwrap();

    // Gray 16-bit 3x1
    let gray16 = write_png(3, 1, png::ColorType::Grayscale, png::BitDepth::Sixteen, &[0, 0, 0x80, 0, 0xff, 0xff]);
    fs::write(format!("{dir}/gray16_3x1.png"), gray16).unwrap();

    // Palette 1-bit 8x1
    let indexed = write_png(8, 1, png::ColorType::Indexed, png::BitDepth::One, &[0b1010_1010]);
    fs::write(format!("{dir}/indexed_8x1.png"), indexed).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/just_signature.bin"), b"\x89PNG\r\n\x1a\n").unwrap();
    fs::write(format!("{dir}/short_ihdr.bin"), &rgb[..20]).unwrap();
    fs::write(format!("{dir}/no_iend.bin"), &rgb[..rgb.len() - 12]).unwrap();

    println!("Generated seed corpus in {dir}/");
}
