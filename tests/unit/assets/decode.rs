use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let raw: Vec<u8> = std::iter::repeat_n(px, (w * h) as usize).flatten().collect();
    let img = image::RgbaImage::from_raw(w, h, raw).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decodes_png_dimensions() {
    let f = decode_frame(&png_bytes(3, 2, [10, 20, 30, 255])).unwrap();
    assert_eq!((f.width, f.height), (3, 2));
    assert_eq!(f.rgba8_premul.len(), 3 * 2 * 4);
    assert_eq!(f.px(2, 1), [10, 20, 30, 255]);
    assert_eq!(f.size(), Size::new(3.0, 2.0));
}

#[test]
fn premultiplies_translucent_pixels() {
    let f = decode_frame(&png_bytes(1, 1, [255, 128, 0, 128])).unwrap();
    assert_eq!(f.px(0, 0), [128, 64, 0, 128]);
}

#[test]
fn garbage_bytes_are_an_asset_error() {
    let err = decode_frame(b"definitely not an image").unwrap_err();
    assert!(matches!(err, ReelError::Asset(_)));
    assert!(err.to_string().starts_with("asset error: decode frame image"));
}
