use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, [100, 50, 200, 128]);

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn acquire_reports_mime_size_and_downsizes_to_limit() {
    let buf = png_bytes(40, 20, [10, 20, 30, 255]);
    let dec = ImageDecoder::new(16, 8);

    let base = dec.acquire(&buf, UploadKind::BaseImage).unwrap();
    assert_eq!(base.mime_type, "image/png");
    assert_eq!(base.byte_len, buf.len());
    assert_eq!((base.width, base.height), (16, 8));

    let sticker = dec.acquire(&buf, UploadKind::Sticker).unwrap();
    assert_eq!((sticker.width, sticker.height), (8, 4));

    let raster = base.into_raster().unwrap();
    assert_eq!(raster.rgba8_premul.len(), 16 * 8 * 4);
}

#[test]
fn acquire_keeps_small_images_untouched() {
    let buf = png_bytes(3, 5, [0, 0, 0, 255]);
    let out = ImageDecoder::default()
        .acquire(&buf, UploadKind::BaseImage)
        .unwrap();
    assert_eq!((out.width, out.height), (3, 5));
}

#[test]
fn acquire_detects_svg_and_keeps_it_vector_for_stickers() {
    let svg = br#"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="30" height="10"></svg>"#;
    let out = ImageDecoder::default()
        .acquire(svg, UploadKind::Sticker)
        .unwrap();
    assert_eq!(out.mime_type, "image/svg+xml");
    assert_eq!((out.width, out.height), (30, 10));
    match out.into_sticker() {
        StickerImage::Svg(s) => assert_eq!(s.aspect(), 3.0),
        StickerImage::Raster(_) => panic!("expected svg sticker"),
    }
}

#[test]
fn acquire_failures_are_asset_errors() {
    let dec = ImageDecoder::default();
    assert!(matches!(
        dec.acquire(b"", UploadKind::BaseImage),
        Err(SlideError::Asset(_))
    ));
    assert!(matches!(
        dec.acquire(b"definitely not an image", UploadKind::BaseImage),
        Err(SlideError::Asset(_))
    ));
    assert!(matches!(
        dec.acquire(b"<svg", UploadKind::Sticker),
        Err(SlideError::Asset(_))
    ));
}

#[test]
fn decode_svg_parse_ok_and_err() {
    let ok = br#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"></svg>"#;
    parse_svg(ok).unwrap();

    let bad = br#"<svg"#;
    assert!(parse_svg(bad).is_err());
}
