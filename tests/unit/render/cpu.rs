use super::*;

#[test]
fn surface_dims_reject_empty_and_oversized() {
    assert_eq!(surface_dims(4096, 2304).unwrap(), (4096, 2304));
    assert!(surface_dims(0, 10).is_err());
    assert!(surface_dims(70_000, 10).is_err());
}

#[test]
fn empty_pass_is_transparent() {
    let px = paint_pass(3, 2, |_| {});
    assert_eq!(px.len(), 3 * 2 * 4);
    assert!(px.iter().all(|&b| b == 0));
}

#[test]
fn opaque_image_fills_target_rect() {
    let img = PreparedImage::from_premul(2, 2, [0u8, 0, 255, 255].repeat(4)).unwrap();
    let paint = image_paint(&img).unwrap();
    let px = paint_pass(8, 8, |ctx| {
        fill_image(
            ctx,
            paint,
            img.width,
            img.height,
            image_to_rect(img.width, img.height, Rect::new(0.0, 0.0, 8.0, 8.0)),
        );
    });
    let idx = (4 * 8 + 4) * 4;
    assert_eq!(&px[idx..idx + 4], &[0, 0, 255, 255]);
}

#[test]
fn image_to_rect_maps_corners() {
    let t = image_to_rect(10, 20, Rect::new(5.0, 5.0, 25.0, 15.0));
    assert_eq!(t * kurbo::Point::new(0.0, 0.0), kurbo::Point::new(5.0, 5.0));
    assert_eq!(t * kurbo::Point::new(10.0, 20.0), kurbo::Point::new(25.0, 15.0));
}

#[test]
fn pixmap_rejects_length_mismatch() {
    assert!(rgba_premul_to_image(&[0; 12], 2, 2).is_err());
}

#[test]
fn fill_line_paints_glyphs_in_the_given_color() {
    let mut fonts = crate::fonts::fixtures::fixture_book();
    let req = crate::fonts::FontRequest {
        family: "Cairo",
        weight: 400,
        font_px: 32.0,
        letter_spacing_px: 0.0,
    };
    let line = fonts.shape_line(&req, "II", Rgba8::WHITE).unwrap();
    let px = paint_pass(64, 48, |ctx| {
        fill_line(
            ctx,
            &line,
            Rgba8::rgb(255, 0, 0),
            Affine::translate((8.0, 8.0)),
        );
    });

    let inked: Vec<_> = px.chunks_exact(4).filter(|p| p[3] > 0).collect();
    assert!(!inked.is_empty());
    assert!(inked.iter().all(|p| p[1] == 0 && p[2] == 0 && p[0] == p[3]));
    // Nothing lands left of the line origin.
    assert!((0..48).all(|y| px[(y * 64) * 4 + 3] == 0));
}
