use super::*;
use crate::assets::store::AssetState;
use crate::fonts::fixtures::fixture_book;
use crate::foundation::core::LayerId;
use crate::grade::GradePreset;
use crate::layers::text::TextField;
use crate::render::backend::ShadowStyle;

fn solid(w: u32, h: u32, px: [u8; 4]) -> PreparedImage {
    PreparedImage::from_premul(w, h, px.repeat((w * h) as usize)).unwrap()
}

fn input<'a>(
    base: &'a PreparedImage,
    grade: &'a ColorGrade,
    stickers: &'a [StickerLayer],
    texts: &'a [TextLayer],
    target_width: u32,
) -> RenderInput<'a> {
    RenderInput {
        base,
        grade,
        stickers,
        texts,
        target_width,
    }
}

#[test]
fn output_height_keeps_aspect_with_rounding() {
    let base = solid(1000, 750, [0, 0, 0, 255]);
    assert_eq!(output_size(&base, 2048).unwrap(), (2048, 1536));
    let odd = solid(3, 2, [0, 0, 0, 255]);
    assert_eq!(output_size(&odd, 5).unwrap(), (5, 3));
    let wide = solid(100, 1, [0, 0, 0, 255]);
    assert_eq!(output_size(&wide, 10).unwrap(), (10, 1));
    assert!(output_size(&base, 0).is_err());
}

#[test]
fn base_fills_the_frame() {
    let base = solid(4, 2, [200, 10, 10, 255]);
    let grade = ColorGrade::default();
    let out = render_slot(
        &input(&base, &grade, &[], &[], 16),
        &mut FontBook::new(),
        &RenderOpts::default(),
    )
    .unwrap();
    assert_eq!((out.frame.width, out.frame.height), (16, 8));
    assert!(out.frame.premultiplied);
    assert_eq!(out.frame.pixel(8, 4), Some([200, 10, 10, 255]));
}

#[test]
fn grade_applies_to_base_only() {
    let base = solid(2, 2, [200, 10, 10, 255]);
    let grade = ColorGrade::new(GradePreset::BlackAndWhite, 100.0).unwrap();
    let sticker = StickerLayer {
        scale: 50.0,
        ..StickerLayer::new(
            StickerId(1),
            AssetState::Ready(StickerImage::Raster(solid(2, 2, [0, 0, 255, 255]))),
        )
    };
    let stickers = [sticker];
    let out = render_slot(
        &input(&base, &grade, &stickers, &[], 20),
        &mut FontBook::new(),
        &RenderOpts::default(),
    )
    .unwrap();

    let [r, g, b, a] = out.frame.pixel(1, 1).unwrap();
    assert_eq!(a, 255);
    assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1, "base should be gray: {r},{g},{b}");
    // The sticker sits on top and keeps its color.
    assert_eq!(out.frame.pixel(10, 10), Some([0, 0, 255, 255]));
}

#[test]
fn sticker_rects_are_reported_in_paint_order() {
    let base = solid(2, 2, [0, 0, 0, 255]);
    let grade = ColorGrade::default();
    let img = || AssetState::Ready(StickerImage::Raster(solid(2, 1, [255, 255, 255, 255])));
    let a = StickerLayer {
        scale: 50.0,
        ..StickerLayer::new(StickerId(1), img())
    };
    let b = StickerLayer {
        x: 25.0,
        y: 25.0,
        scale: 10.0,
        ..StickerLayer::new(StickerId(2), img())
    };
    let stickers = [a, b];
    let out = render_slot(
        &input(&base, &grade, &stickers, &[], 100),
        &mut FontBook::new(),
        &RenderOpts::default(),
    )
    .unwrap();

    assert_eq!(out.stickers.len(), 2);
    assert_eq!(out.stickers[0].id, StickerId(1));
    assert_eq!(out.stickers[0].rect, Rect::new(25.0, 37.5, 75.0, 62.5));
    assert_eq!(out.stickers[1].rect, Rect::new(20.0, 22.5, 30.0, 27.5));
}

#[test]
fn pending_sticker_fails_the_render() {
    let base = solid(2, 2, [0, 0, 0, 255]);
    let grade = ColorGrade::default();
    let stickers = [StickerLayer::new(StickerId(7), AssetState::Pending)];
    let err = render_slot(
        &input(&base, &grade, &stickers, &[], 10),
        &mut FontBook::new(),
        &RenderOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SlideError::MissingAsset(_)), "{err}");
}

#[test]
fn failed_sticker_is_an_asset_error() {
    let base = solid(2, 2, [0, 0, 0, 255]);
    let grade = ColorGrade::default();
    let stickers = [StickerLayer::new(
        StickerId(7),
        AssetState::Failed("truncated png".to_owned()),
    )];
    let err = render_slot(
        &input(&base, &grade, &stickers, &[], 10),
        &mut FontBook::new(),
        &RenderOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SlideError::Asset(_)), "{err}");
}

#[test]
fn hidden_layers_are_not_laid_out() {
    let base = solid(10, 10, [0, 0, 0, 255]);
    let grade = ColorGrade::default();
    let shown = TextLayer::new(LayerId(1), 600.0);
    let hidden = TextLayer {
        visible: false,
        ..TextLayer::new(LayerId(2), 600.0)
    };
    let texts = [shown, hidden];
    let out = render_slot(
        &input(&base, &grade, &[], &texts, 600),
        &mut fixture_book(),
        &RenderOpts::default(),
    )
    .unwrap();
    assert_eq!(out.texts.len(), 1);
    assert_eq!(out.texts[0].layer, LayerId(1));
}

#[test]
fn invalid_layer_is_rejected_before_painting() {
    let base = solid(10, 10, [0, 0, 0, 255]);
    let grade = ColorGrade::default();
    let bad = TextLayer {
        x: 140.0,
        ..TextLayer::new(LayerId(1), 600.0)
    };
    let texts = [bad];
    let err = render_slot(
        &input(&base, &grade, &[], &texts, 100),
        &mut FontBook::new(),
        &RenderOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SlideError::Validation(_)), "{err}");
}

#[test]
fn clear_color_shows_through_transparent_base() {
    let base = solid(2, 2, [0, 0, 0, 0]);
    let grade = ColorGrade::default();
    let out = render_slot(
        &input(&base, &grade, &[], &[], 4),
        &mut FontBook::new(),
        &RenderOpts::default().with_clear_rgba(Some([0, 255, 0, 255])),
    )
    .unwrap();
    assert_eq!(out.frame.pixel(2, 2), Some([0, 255, 0, 255]));
}

#[test]
fn rendering_is_deterministic() {
    let base = solid(3, 2, [40, 90, 160, 255]);
    let grade = ColorGrade::new(GradePreset::WarmSun, 140.0).unwrap();
    let texts = [TextLayer::new(LayerId(1), 600.0)];
    let render = || {
        render_slot(
            &input(&base, &grade, &[], &texts, 120),
            &mut fixture_book(),
            &RenderOpts::default(),
        )
        .unwrap()
    };
    let (a, b) = (render(), render());
    assert_eq!(a.frame, b.frame);
    assert_eq!(a.texts, b.texts);
}

fn text_layer(content: &str) -> TextLayer {
    let mut layer = TextLayer::new(LayerId(1), 600.0);
    layer.apply(TextField::Content(content.to_owned())).unwrap();
    layer
}

fn no_shadow() -> RenderOpts {
    RenderOpts::default().with_shadow(ShadowStyle {
        color: Rgba8::rgba(0, 0, 0, 0),
        ..ShadowStyle::default()
    })
}

#[test]
fn text_without_any_face_fails_instead_of_vanishing() {
    let base = solid(4, 4, [0, 0, 0, 255]);
    let grade = ColorGrade::default();
    let texts = [text_layer("HELLO WORLD")];
    let err = render_slot(
        &input(&base, &grade, &[], &texts, 600),
        &mut FontBook::new(),
        &RenderOpts::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SlideError::NoFontFace(ref f) if f == "Cairo"), "{err}");

    // Blank and hidden layers need no face.
    let blank = [text_layer("   ")];
    assert!(
        render_slot(
            &input(&base, &grade, &[], &blank, 60),
            &mut FontBook::new(),
            &RenderOpts::default(),
        )
        .is_ok()
    );
    let hidden = [TextLayer {
        visible: false,
        ..text_layer("HELLO")
    }];
    assert!(
        render_slot(
            &input(&base, &grade, &[], &hidden, 60),
            &mut FontBook::new(),
            &RenderOpts::default(),
        )
        .is_ok()
    );
}

#[test]
fn visible_text_draws_glyphs() {
    let base = solid(4, 4, [0, 0, 0, 255]);
    let grade = ColorGrade::default();
    let texts = [text_layer("HELLO WORLD")];
    let mut fonts = fixture_book();
    let with_text = render_slot(
        &input(&base, &grade, &[], &texts, 600),
        &mut fonts,
        &no_shadow(),
    )
    .unwrap();
    let without = render_slot(
        &input(&base, &grade, &[], &[], 600),
        &mut fonts,
        &no_shadow(),
    )
    .unwrap();

    assert_ne!(with_text.frame, without.frame);
    // White glyph ink around the layer center, nothing near the corners.
    let lit = |x0: u32, y0: u32, x1: u32, y1: u32| {
        (y0..y1).any(|y| (x0..x1).any(|x| with_text.frame.pixel(x, y).unwrap()[0] > 200))
    };
    assert!(lit(150, 270, 450, 330));
    assert!(!lit(0, 0, 100, 100));
}

#[test]
fn shadow_falls_below_the_text() {
    let base = solid(4, 4, [128, 128, 128, 255]);
    let grade = ColorGrade::default();
    let texts = [text_layer("HOH")];
    let mut fonts = fixture_book();
    let shadowed = render_slot(
        &input(&base, &grade, &[], &texts, 600),
        &mut fonts,
        &RenderOpts::default(),
    )
    .unwrap();
    let plain = render_slot(
        &input(&base, &grade, &[], &texts, 600),
        &mut fonts,
        &no_shadow(),
    )
    .unwrap();

    let darkened = |frame: &FrameRGBA| {
        frame
            .data
            .chunks_exact(4)
            .filter(|px| px[0] < 120)
            .count()
    };
    assert_eq!(darkened(&plain.frame), 0);
    assert!(darkened(&shadowed.frame) > 0);

    // The blur stays near the text: the frame corners keep the base color.
    assert_eq!(shadowed.frame.pixel(0, 0), Some([128, 128, 128, 255]));
    assert_eq!(shadowed.frame.pixel(599, 599), Some([128, 128, 128, 255]));
}
