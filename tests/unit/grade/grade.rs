use super::*;

fn close3(a: [f64; 3], b: [f64; 3]) -> bool {
    a.iter().zip(&b).all(|(x, y)| (x - y).abs() < 1e-6)
}

#[test]
fn original_at_neutral_sharpness_is_identity() {
    let g = ColorGrade::default();
    assert!(g.filters().is_empty());
    assert!(g.is_identity());

    let mut px = vec![10, 20, 30, 40, 200, 100, 50, 255];
    let before = px.clone();
    g.apply_rgba8_premul(&mut px);
    assert_eq!(px, before);
}

#[test]
fn every_non_original_preset_changes_color() {
    for p in GradePreset::ALL {
        let g = ColorGrade::new(p, NEUTRAL_SHARPNESS).unwrap();
        assert_eq!(g.is_identity(), p == GradePreset::Original, "{}", p.name());
    }
}

#[test]
fn preset_lookup_is_case_insensitive() {
    assert_eq!(
        GradePreset::from_name("warm sun").unwrap(),
        GradePreset::WarmSun
    );
    assert_eq!(
        GradePreset::from_name(" BLACK & WHITE ").unwrap(),
        GradePreset::BlackAndWhite
    );
    assert!(matches!(
        GradePreset::from_name("Teal & Orange"),
        Err(SlideError::Validation(_))
    ));
    for p in GradePreset::ALL {
        assert_eq!(GradePreset::from_name(p.name()).unwrap(), p);
    }
}

#[test]
fn preset_serializes_as_display_name() {
    let g = ColorGrade::new(GradePreset::NeonNight, 120.0).unwrap();
    let v = serde_json::to_value(g).unwrap();
    assert_eq!(v["preset"], "Neon Night");
    let back: ColorGrade = serde_json::from_value(v).unwrap();
    assert_eq!(back, g);

    let bad = serde_json::from_value::<ColorGrade>(serde_json::json!({"preset": "nope"}));
    assert!(bad.is_err());
}

#[test]
fn sharpness_appends_contrast_then_brightness() {
    let g = ColorGrade::new(GradePreset::Original, 150.0).unwrap();
    match g.filters().as_slice() {
        [FilterOp::Contrast(c), FilterOp::Brightness(b)] => {
            assert!((c - 1.1).abs() < 1e-12);
            assert!((b - 1.025).abs() < 1e-12);
        }
        other => panic!("unexpected chain {other:?}"),
    }
    assert!(ColorGrade::new(GradePreset::Original, 200.5).is_err());
    assert!(ColorGrade::new(GradePreset::Original, -1.0).is_err());
}

#[test]
fn grayscale_maps_to_luma() {
    let m = FilterOp::Grayscale(1.0).matrix();
    let out = m.apply_rgb([1.0, 0.0, 0.0]);
    assert!(close3(out, [0.2126, 0.2126, 0.2126]));
}

#[test]
fn contrast_pivots_on_mid_grey() {
    let m = FilterOp::Contrast(1.3).matrix();
    assert!(close3(m.apply_rgb([0.5, 0.5, 0.5]), [0.5, 0.5, 0.5]));
    assert!(close3(m.apply_rgb([1.0, 0.0, 0.5]), [1.15, -0.15, 0.5]));
}

#[test]
fn composition_applies_filters_in_order() {
    // brightness then contrast differs from contrast then brightness.
    let bc = FilterOp::Brightness(2.0)
        .matrix()
        .then(FilterOp::Contrast(0.5).matrix());
    let cb = FilterOp::Contrast(0.5)
        .matrix()
        .then(FilterOp::Brightness(2.0).matrix());
    let x = [0.2, 0.2, 0.2];
    assert!(close3(bc.apply_rgb(x), [0.45, 0.45, 0.45]));
    assert!(close3(cb.apply_rgb(x), [0.7, 0.7, 0.7]));
}

#[test]
fn hue_rotate_full_turn_is_identity() {
    assert!(FilterOp::HueRotate(360.0).matrix().is_identity());
    assert!(!FilterOp::HueRotate(180.0).matrix().is_identity());
}

#[test]
fn grading_keeps_alpha_and_transparent_pixels() {
    let g = ColorGrade::new(GradePreset::BlackAndWhite, NEUTRAL_SHARPNESS).unwrap();
    let mut px = vec![255, 0, 0, 255, 0, 0, 0, 0];
    g.apply_rgba8_premul(&mut px);
    assert_eq!(px[3], 255);
    assert_eq!(px[0], px[1]);
    assert_eq!(px[1], px[2]);
    assert_eq!(&px[4..8], &[0, 0, 0, 0]);
}
