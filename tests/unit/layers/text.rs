use super::*;

fn layer() -> TextLayer {
    TextLayer::new(LayerId(1), 600.0)
}

#[test]
fn defaults_are_centered_and_valid() {
    let l = layer();
    assert_eq!((l.x, l.y), (50.0, 50.0));
    assert_eq!(l.rotation, 0.0);
    assert_eq!(l.max_width, 80.0);
    assert!(l.visible);
    assert_eq!(l.font_size, 40.0);
    assert_eq!(l.font_weight, 700);
    assert_eq!(l.line_height, 1.1);
    assert_eq!(l.content, DEFAULT_TEXT_CONTENT);
    l.validate().unwrap();
}

#[test]
fn apply_replaces_exactly_one_field() {
    let mut l = layer();
    let before = l.clone();
    l.apply(TextField::Rotation(15.0)).unwrap();
    assert_ne!(l, before);
    assert_eq!(l.rotation, 15.0);

    let mut expected = before.clone();
    expected.rotation = 15.0;
    assert_eq!(l, expected);
}

#[test]
fn apply_rejects_out_of_range_and_leaves_layer_untouched() {
    let mut l = layer();
    let before = l.clone();
    assert!(l.apply(TextField::X(100.5)).is_err());
    assert!(l.apply(TextField::MaxWidth(-1.0)).is_err());
    assert!(l.apply(TextField::FontSize(0.0)).is_err());
    assert!(l.apply(TextField::LineHeight(3.0)).is_err());
    assert!(l.apply(TextField::FontWeight(0)).is_err());
    assert!(l.apply(TextField::FontFamily("  ".into())).is_err());
    assert!(
        l.apply(TextField::Position {
            x: 10.0,
            y: f64::NAN
        })
        .is_err()
    );
    assert_eq!(l, before);
}

#[test]
fn pasted_copy_gets_new_id_and_offset() {
    let mut l = layer();
    l.x = 99.0;
    l.y = 10.0;
    let p = l.pasted_as(LayerId(9));
    assert_eq!(p.id, LayerId(9));
    assert_eq!(p.x, 100.0);
    assert_eq!(p.y, 12.0);
    assert_eq!(p.content, l.content);
}

#[test]
fn text_field_json_shape() {
    let f: TextField =
        serde_json::from_value(serde_json::json!({"field": "font_size", "value": 64.0})).unwrap();
    assert_eq!(f, TextField::FontSize(64.0));
}
