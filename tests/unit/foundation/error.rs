use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SlideError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(SlideError::asset("x").to_string().contains("asset error:"));
    assert!(
        SlideError::missing_asset("x")
            .to_string()
            .contains("missing asset:")
    );
    assert!(
        SlideError::fonts_pending("Cairo")
            .to_string()
            .contains("fonts still loading: Cairo")
    );
    assert!(
        SlideError::no_font_face("Cairo")
            .to_string()
            .contains("'Cairo'")
    );
    assert!(SlideError::render("x").to_string().contains("render error:"));
    assert!(
        SlideError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn dirty_names_the_slot_and_the_fix() {
    let err = SlideError::Dirty { slot_index: 2 };
    let msg = err.to_string();
    assert!(msg.contains("slot 2"));
    assert!(msg.contains("bake"));
    assert!(err.is_dirty());
    assert!(!SlideError::validation("x").is_dirty());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SlideError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
