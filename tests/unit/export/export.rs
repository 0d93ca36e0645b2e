use super::*;
use crate::assets::store::PreparedImage;
use crate::fonts::fixtures::fixture_book;
use crate::layers::text::TextField;

fn project(slots: usize) -> Project {
    let mut p = Project::default();
    for _ in 0..slots {
        p.add_slot(PreparedImage::from_premul(4, 3, [90u8, 90, 90, 255].repeat(12)).unwrap());
    }
    p
}

#[test]
fn resolution_tags_and_parsing() {
    assert_eq!(Resolution::TwoK.tag(), "2k");
    assert_eq!(Resolution::FourK.to_string(), "4k");
    assert_eq!(Resolution::Custom(1080).tag(), "1080w");

    assert_eq!("4K".parse::<Resolution>().unwrap(), Resolution::FourK);
    assert_eq!(" 2k ".parse::<Resolution>().unwrap(), Resolution::TwoK);
    assert_eq!("800".parse::<Resolution>().unwrap(), Resolution::Custom(800));
    assert!("0".parse::<Resolution>().is_err());
    assert!("8k".parse::<Resolution>().is_err());
}

#[test]
fn file_names_are_one_based() {
    let c = ExportCoordinator::default().with_prefix("trip");
    assert_eq!(c.file_name(0, Resolution::FourK), "trip-1-4k.png");
    assert_eq!(c.file_name(2, Resolution::Custom(640)), "trip-3-640w.png");
}

#[test]
fn dirty_slot_is_rejected_without_pixels() {
    let mut p = project(1);
    p.add_text_layer(0).unwrap();
    let err = ExportCoordinator::default()
        .export_slot(&p, 0, Resolution::FourK, &mut FontBook::new())
        .unwrap_err();
    assert!(err.is_dirty());
    assert!(err.to_string().contains("bake"));
}

#[test]
fn clean_slot_exports_at_requested_width() {
    let mut p = project(1);
    let id = p.add_text_layer(0).unwrap();
    p.bake(0).unwrap();
    // Draft edits after a bake block export until baked again.
    p.update_text_layer(0, id, TextField::X(20.0)).unwrap();
    let c = ExportCoordinator::default().with_preset_widths(64, 128);
    assert!(c.export_slot(&p, 0, Resolution::TwoK, &mut FontBook::new()).is_err());

    p.bake(0).unwrap();
    let img = c
        .export_slot(&p, 0, Resolution::TwoK, &mut fixture_book())
        .unwrap();
    assert_eq!((img.frame.width, img.frame.height), (64, 48));
    assert_eq!(img.file_name, "slide-1-2k.png");
    assert!(img.encode_png().unwrap().starts_with(b"\x89PNG"));
}

#[test]
fn pending_fonts_block_export() {
    let mut p = project(1);
    p.add_text_layer(0).unwrap();
    p.bake(0).unwrap();
    let mut fonts = fixture_book();
    fonts.mark_pending("Cairo");

    let err = ExportCoordinator::default()
        .export_slot(&p, 0, Resolution::Custom(32), &mut fonts)
        .unwrap_err();
    assert!(matches!(err, SlideError::FontsPending(_)), "{err}");
    assert!(err.to_string().contains("Cairo"));

    fonts.fail("Cairo");
    assert!(
        ExportCoordinator::default()
            .export_slot(&p, 0, Resolution::Custom(32), &mut fonts)
            .is_ok()
    );
}

#[test]
fn export_without_any_face_is_an_error() {
    let mut p = project(1);
    p.add_text_layer(0).unwrap();
    p.bake(0).unwrap();
    let err = ExportCoordinator::default()
        .export_slot(&p, 0, Resolution::Custom(64), &mut FontBook::new())
        .unwrap_err();
    assert!(matches!(err, SlideError::NoFontFace(_)), "{err}");
}

#[test]
fn export_all_isolates_failures() {
    let mut p = project(3);
    p.add_text_layer(1).unwrap();
    let outcomes = ExportCoordinator::default().export_all(
        &p,
        Resolution::Custom(40),
        &mut FontBook::new(),
    );

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].result.is_ok());
    assert!(matches!(
        outcomes[1].result,
        Err(SlideError::Dirty { slot_index: 1 })
    ));
    let third = outcomes[2].result.as_ref().unwrap();
    assert_eq!(third.file_name, "slide-3-40w.png");
    assert_eq!(outcomes[2].resolution, Resolution::Custom(40));
}

#[test]
fn write_to_dir_creates_the_file() {
    let p = project(1);
    let img = ExportCoordinator::default()
        .export_slot(&p, 0, Resolution::Custom(8), &mut FontBook::new())
        .unwrap();
    let dir = std::env::temp_dir().join(format!("slidecraft-export-{}", std::process::id()));
    let path = img.write_to_dir(&dir).unwrap();
    assert!(path.ends_with("slide-1-8w.png"));
    assert!(std::fs::read(&path).unwrap().starts_with(b"\x89PNG"));
    let _ = std::fs::remove_dir_all(&dir);
}
