use super::*;

const RED_SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#ff0000"/></svg>"##;

#[test]
fn raster_size_rounds_up_and_caps() {
    assert_eq!(svg_raster_size(10.2, 3.0).unwrap(), (11, 3));
    assert_eq!(svg_raster_size(0.3, 0.3).unwrap(), (1, 1));
    assert!(svg_raster_size(0.0, 3.0).is_err());
    assert!(svg_raster_size(20_000.0, 3.0).is_err());
}

#[test]
fn rasterizes_stretched_to_requested_size() {
    let tree = usvg::Tree::from_data(RED_SQUARE.as_bytes(), &usvg::Options::default()).unwrap();
    let px = rasterize_svg_to_premul_rgba8(&tree, 20, 5).unwrap();
    assert_eq!(px.len(), 20 * 5 * 4);
    // Interior pixel is opaque red.
    let idx = (2 * 20 + 10) * 4;
    assert_eq!(&px[idx..idx + 4], &[255, 0, 0, 255]);
}
