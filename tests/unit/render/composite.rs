use super::*;

#[test]
fn over_transparent_src_keeps_dst() {
    let mut dst = vec![10, 20, 30, 255];
    premul_over_in_place(&mut dst, &[0, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![10, 20, 30, 255]);
}

#[test]
fn over_opaque_src_replaces_dst() {
    let mut dst = vec![10, 20, 30, 255];
    premul_over_in_place(&mut dst, &[200, 100, 0, 255]).unwrap();
    assert_eq!(dst, vec![200, 100, 0, 255]);
}

#[test]
fn over_half_black_darkens_white() {
    let mut dst = vec![255, 255, 255, 255];
    premul_over_in_place(&mut dst, &[0, 0, 0, 153]).unwrap();
    assert_eq!(dst, vec![102, 102, 102, 255]);
}

#[test]
fn over_rejects_mismatched_buffers() {
    let mut dst = vec![0; 8];
    assert!(premul_over_in_place(&mut dst, &[0; 4]).is_err());
}

#[test]
fn color_matrix_identity_is_identity() {
    #[rustfmt::skip]
    let id = [
        1.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 1.0, 0.0,
    ];
    let mut px = vec![10, 20, 30, 40, 200, 100, 50, 255];
    let before = px.clone();
    color_matrix_rgba8_premul_in_place(&mut px, id);
    assert_eq!(px, before);
}

#[test]
fn unpremultiply_restores_straight_color() {
    let out = unpremultiply_rgba8(&[64, 0, 32, 128, 0, 0, 0, 0]);
    assert_eq!(out, vec![128, 0, 64, 128, 0, 0, 0, 0]);
}

#[test]
fn fill_writes_every_pixel() {
    let mut px = vec![0; 12];
    fill_rgba8(&mut px, [1, 2, 3, 4]);
    assert_eq!(px, vec![1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
}
