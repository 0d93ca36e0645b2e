use super::*;

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn layer_origin_maps_to_anchor() {
    let t = layer_transform(Point::new(30.0, 40.0), 37.0);
    assert!(close(t * Point::ORIGIN, Point::new(30.0, 40.0)));
}

#[test]
fn positive_rotation_turns_x_axis_downward() {
    let t = layer_transform(Point::new(0.0, 0.0), 90.0);
    assert!(close(t * Point::new(10.0, 0.0), Point::new(0.0, 10.0)));
}

#[test]
fn device_offset_is_independent_of_rotation() {
    let t = device_offset(4.0) * layer_transform(Point::new(5.0, 5.0), 90.0);
    assert!(close(t * Point::ORIGIN, Point::new(5.0, 9.0)));
}
