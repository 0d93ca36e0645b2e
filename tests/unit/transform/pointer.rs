use super::*;

#[test]
fn pointer_is_relative_to_bounds_origin() {
    let bounds = Rect::new(100.0, 50.0, 300.0, 150.0);
    assert_eq!(
        pointer_to_percent(Point::new(200.0, 100.0), bounds).unwrap(),
        (50.0, 50.0)
    );
    assert_eq!(
        pointer_to_percent(Point::new(150.0, 75.0), bounds).unwrap(),
        (25.0, 25.0)
    );
}

#[test]
fn pointer_outside_bounds_is_clamped() {
    let bounds = Rect::new(0.0, 0.0, 200.0, 100.0);
    assert_eq!(
        pointer_to_percent(Point::new(-40.0, 500.0), bounds).unwrap(),
        (0.0, 100.0)
    );
}

#[test]
fn degenerate_bounds_are_rejected() {
    assert!(pointer_to_percent(Point::ORIGIN, Rect::new(0.0, 0.0, 0.0, 10.0)).is_err());
}

#[test]
fn percent_to_pointer_inverts_inside_bounds() {
    let bounds = Rect::new(10.0, 20.0, 110.0, 220.0);
    let p = percent_to_pointer(30.0, 40.0, bounds);
    assert_eq!(p, Point::new(40.0, 100.0));
    assert_eq!(pointer_to_percent(p, bounds).unwrap(), (30.0, 40.0));
}
