use super::*;

#[test]
fn mul_div255_matches_rounded_product() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(0, 255), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(255, 153), 153);
    assert_eq!(mul_div255_u16(100, 128), 50);
}

#[test]
fn percent_helpers() {
    assert_eq!(clamp_percent(-3.0), 0.0);
    assert_eq!(clamp_percent(140.0), 100.0);
    assert_eq!(clamp_percent(f64::NAN), 0.0);
    assert_eq!(clamp_percent(42.5), 42.5);

    assert!(is_percent(0.0));
    assert!(is_percent(100.0));
    assert!(!is_percent(100.01));
    assert!(!is_percent(f64::INFINITY));
}
