use super::*;

fn per_char(px: f64) -> impl FnMut(&str) -> f64 {
    move |s: &str| s.chars().count() as f64 * px
}

#[test]
fn empty_and_blank_content_yield_one_empty_line() {
    assert_eq!(wrap_text("", per_char(10.0), 100.0), vec![String::new()]);
    assert_eq!(wrap_text(" \n\t ", per_char(10.0), 100.0), vec![String::new()]);
}

#[test]
fn boundary_is_strict() {
    // "Hi there friend" is exactly 300 px: not strictly below 300, so it wraps.
    assert_eq!(
        wrap_text("Hi there friend", per_char(20.0), 300.0),
        vec!["Hi there".to_string(), "friend".to_string()]
    );
    assert_eq!(
        wrap_text("Hi there friend", per_char(20.0), 300.1),
        vec!["Hi there friend".to_string()]
    );
}

#[test]
fn overwide_word_sits_alone() {
    let lines = wrap_text("a incomprehensibilities b", per_char(10.0), 50.0);
    assert_eq!(lines, vec!["a", "incomprehensibilities", "b"]);
}

#[test]
fn whitespace_runs_collapse() {
    let lines = wrap_text("  one \n two   three ", per_char(1.0), 100.0);
    assert_eq!(lines, vec!["one two three"]);
}

#[test]
fn never_zero_lines_and_lines_fit_unless_single_word() {
    let text = "the quick brown fox jumps over the lazy dog again and again";
    for max in [1.0, 30.0, 55.0, 80.0, 200.0, 10_000.0] {
        let lines = wrap_text(text, per_char(5.0), max);
        assert!(!lines.is_empty());
        for line in &lines {
            let w = line.chars().count() as f64 * 5.0;
            assert!(w <= max || !line.contains(' '), "{line:?} too wide for {max}");
        }
        assert_eq!(lines.join(" "), text);
    }
}
