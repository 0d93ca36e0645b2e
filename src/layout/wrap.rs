/// Greedy word wrap.
///
/// Words are separated by any run of whitespace (newlines included). A word joins the current
/// line only while `measure(current + " " + word)` stays strictly below `max_width`; otherwise
/// the line is closed and the word starts a new one. A single word wider than `max_width`
/// occupies a line on its own. Empty or all-whitespace input yields exactly one empty line.
pub fn wrap_text(text: &str, mut measure: impl FnMut(&str) -> f64, max_width: f64) -> Vec<String> {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return vec![String::new()];
    };

    let mut lines = Vec::new();
    let mut current = first.to_owned();
    for word in words {
        let candidate = format!("{current} {word}");
        if measure(&candidate) < max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_owned()));
        }
    }
    lines.push(current);
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
