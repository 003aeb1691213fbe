/// Greedy word wrap against a pixel-width measure.
///
/// The content is trimmed, split on explicit newlines (blank lines survive as empty strings),
/// then words are packed while `measure(trial_line) <= max_width`. A single word wider than
/// `max_width` gets a line of its own.
pub fn wrap_lines<F>(content: &str, max_width: f32, mut measure: F) -> Vec<String>
where
    F: FnMut(&str) -> f32,
{
    let mut lines = Vec::new();
    for paragraph in content.trim().split('\n') {
        let mut current = String::new();
        let mut any_word = false;
        for word in paragraph.split([' ', '\t', '\r']).filter(|w| !w.is_empty()) {
            any_word = true;
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let trial = format!("{current} {word}");
            if measure(&trial) <= max_width {
                current = trial;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if any_word {
            lines.push(current);
        } else {
            lines.push(String::new());
        }
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
