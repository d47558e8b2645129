// Word wrapping for node labels and tooltips

pub const ELLIPSIS: &str = "...";

/// Truncates and word-wraps `text`.
///
/// A missing text is treated as empty. When `truncate_at` is set the text is
/// cut to that many characters and `"..."` is appended before wrapping.
///
/// Wrapping walks the text left to right. At each position, unless the rest
/// of the text is a final run of at most `width` non-newline characters, the
/// longest run of `1..=width` non-newline characters that is followed by a
/// whitespace character is kept and that whitespace character is replaced
/// with `separator`. Words are never split; a word longer than `width` is
/// left on its own line.
pub fn wrap_text(
    text: Option<&str>,
    width: usize,
    separator: &str,
    truncate_at: Option<usize>,
) -> String {
    let text = text.unwrap_or_default();
    let source: String = match truncate_at {
        Some(limit) => text.chars().take(limit).chain(ELLIPSIS.chars()).collect(),
        None => text.to_string(),
    };

    if width == 0 {
        return source;
    }

    let chars: Vec<char> = source.chars().collect();
    let mut wrapped = String::with_capacity(source.len());
    let mut pos = 0;

    while pos < chars.len() {
        match break_at(&chars, pos, width) {
            Some(run) => {
                wrapped.extend(&chars[pos..pos + run]);
                wrapped.push_str(separator);
                // skip the whitespace the separator replaced
                pos += run + 1;
            }
            None => {
                wrapped.push(chars[pos]);
                pos += 1;
            }
        }
    }

    wrapped
}

/// Wraps at `width` with newlines, no truncation.
pub fn wrap_lines(text: &str, width: usize) -> String {
    wrap_text(Some(text), width, "\n", None)
}

/// Length of the run starting at `pos` that should be followed by a break.
fn break_at(chars: &[char], pos: usize, width: usize) -> Option<usize> {
    let rest = &chars[pos..];
    let line_len = rest.iter().take_while(|c| **c != '\n').count();

    // the tail already fits on one line
    if line_len == rest.len() && rest.len() <= width {
        return None;
    }

    (1..=line_len.min(width))
        .rev()
        .find(|&run| rest.get(run).is_some_and(|c| c.is_whitespace()))
}
