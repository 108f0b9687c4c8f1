//! Numeric and text helpers shared by the analysis stages.

/// Round to three decimal places.
///
/// Goes through decimal formatting of the exact binary value, so ties are
/// decided on the stored `f64` rather than on a scaled intermediate.
#[must_use]
pub fn round3(value: f64) -> f64 {
    round_to(value, 3)
}

/// Round to `places` decimal places (see [`round3`]).
#[must_use]
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// Split text into sentences after `.`, `!` or `?` when followed by
/// whitespace. The terminator stays with its sentence and the separating
/// whitespace is dropped.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let end = idx + ch.len_utf8();
        let mut next_start = end;
        while let Some(&(ws_idx, ws)) = chars.peek() {
            if !ws.is_whitespace() {
                break;
            }
            next_start = ws_idx + ws.len_utf8();
            chars.next();
        }
        if next_start > end {
            sentences.push(&text[start..end]);
            start = next_start;
        }
    }

    sentences.push(&text[start..]);
    sentences
}

/// Greedy word wrap to `width` characters per line. Words longer than the
/// width get a line of their own.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };

        if needed <= width || line.is_empty() {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
