/// Splits `text` into pieces of at most `max_bytes` bytes each.
///
/// Cuts prefer the end of a sentence, then a word boundary, and fall back to
/// a hard cut on a character boundary. Pieces are trimmed and empty pieces
/// are dropped, so joining them loses only whitespace at the cut points.
pub fn split_for_synthesis(text: &str, max_bytes: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut rest = text.trim();

    while rest.len() > max_bytes {
        let window_end = floor_char_boundary(rest, max_bytes);
        let cut = if window_end == 0 {
            rest.chars().next().map(char::len_utf8).unwrap_or(rest.len())
        } else {
            sentence_break(rest, window_end)
                .or_else(|| word_break(rest, window_end))
                .unwrap_or(window_end)
        };

        let (head, tail) = rest.split_at(cut);
        let head = head.trim();
        if !head.is_empty() {
            pieces.push(head);
        }
        rest = tail.trim_start();
    }

    if !rest.is_empty() {
        pieces.push(rest);
    }

    pieces
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    let mut index = index.min(s.len());
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn sentence_break(text: &str, limit: usize) -> Option<usize> {
    text[..limit]
        .char_indices()
        .rev()
        .filter(|(_, c)| matches!(c, '.' | '!' | '?' | '\n'))
        .map(|(i, c)| (i + c.len_utf8(), c))
        .find(|&(end, c)| c == '\n' || text[end..].starts_with(char::is_whitespace))
        .map(|(end, _)| end)
}

fn word_break(text: &str, limit: usize) -> Option<usize> {
    if text[limit..].starts_with(char::is_whitespace) {
        return Some(limit);
    }
    text[..limit].rfind(char::is_whitespace).filter(|&i| i > 0)
}
