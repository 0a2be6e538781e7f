/// Decode RFC 2047 encoded words (`=?UTF-8?B?...?=`). Anything without an
/// encoded word is returned as-is.
pub fn decode_mime_words(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    if !text.contains("=?") {
        return text.into_owned();
    }

    // mailparse expects a full "Key: value" header line
    let mut line = b"X: ".to_vec();
    line.extend_from_slice(raw);
    line.extend_from_slice(b"\r\n");

    match mailparse::parse_header(&line) {
        Ok((h, _idx)) => h.get_value(),
        Err(_) => text.into_owned(),
    }
}

/// Flatten a snippet to single-spaced text of at most `max_chars` chars.
pub fn normalize_snippet(s: &str, max_chars: usize) -> String {
    let mut out = String::new();
    let mut room = max_chars;
    for word in s.split_whitespace() {
        if !out.is_empty() {
            if room == 0 {
                break;
            }
            out.push(' ');
            room -= 1;
        }
        out.extend(word.chars().take(room));
        room = room.saturating_sub(word.chars().count());
        if room == 0 {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(decode_mime_words(b"Weekly sync"), "Weekly sync");
    }

    #[test]
    fn snippet_is_capped() {
        let long = "a".repeat(300);
        assert_eq!(normalize_snippet(&long, 10).len(), 10);
        assert_eq!(normalize_snippet("\n\n", 10), "");
    }

    #[test]
    fn snippet_whitespace_is_collapsed() {
        assert_eq!(normalize_snippet("  Hi team,\r\n\n  see   below\t", 240), "Hi team, see below");
        assert_eq!(normalize_snippet("abc def", 4), "abc ");
        assert_eq!(normalize_snippet("héllo wörld", 7), "héllo w");
    }
}
