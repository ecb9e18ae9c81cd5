// A trailing terminator adds no empty line; "" has no lines at all
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let end = match c {
            '\r' => {
                if let Some(&(_, '\n')) = chars.peek() {
                    chars.next();
                    i + 2
                } else {
                    i + 1
                }
            }
            '\n' | '\u{0B}' | '\u{0C}' | '\u{1C}' | '\u{1D}' | '\u{1E}' | '\u{85}'
            | '\u{2028}' | '\u{2029}' => i + c.len_utf8(),
            _ => continue,
        };
        out.push(&text[start..i]);
        start = end;
    }

    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

// Unicode whitespace plus the information separators U+001C..U+001F
pub fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1C}'..='\u{1F}').contains(&c)
}

pub fn trim_space(text: &str) -> &str {
    text.trim_matches(is_space)
}

pub fn trim_end_space(text: &str) -> &str {
    text.trim_end_matches(is_space)
}

pub fn count_words(text: &str) -> usize {
    text.split(is_space).filter(|w| !w.is_empty()).count()
}
