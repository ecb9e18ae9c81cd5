use crate::lines::trim_space;
use regex::Regex;
use std::sync::LazyLock;

static RE_WIKI_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[\s\x1C-\x1F]*={2,}([^=]+?)={2,}[\s\x1C-\x1F]*$").unwrap()
});

pub fn normalize_headings(text: &str) -> String {
    RE_WIKI_HEADING
        .replace_all(text, |caps: &regex::Captures| trim_space(&caps[1]).to_string())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_heading() {
        assert_eq!(normalize_headings("==Title==\nbody"), "Title\nbody");
    }

    #[test]
    fn test_inner_whitespace_trimmed() {
        assert_eq!(normalize_headings("== History ==\ntext"), "History\ntext");
    }

    #[test]
    fn test_subheading_with_indent() {
        assert_eq!(
            normalize_headings("intro\n  === Early life ===  \nmore"),
            "intro\nEarly life\nmore"
        );
    }

    #[test]
    fn test_single_equals_untouched() {
        assert_eq!(normalize_headings("=Not enough=\nbody"), "=Not enough=\nbody");
    }

    #[test]
    fn test_equals_inside_heading_untouched() {
        assert_eq!(normalize_headings("==a=b==\nbody"), "==a=b==\nbody");
    }

    #[test]
    fn test_inline_markers_untouched() {
        let text = "x == y == z\nbody";
        assert_eq!(normalize_headings(text), text);
    }

    #[test]
    fn test_multiple_headings() {
        assert_eq!(
            normalize_headings("Article\n==One==\nfirst\n==Two==\nsecond"),
            "Article\nOne\nfirst\nTwo\nsecond"
        );
    }

    #[test]
    fn test_absorbs_preceding_blank_line() {
        assert_eq!(
            normalize_headings("Article\n\n==Section==\ntext"),
            "Article\nSection\ntext"
        );
    }

    #[test]
    fn test_separator_chars_count_as_padding() {
        assert_eq!(
            normalize_headings("intro\n\u{1F}== Legacy \u{1F}==\u{1F}\nmore"),
            "intro\nLegacy\nmore"
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "==Title==\nbody",
            "Article\n\n== Section ==\ntext.\n=== Sub ===\nmore",
            "=Not enough=\nbody",
        ];
        for input in inputs {
            let once = normalize_headings(input);
            assert_eq!(normalize_headings(&once), once);
        }
    }
}
