use crate::lines::trim_end_space;
use regex::Regex;
use std::sync::LazyLock;

static RE_TRAILING_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"References|External links|See also|Category:|Notes").unwrap()
});

// Keywords on the title line are ignored
pub fn truncate_references(text: &str) -> String {
    let Some(first_break) = text.find('\n') else {
        return text.to_string();
    };
    let body_start = first_break + 1;

    match RE_TRAILING_SECTION.find_at(text, body_start) {
        Some(m) => trim_end_space(&text[..m.start()]).to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_references() {
        assert_eq!(
            truncate_references("Title\nIntro text.\nReferences\nfoo"),
            "Title\nIntro text."
        );
    }

    #[test]
    fn test_single_line_never_truncated() {
        assert_eq!(truncate_references("References only line"), "References only line");
    }

    #[test]
    fn test_keyword_in_title_ignored() {
        assert_eq!(
            truncate_references("Notes on a Scandal\nA novel.\nMore text."),
            "Notes on a Scandal\nA novel.\nMore text."
        );
    }

    #[test]
    fn test_earliest_keyword_wins() {
        assert_eq!(
            truncate_references("T\nBody.\n\nSee also\nx\nReferences\ny"),
            "T\nBody."
        );
    }

    #[test]
    fn test_mid_line_match() {
        assert_eq!(
            truncate_references("T\nSee the Notes below.\nrest"),
            "T\nSee the"
        );
    }

    #[test]
    fn test_case_sensitive() {
        let text = "T\nreferences and notes are lowercase.";
        assert_eq!(truncate_references(text), text);
    }

    #[test]
    fn test_category_marker() {
        assert_eq!(truncate_references("T\nBody.\nCategory:Births"), "T\nBody.");
    }

    #[test]
    fn test_keyword_right_after_title() {
        assert_eq!(truncate_references("Title\nReferences"), "Title");
    }

    #[test]
    fn test_separator_chars_trimmed_at_cut() {
        assert_eq!(truncate_references("T\nBody.\u{1F} \nReferences"), "T\nBody.");
    }

    #[test]
    fn test_no_keyword_unchanged() {
        let text = "Title\nJust body text.\n";
        assert_eq!(truncate_references(text), text);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Title\nIntro text.\nReferences\nfoo",
            "References only line",
            "T\nBody.\n\nExternal links\n* a",
        ];
        for input in inputs {
            let once = truncate_references(input);
            assert_eq!(truncate_references(&once), once);
        }
    }
}
