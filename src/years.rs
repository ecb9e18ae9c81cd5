use regex::Regex;
use std::sync::LazyLock;

// A 3-4 digit run bounded by non-digits or the ends of the text
static RE_WESTERN_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\D)\d{3,4}(?:\D|$)").unwrap());

pub fn contains_western_year(text: &str) -> bool {
    RE_WESTERN_YEAR.is_match(text)
}
