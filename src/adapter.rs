use crate::clean_text;
use crate::document::{Document, OutputRecord};
use crate::extract::extract_lead_paragraph;
use crate::lines::{count_words, split_lines, trim_space};
use crate::years::contains_western_year;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdaptError {
    #[error("document `{id}` has no text after normalization")]
    EmptyDocument { id: String },
}

pub trait Adapter {
    fn adapt(&self, document: &Document) -> Result<OutputRecord, AdaptError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WikiAdapter;

impl Adapter for WikiAdapter {
    fn adapt(&self, document: &Document) -> Result<OutputRecord, AdaptError> {
        adapt_document(document)
    }
}

pub fn adapt_document(document: &Document) -> Result<OutputRecord, AdaptError> {
    let full_text = clean_text(&document.text);
    let lines = split_lines(&full_text);

    let Some((first, rest)) = lines.split_first() else {
        return Err(AdaptError::EmptyDocument {
            id: document.id.clone(),
        });
    };

    let title = trim_space(first).to_string();
    let body_start = rest
        .iter()
        .position(|l| !trim_space(l).is_empty())
        .unwrap_or(rest.len());
    let body_text = trim_space(&rest[body_start..].join("\n")).to_string();

    let extracted_text = extract_lead_paragraph(&body_text);

    Ok(OutputRecord {
        title,
        text_word_count: count_words(&body_text),
        contains_western_year: contains_western_year(&body_text),
        extracted_text_length: extracted_text.chars().count(),
        extracted_text_word_count: count_words(&extracted_text),
        extracted_contains_western_year: contains_western_year(&extracted_text),
        text: body_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapt(text: &str) -> OutputRecord {
        WikiAdapter.adapt(&Document::new("doc", text)).unwrap()
    }

    #[test]
    fn test_empty_document_rejected() {
        let err = adapt_document(&Document::new("empty-1", "")).unwrap_err();
        assert!(matches!(err, AdaptError::EmptyDocument { ref id } if id == "empty-1"));
        assert!(err.to_string().contains("empty-1"));
    }

    #[test]
    fn test_title_and_body() {
        let record = adapt("Title\n\nBody ends here.");
        assert_eq!(record.title, "Title");
        assert_eq!(record.text, "Body ends here.");
        assert_eq!(record.text_word_count, 3);
        assert_eq!(record.extracted_text_length, "Body ends here.".len());
        assert_eq!(record.extracted_text_word_count, 3);
        assert!(!record.contains_western_year);
    }

    #[test]
    fn test_title_only() {
        let record = adapt("  Lonely title  ");
        assert_eq!(record.title, "Lonely title");
        assert_eq!(record.text, "");
        assert_eq!(record.text_word_count, 0);
        assert_eq!(record.extracted_text_length, 0);
    }

    #[test]
    fn test_newline_only_is_not_empty() {
        let record = adapt("\n");
        assert_eq!(record.title, "");
        assert_eq!(record.text, "");
    }

    #[test]
    fn test_full_article() {
        let text = "Ada Lovelace\n\n\
                    Ada Lovelace was a mathematician.\n\
                    She was born in 1815.\n\
                    ==Legacy==\n\
                    Her notes are famous.\n\
                    ==References==\n\
                    * Some book, 1990";
        let record = adapt(text);
        assert_eq!(record.title, "Ada Lovelace");
        assert_eq!(
            record.text,
            "Ada Lovelace was a mathematician.\nShe was born in 1815.\nLegacy\nHer notes are famous."
        );
        assert!(record.contains_western_year);
        assert!(record.extracted_contains_western_year);
        assert_eq!(record.text_word_count, 15);
        assert_eq!(record.extracted_text_word_count, 15);
    }

    #[test]
    fn test_year_only_outside_extracted_text() {
        let text = "Topic\nIntro sentence.\n* list a\n* list b\nFounded 1901.";
        let record = adapt(text);
        assert!(record.contains_western_year);
        assert!(!record.extracted_contains_western_year);
        assert_eq!(record.extracted_text_word_count, 2);
        assert!(record.extracted_text_word_count < record.text_word_count);
    }

    #[test]
    fn test_extracted_length_counts_chars() {
        let record = adapt("Zürich\nZürich liegt am See.");
        assert_eq!(record.extracted_text_length, "Zürich liegt am See.".chars().count());
        assert!(record.extracted_text_length < record.text.len());
    }

    #[test]
    fn test_separator_chars_trimmed_like_whitespace() {
        let record = adapt("\u{1F}Title\u{1F}\n\u{1F}\nBody\u{1F}text.\u{1F}");
        assert_eq!(record.title, "Title");
        assert_eq!(record.text, "Body\u{1F}text.");
        assert_eq!(record.text_word_count, 2);
    }

    #[test]
    fn test_headings_and_references_cleaned() {
        let record = adapt("Title\n== History ==\nFounded.\n==See also==\n* x");
        assert_eq!(record.text, "History\nFounded.");
    }

    #[test]
    fn test_extracted_equals_full_for_pure_prose() {
        let record = adapt("T\nOne.\nTwo.");
        assert_eq!(record.extracted_text_word_count, record.text_word_count);
    }
}
