use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Document {
            id: id.into(),
            text: text.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    // dotted path, e.g. `meta.pile_set_name`
    pub fn metadata_at(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.metadata.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub title: String,
    pub text: String,
    pub text_word_count: usize,
    pub extracted_text_length: usize,
    pub extracted_text_word_count: usize,
    pub contains_western_year: bool,
    pub extracted_contains_western_year: bool,
}
