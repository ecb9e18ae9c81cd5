use super::RecordError;
use crate::config::ReaderConfig;
use crate::document::Document;
use serde_json::{Map, Value};

// (decoded object, relative path, 0-based line) -> {text, id, metadata}
pub type RecordAdapter =
    Box<dyn Fn(Map<String, Value>, &str, usize) -> Result<Map<String, Value>, RecordError>>;

pub struct RecordBuilder {
    text_key: String,
    id_key: String,
    default_metadata: Map<String, Value>,
    adapter: Option<RecordAdapter>,
}

impl RecordBuilder {
    pub fn from_config(config: &ReaderConfig) -> Self {
        RecordBuilder {
            text_key: config.text_key.clone(),
            id_key: config.id_key.clone(),
            default_metadata: config.default_metadata.clone(),
            adapter: None,
        }
    }

    pub fn set_adapter(&mut self, adapter: RecordAdapter) {
        self.adapter = Some(adapter);
    }

    pub fn text_key(&self) -> &str {
        &self.text_key
    }

    pub fn default_adapter(&self, mut data: Map<String, Value>, path: &str, line: usize) -> Map<String, Value> {
        let mut metadata = match data.remove("metadata") {
            None => Map::new(),
            Some(Value::String(raw)) => match serde_json::from_str::<Value>(&raw) {
                Ok(parsed) => wrap_metadata(parsed),
                Err(_) => wrap_metadata(Value::String(raw)),
            },
            Some(other) => wrap_metadata(other),
        };

        let text = data
            .remove(&self.text_key)
            .unwrap_or_else(|| Value::String(String::new()));
        let id = data
            .remove(&self.id_key)
            .unwrap_or_else(|| Value::String(format!("{}/{}", path, line)));
        metadata.extend(data);

        let mut out = Map::new();
        out.insert("text".to_string(), text);
        out.insert("id".to_string(), id);
        out.insert("metadata".to_string(), Value::Object(metadata));
        out
    }

    // Ok(None): no text, skip the record
    pub fn build(&self, data: Value, path: &str, line: usize) -> Result<Option<Document>, RecordError> {
        let Value::Object(data) = data else {
            return Err(RecordError::NotAnObject(json_kind(&data)));
        };

        let mut parsed = match &self.adapter {
            Some(adapter) => adapter(data, path, line)?,
            None => self.default_adapter(data, path, line),
        };

        let text = match parsed.remove("text") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(text)) if text.is_empty() => return Ok(None),
            Some(Value::String(text)) => text,
            Some(_) => return Err(RecordError::NotAString { key: "text" }),
        };

        let id = match parsed.remove("id") {
            None | Some(Value::Null) => format!("{}/{}", path, line),
            Some(Value::String(id)) => id,
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => return Err(RecordError::NotAString { key: "id" }),
        };

        let metadata = match parsed.remove("metadata") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(m)) => m,
            Some(other) => return Err(RecordError::MetadataNotObject(json_kind(&other))),
        };

        let mut merged = self.default_metadata.clone();
        merged.extend(metadata);

        Ok(Some(Document::new(id, text).with_metadata(merged)))
    }
}

fn wrap_metadata(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(m) => m,
        other => {
            let mut m = Map::new();
            m.insert("metadata".to_string(), other);
            m
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
