use super::RecordError;
use serde_json::Value;

pub trait LineDecoder {
    fn decode(&self, line: &str) -> Result<Value, RecordError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLineDecoder;

impl LineDecoder for JsonLineDecoder {
    fn decode(&self, line: &str) -> Result<Value, RecordError> {
        Ok(serde_json::from_str(line)?)
    }
}
