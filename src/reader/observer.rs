use super::{ReadStats, RecordError};
use std::io;

pub trait ReadObserver {
    fn line_failed(&self, path: &str, line: usize, error: &RecordError);

    // The rest of the file is dropped after this
    fn file_corrupted(&self, path: &str, error: &io::Error);

    // Once per reader
    fn missing_text(&self, text_key: &str);

    fn file_finished(&self, _path: &str, _stats: &ReadStats) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ReadObserver for TracingObserver {
    fn line_failed(&self, path: &str, line: usize, error: &RecordError) {
        tracing::warn!("Error when reading `{}` line {}: {}", path, line, error);
    }

    fn file_corrupted(&self, path: &str, error: &io::Error) {
        tracing::warn!("File `{}` may be corrupted: {}", path, error);
    }

    fn missing_text(&self, text_key: &str) {
        tracing::warn!(
            "Found document without text, skipping. Is your `text_key` (\"{}\") correct?",
            text_key
        );
    }

    fn file_finished(&self, path: &str, stats: &ReadStats) {
        tracing::debug!(
            file = path,
            lines = stats.lines,
            documents = stats.documents,
            failed = stats.failed_lines,
            missing_text = stats.missing_text,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "finished reading file"
        );
    }
}
