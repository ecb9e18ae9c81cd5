pub mod adapter;
pub mod config;
pub mod document;
pub mod extract;
pub mod headings;
pub mod lines;
pub mod reader;
pub mod references;
pub mod years;

use adapter::{AdaptError, Adapter};
use document::Document;
use reader::ReaderError;
use std::io::{self, Write};
use thiserror::Error;

pub fn clean_text(text: &str) -> String {
    references::truncate_references(&headings::normalize_headings(text))
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Adapt(#[from] AdaptError),
    #[error("cannot write record: {0}")]
    Write(#[from] io::Error),
    #[error("cannot serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub read: usize,
    pub filtered_out: usize,
    pub written: usize,
    pub reader_errors: usize,
}

// Reader errors are counted and skipped; an adapter error ends the run
pub fn run<I, A, F, W>(documents: I, adapter: &A, keep: F, mut out: W) -> Result<RunSummary, RunError>
where
    I: IntoIterator<Item = Result<Document, ReaderError>>,
    A: Adapter + ?Sized,
    F: Fn(&Document) -> bool,
    W: Write,
{
    let mut summary = RunSummary::default();

    for item in documents {
        let document = match item {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable input");
                summary.reader_errors += 1;
                continue;
            }
        };
        summary.read += 1;

        if !keep(&document) {
            summary.filtered_out += 1;
            continue;
        }

        let record = adapter.adapt(&document)?;
        serde_json::to_writer(&mut out, &record)?;
        out.write_all(b"\n")?;
        summary.written += 1;
    }

    out.flush()?;
    Ok(summary)
}
