mod decode;
mod files;
mod observer;
mod record;

pub use decode::{JsonLineDecoder, LineDecoder};
pub use files::{list_files, open, read_record_line};
pub use observer::{ReadObserver, TracingObserver};
pub use record::{RecordAdapter, RecordBuilder};

use crate::config::ReaderConfig;
use crate::document::Document;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Map, Value};
use std::cell::Cell;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
    #[error("field `{key}` must be a string")]
    NotAString { key: &'static str },
    #[error("metadata must be an object, found {0}")]
    MetadataNotObject(&'static str),
    #[error("{0}")]
    Adapter(String),
}

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("cannot open `{path}`: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("error while reading `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot list files under `{path}`: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("cannot read paths file `{path}`: {source}")]
    PathsFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadStats {
    pub lines: usize,
    pub documents: usize,
    pub failed_lines: usize,
    pub missing_text: usize,
    // decode + build only, not I/O
    pub elapsed: Duration,
}

pub struct LenientReader<D = JsonLineDecoder> {
    config: ReaderConfig,
    decoder: D,
    records: RecordBuilder,
    observer: Box<dyn ReadObserver>,
    warned_missing_text: Cell<bool>,
}

impl LenientReader<JsonLineDecoder> {
    pub fn new(config: ReaderConfig) -> Self {
        LenientReader {
            records: RecordBuilder::from_config(&config),
            config,
            decoder: JsonLineDecoder,
            observer: Box::new(TracingObserver),
            warned_missing_text: Cell::new(false),
        }
    }
}

impl<D: LineDecoder> LenientReader<D> {
    pub fn with_decoder<E: LineDecoder>(self, decoder: E) -> LenientReader<E> {
        LenientReader {
            config: self.config,
            decoder,
            records: self.records,
            observer: self.observer,
            warned_missing_text: self.warned_missing_text,
        }
    }

    pub fn with_adapter<F>(mut self, adapter: F) -> Self
    where
        F: Fn(Map<String, Value>, &str, usize) -> Result<Map<String, Value>, RecordError> + 'static,
    {
        self.records.set_adapter(Box::new(adapter));
        self
    }

    pub fn with_observer(mut self, observer: impl ReadObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn list_files(&self) -> Result<Vec<PathBuf>, ReaderError> {
        list_files(&self.config)
    }

    pub fn read_file(&self, relative: impl AsRef<Path>) -> Result<FileDocuments<'_, D>, ReaderError> {
        let relative = relative.as_ref();
        let full = self.config.data_folder.join(relative);
        let lines = open(&full, self.config.compression).map_err(|source| ReaderError::Open {
            path: full.clone(),
            source,
        })?;

        Ok(FileDocuments {
            reader: self,
            path: relative.to_string_lossy().into_owned(),
            full_path: full,
            lines,
            buf: Vec::new(),
            next_line: 0,
            stats: ReadStats::default(),
            done: false,
        })
    }

    pub fn documents(&self) -> Result<Documents<'_, D>, ReaderError> {
        let files = self.list_files()?;

        let file_bar = self.config.file_progress.then(|| {
            let bar = ProgressBar::new(files.len() as u64);
            if let Ok(style) = ProgressStyle::with_template(
                "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({per_sec})",
            ) {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        });
        let doc_bar = self.config.doc_progress.then(|| {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {pos} documents ({per_sec})") {
                bar.set_style(style);
            }
            bar
        });

        Ok(Documents {
            reader: self,
            files: files.into_iter(),
            current: None,
            to_skip: self.config.skip,
            remaining: self.config.limit,
            file_bar,
            doc_bar,
        })
    }

    fn note_missing_text(&self) {
        if !self.warned_missing_text.replace(true) {
            self.observer.missing_text(self.records.text_key());
        }
    }
}

pub struct FileDocuments<'r, D> {
    reader: &'r LenientReader<D>,
    path: String,
    full_path: PathBuf,
    lines: Box<dyn BufRead>,
    buf: Vec<u8>,
    next_line: usize,
    stats: ReadStats,
    done: bool,
}

impl<D> FileDocuments<'_, D> {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn stats(&self) -> &ReadStats {
        &self.stats
    }

    fn finish(&mut self) {
        if self.done {
            return;
        }
        self.done = true;
        self.lines = Box::new(io::empty());
        self.reader.observer.file_finished(&self.path, &self.stats);
    }
}

impl<D: LineDecoder> Iterator for FileDocuments<'_, D> {
    type Item = Result<Document, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader;

        while !self.done {
            self.buf.clear();
            match read_record_line(self.lines.as_mut(), &mut self.buf) {
                Ok(0) => self.finish(),
                Ok(_) => {
                    let text = match std::str::from_utf8(&self.buf) {
                        Ok(text) => text,
                        Err(e) => {
                            let error = io::Error::new(io::ErrorKind::InvalidData, e);
                            reader.observer.file_corrupted(&self.path, &error);
                            self.finish();
                            continue;
                        }
                    };
                    let line = self.next_line;
                    self.next_line += 1;
                    self.stats.lines += 1;

                    let started = Instant::now();
                    let built = reader
                        .decoder
                        .decode(text)
                        .and_then(|value| reader.records.build(value, &self.path, line));
                    self.stats.elapsed += started.elapsed();

                    match built {
                        Ok(Some(document)) => {
                            self.stats.documents += 1;
                            return Some(Ok(document));
                        }
                        Ok(None) => {
                            self.stats.missing_text += 1;
                            reader.note_missing_text();
                        }
                        Err(e) => {
                            self.stats.failed_lines += 1;
                            reader.observer.line_failed(&self.path, line, &e);
                        }
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    reader.observer.file_corrupted(&self.path, &e);
                    self.finish();
                }
                Err(source) => {
                    self.finish();
                    return Some(Err(ReaderError::Read {
                        path: self.full_path.clone(),
                        source,
                    }));
                }
            }
        }
        None
    }
}

// skip and limit count across file boundaries
pub struct Documents<'r, D> {
    reader: &'r LenientReader<D>,
    files: std::vec::IntoIter<PathBuf>,
    current: Option<FileDocuments<'r, D>>,
    to_skip: usize,
    remaining: Option<usize>,
    file_bar: Option<ProgressBar>,
    doc_bar: Option<ProgressBar>,
}

impl<D> Documents<'_, D> {
    fn file_done(&mut self) {
        self.current = None;
        if let Some(bar) = &self.file_bar {
            bar.inc(1);
        }
    }

    fn finish_progress(&mut self) {
        self.current = None;
        if let Some(bar) = self.file_bar.take() {
            bar.finish_and_clear();
        }
        if let Some(bar) = self.doc_bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl<D: LineDecoder> Iterator for Documents<'_, D> {
    type Item = Result<Document, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining == Some(0) {
                self.finish_progress();
                return None;
            }

            let step = match self.current.as_mut() {
                Some(current) => current.next(),
                None => {
                    let Some(path) = self.files.next() else {
                        self.finish_progress();
                        return None;
                    };
                    match self.reader.read_file(&path) {
                        Ok(docs) => self.current = Some(docs),
                        Err(e) => {
                            self.file_done();
                            return Some(Err(e));
                        }
                    }
                    continue;
                }
            };

            match step {
                None => self.file_done(),
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok(document)) => {
                    if self.to_skip > 0 {
                        self.to_skip -= 1;
                        continue;
                    }
                    if let Some(n) = self.remaining.as_mut() {
                        *n -= 1;
                    }
                    if let Some(bar) = &self.doc_bar {
                        bar.inc(1);
                    }
                    return Some(Ok(document));
                }
            }
        }
    }
}
