use clap::ValueEnum;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Infer,
    Gzip,
    Zstd,
    None,
}

impl Compression {
    pub fn for_path(self, path: &Path) -> Compression {
        if self != Compression::Infer {
            return self;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") | Some("gzip") => Compression::Gzip,
            Some("zst") | Some("zstd") => Compression::Zstd,
            _ => Compression::None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReaderConfig {
    #[serde(default = "default_data_folder")]
    pub data_folder: PathBuf,

    #[serde(default)]
    pub paths_file: Option<PathBuf>,

    #[serde(default)]
    pub compression: Compression,

    #[serde(default)]
    pub limit: Option<usize>,

    #[serde(default)]
    pub skip: usize,

    #[serde(default)]
    pub file_progress: bool,

    #[serde(default)]
    pub doc_progress: bool,

    #[serde(default = "default_text_key")]
    pub text_key: String,

    #[serde(default = "default_id_key")]
    pub id_key: String,

    #[serde(default)]
    pub default_metadata: Map<String, Value>,

    #[serde(default = "default_recursive")]
    pub recursive: bool,

    #[serde(default)]
    pub glob_pattern: Option<String>,

    #[serde(default)]
    pub shuffle_files: bool,
}

fn default_data_folder() -> PathBuf {
    PathBuf::from(".")
}
fn default_text_key() -> String {
    "text".to_string()
}
fn default_id_key() -> String {
    "id".to_string()
}
fn default_recursive() -> bool {
    true
}

impl ReaderConfig {
    pub fn new(data_folder: impl Into<PathBuf>) -> Self {
        ReaderConfig {
            data_folder: data_folder.into(),
            ..ReaderConfig::default()
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            data_folder: default_data_folder(),
            paths_file: None,
            compression: Compression::Infer,
            limit: None,
            skip: 0,
            file_progress: false,
            doc_progress: false,
            text_key: default_text_key(),
            id_key: default_id_key(),
            default_metadata: Map::new(),
            recursive: true,
            glob_pattern: None,
            shuffle_files: false,
        }
    }
}
