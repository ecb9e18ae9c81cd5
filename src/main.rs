use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use wikiclean::adapter::WikiAdapter;
use wikiclean::config::{Compression, ReaderConfig};
use wikiclean::document::Document;
use wikiclean::reader::LenientReader;

#[derive(Parser)]
#[command(name = "wikiclean", about = "Clean Wikipedia-style JSONL dumps into flat records")]
struct Cli {
    /// Folder holding the input JSONL files (default: from config or ".")
    data_folder: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// File listing the inputs to read, relative to the data folder
    #[arg(long)]
    paths_file: Option<PathBuf>,

    /// Input compression (default: from config or infer)
    #[arg(long, value_enum)]
    compression: Option<Compression>,

    /// Stop after this many documents
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Skip this many documents first
    #[arg(long)]
    skip: Option<usize>,

    /// Only read files matching this glob (relative to the data folder)
    #[arg(long)]
    glob: Option<String>,

    /// Do not descend into subfolders
    #[arg(long)]
    no_recursive: bool,

    /// Shuffle file order before reading
    #[arg(long)]
    shuffle: bool,

    /// Field holding the document text
    #[arg(long)]
    text_key: Option<String>,

    /// Field holding the document id
    #[arg(long)]
    id_key: Option<String>,

    /// Show file and document progress
    #[arg(long)]
    progress: bool,

    /// Keep only documents whose metadata matches, e.g. meta.pile_set_name=Wikipedia (en)
    #[arg(long = "where", value_name = "PATH=VALUE")]
    filters: Vec<String>,
}

struct MetadataFilter {
    path: String,
    expected: String,
}

impl MetadataFilter {
    fn parse(raw: &str) -> Result<Self> {
        let Some((path, expected)) = raw.split_once('=') else {
            bail!("invalid --where `{}`: expected PATH=VALUE", raw);
        };
        Ok(MetadataFilter {
            path: path.trim().to_string(),
            expected: expected.trim().trim_matches('"').to_string(),
        })
    }

    fn matches(&self, document: &Document) -> bool {
        match document.metadata_at(&self.path) {
            Some(Value::String(s)) => *s == self.expected,
            Some(other) => other.to_string() == self.expected,
            None => false,
        }
    }
}

fn load_config(path: &Path) -> Result<ReaderConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config JSON in {}", path.display()))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Load config
    let mut config = if let Some(ref config_path) = cli.config {
        load_config(config_path)?
    } else {
        let defaults = ["wikiclean.config.json", "config/wikiclean.config.json"];
        let mut loaded = None;
        for p in &defaults {
            let path = PathBuf::from(p);
            if path.is_file() {
                loaded = Some(load_config(&path)?);
                break;
            }
        }
        loaded.unwrap_or_default()
    };

    // CLI overrides
    if let Some(folder) = cli.data_folder {
        config.data_folder = folder;
    }
    if let Some(paths_file) = cli.paths_file {
        config.paths_file = Some(paths_file);
    }
    if let Some(compression) = cli.compression {
        config.compression = compression;
    }
    if cli.limit.is_some() {
        config.limit = cli.limit;
    }
    if let Some(skip) = cli.skip {
        config.skip = skip;
    }
    if cli.glob.is_some() {
        config.glob_pattern = cli.glob;
    }
    if cli.no_recursive {
        config.recursive = false;
    }
    if cli.shuffle {
        config.shuffle_files = true;
    }
    if let Some(key) = cli.text_key {
        config.text_key = key;
    }
    if let Some(key) = cli.id_key {
        config.id_key = key;
    }
    if cli.progress {
        config.file_progress = true;
        config.doc_progress = true;
    }

    let filters = cli
        .filters
        .iter()
        .map(|raw| MetadataFilter::parse(raw))
        .collect::<Result<Vec<_>>>()?;

    let reader = LenientReader::new(config);
    let documents = reader.documents().context("cannot list input files")?;
    let keep = |doc: &Document| filters.iter().all(|f| f.matches(doc));

    let out: Box<dyn Write> = match cli.output {
        Some(ref path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let summary = wikiclean::run(documents, &WikiAdapter, keep, out)?;

    tracing::info!(
        read = summary.read,
        filtered_out = summary.filtered_out,
        written = summary.written,
        reader_errors = summary.reader_errors,
        "done"
    );
    Ok(())
}
