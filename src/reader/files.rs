use super::ReaderError;
use crate::config::{Compression, ReaderConfig};
use flate2::read::MultiGzDecoder;
use glob::Pattern;
use rand::seq::SliceRandom;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// Paths are relative to the data folder. A paths file keeps its own order.
pub fn list_files(config: &ReaderConfig) -> Result<Vec<PathBuf>, ReaderError> {
    let mut files = match &config.paths_file {
        Some(paths_file) => read_paths_file(paths_file)?,
        None => walk(&config.data_folder, config.recursive)?,
    };

    if let Some(pattern) = &config.glob_pattern {
        let pat = Pattern::new(pattern).map_err(|source| ReaderError::Glob {
            pattern: pattern.clone(),
            source,
        })?;
        files.retain(|p| pat.matches_path(p));
    }

    if config.shuffle_files {
        files.shuffle(&mut rand::thread_rng());
    }
    Ok(files)
}

fn walk(root: &Path, recursive: bool) -> Result<Vec<PathBuf>, ReaderError> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut out = Vec::new();

    for entry in WalkDir::new(root).max_depth(max_depth) {
        let entry = entry.map_err(|source| ReaderError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        out.push(relative.to_path_buf());
    }

    out.sort();
    Ok(out)
}

fn read_paths_file(path: &Path) -> Result<Vec<PathBuf>, ReaderError> {
    let text = fs::read_to_string(path).map_err(|source| ReaderError::PathsFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .collect())
}

pub fn open(path: &Path, compression: Compression) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    Ok(match compression.for_path(path) {
        Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        Compression::Zstd => Box::new(BufReader::new(zstd::stream::read::Decoder::new(file)?)),
        Compression::Infer | Compression::None => Box::new(BufReader::new(file)),
    })
}

// Appends one line to `line` without its terminator. `\n`, `\r\n` and a bare
// `\r` all end a line. Returns the bytes consumed, 0 at end of input.
pub fn read_record_line(input: &mut dyn BufRead, line: &mut Vec<u8>) -> io::Result<usize> {
    let mut consumed = 0;
    loop {
        let available = match input.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            return Ok(consumed);
        }

        match available.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) => {
                let terminator = available[i];
                line.extend_from_slice(&available[..i]);
                input.consume(i + 1);
                consumed += i + 1;

                // \r\n may straddle two buffer fills
                if terminator == b'\r' && input.fill_buf()?.first() == Some(&b'\n') {
                    input.consume(1);
                    consumed += 1;
                }
                return Ok(consumed);
            }
            None => {
                let n = available.len();
                line.extend_from_slice(available);
                input.consume(n);
                consumed += n;
            }
        }
    }
}
