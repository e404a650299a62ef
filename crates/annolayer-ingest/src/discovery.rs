//! File discovery for annotation folders.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};

/// Lists files in `dir` whose extension equals `extension` (case-insensitive).
///
/// Subdirectories are skipped, so an output folder nested inside the input
/// folder is never picked up. Files are returned in natural order of their
/// file names.
pub fn list_annotation_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let extension = extension.trim_start_matches('.');
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            files.push(path);
        }
    }

    files.sort_by(|a, b| natural_cmp(&file_name(a), &file_name(b)));
    debug!(dir = %dir.display(), count = files.len(), "discovered annotation files");
    Ok(files)
}

/// Creates `dir` (and parents) if it does not exist yet.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| IngestError::DirectoryCreate {
        path: dir.to_path_buf(),
        source: e,
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Compares strings with digit runs ordered by numeric value.
///
/// Text runs compare case-insensitively. Equal numbers with different
/// zero padding put the shorter form first; exact ties fall back to a plain
/// byte comparison so the order is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);
    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Chunk::Number(x)), Some(Chunk::Number(y))) => compare_numbers(x, y),
            (Some(Chunk::Text(x)), Some(Chunk::Text(y))) => compare_text(x, y),
            (Some(Chunk::Number(_)), Some(Chunk::Text(_))) => Ordering::Less,
            (Some(Chunk::Text(_)), Some(Chunk::Number(_))) => Ordering::Greater,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

fn compare_numbers(x: &str, y: &str) -> Ordering {
    let x_digits = x.trim_start_matches('0');
    let y_digits = y.trim_start_matches('0');
    x_digits
        .len()
        .cmp(&y_digits.len())
        .then_with(|| x_digits.cmp(y_digits))
        .then_with(|| x.len().cmp(&y.len()))
}

fn compare_text(x: &str, y: &str) -> Ordering {
    let folded = x.chars().flat_map(char::to_lowercase);
    folded.cmp(y.chars().flat_map(char::to_lowercase))
}

enum Chunk<'a> {
    Number(&'a str),
    Text(&'a str),
}

/// Splits a string into alternating digit and non-digit runs.
struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let numeric = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != numeric)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if numeric {
            Chunk::Number(chunk)
        } else {
            Chunk::Text(chunk)
        })
    }
}
