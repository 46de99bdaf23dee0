//! Teacher lists passed with `--teachers-file`.
//!
//! `.txt` files hold one name per line; `.csv` files hold a name in the
//! first column of each record. Blank names are skipped.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("cannot read teachers file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse teachers file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported teachers file type {0} (use .txt or .csv)")]
    UnsupportedExtension(PathBuf),

    #[error("no teacher names found in {0}")]
    Empty(PathBuf),
}

/// Load a non-empty roster from a `.txt` or `.csv` file.
pub fn load(path: &Path) -> Result<Vec<String>, RosterError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let names = match extension.as_deref() {
        Some("txt") => read_txt(path)?,
        Some("csv") => read_csv(path)?,
        _ => return Err(RosterError::UnsupportedExtension(path.to_path_buf())),
    };

    if names.is_empty() {
        return Err(RosterError::Empty(path.to_path_buf()));
    }

    info!(path = %path.display(), teachers = names.len(), "Loaded teachers file");
    Ok(names)
}

fn read_txt(path: &Path) -> Result<Vec<String>, RosterError> {
    let content = fs::read_to_string(path).map_err(|e| RosterError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect())
}

fn read_csv(path: &Path) -> Result<Vec<String>, RosterError> {
    let csv_error = |e: csv::Error| RosterError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut names = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if let Some(name) = record.get(0).map(str::trim).filter(|n| !n.is_empty()) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}
