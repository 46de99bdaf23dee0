//! Writing results to disk.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot build a file name from '{0}'")]
    InvalidName(String),

    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// File stem for a teacher: alphanumerics, `-` and `_` kept, spaces become `_`.
pub fn file_stem(name: &str) -> Option<String> {
    let stem: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();

    if stem.chars().all(|c| c == '_') {
        None
    } else {
        Some(stem)
    }
}

fn ensure_dir(dir: &Path) -> Result<(), OutputError> {
    fs::create_dir_all(dir).map_err(|e| OutputError::Io {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Write `content` to `<dir>/<stem>.md`, creating `dir` if needed.
pub fn save_markdown(dir: &Path, name: &str, content: &str) -> Result<PathBuf, OutputError> {
    let stem = file_stem(name).ok_or_else(|| OutputError::InvalidName(name.to_string()))?;
    ensure_dir(dir)?;

    let path = dir.join(format!("{stem}.md"));
    fs::write(&path, content).map_err(|e| OutputError::Io {
        path: path.clone(),
        source: e,
    })?;

    info!(teacher = %name, path = %path.display(), "Saved recommendation");
    Ok(path)
}

/// Write `value` as pretty JSON to `<dir>/<file_name>`, creating `dir` if needed.
pub fn save_json<T: Serialize>(dir: &Path, file_name: &str, value: &T) -> Result<PathBuf, OutputError> {
    ensure_dir(dir)?;

    let path = dir.join(file_name);
    let json = serde_json::to_string_pretty(value).map_err(|e| OutputError::Json {
        path: path.clone(),
        source: e,
    })?;
    fs::write(&path, json).map_err(|e| OutputError::Io {
        path: path.clone(),
        source: e,
    })?;

    info!(path = %path.display(), "Saved JSON");
    Ok(path)
}
