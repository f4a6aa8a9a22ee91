//! Snapshot files and the query clock.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("system clock is before the unix epoch")]
    Clock,
}

/// Reads and decodes a JSON snapshot from `path`.
pub fn load_snapshot<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let raw = fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = decode_snapshot(&raw).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded snapshot from {}", path.display());
    Ok(snapshot)
}

pub fn decode_snapshot<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(raw)
}

/// The query time: `explicit` if given, otherwise the system clock.
pub fn resolve_now(explicit: Option<i64>) -> Result<i64, InputError> {
    if let Some(now) = explicit {
        return Ok(now);
    }
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| InputError::Clock)?;
    i64::try_from(elapsed.as_secs()).map_err(|_| InputError::Clock)
}
