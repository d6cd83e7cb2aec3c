use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Paths of the flat JSON documents inside the data directory.
#[derive(Debug, Clone)]
pub(crate) struct DataFiles {
    pub users: PathBuf,
    pub bookings: PathBuf,
    pub sessions: PathBuf,
}

impl DataFiles {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            users: data_dir.join("users.json"),
            bookings: data_dir.join("bookings.json"),
            sessions: data_dir.join("training_sessions.json"),
        }
    }
}

/// Read a whole document, initializing a missing file with an empty
/// collection so later runs find it in place.
pub(crate) fn read_or_init<T>(path: &Path) -> Result<Vec<T>>
where
    T: DeserializeOwned + Serialize,
{
    if !path.exists() {
        write_document(path, &Vec::<T>::new())?;
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))
}

pub(crate) fn serialize_document<T: Serialize>(records: &[T]) -> Result<String> {
    serde_json::to_string_pretty(records).context("failed to serialize document")
}

pub(crate) fn write_raw(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

pub(crate) fn write_document<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    write_raw(path, &serialize_document(records)?)
}
