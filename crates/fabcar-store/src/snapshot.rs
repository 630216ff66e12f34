//! World-state snapshot files.
//!
//! A snapshot is a JSON object mapping each key to its value as UTF-8 text.
//! Car records are JSON themselves, so snapshot files stay human-readable.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Load a snapshot file. A missing file is an empty world state.
pub fn load_snapshot(path: &Path) -> StoreResult<BTreeMap<String, Vec<u8>>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let raw = fs::read(path)?;
    let text: BTreeMap<String, String> =
        serde_json::from_slice(&raw).map_err(|e| StoreError::Serialization(e.to_string()))?;
    debug!(path = %path.display(), keys = text.len(), "snapshot loaded");
    Ok(text.into_iter().map(|(k, v)| (k, v.into_bytes())).collect())
}

/// Write a snapshot file, replacing any existing one.
///
/// The file is written beside its destination and renamed into place.
pub fn save_snapshot(path: &Path, entries: &BTreeMap<String, Vec<u8>>) -> StoreResult<()> {
    let mut text = BTreeMap::new();
    for (key, value) in entries {
        let value = String::from_utf8(value.clone()).map_err(|_| {
            StoreError::Serialization(format!("value for key {key} is not UTF-8"))
        })?;
        text.insert(key.as_str(), value);
    }
    let json =
        serde_json::to_vec_pretty(&text).map_err(|e| StoreError::Serialization(e.to_string()))?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    debug!(path = %path.display(), keys = entries.len(), "snapshot saved");
    Ok(())
}
