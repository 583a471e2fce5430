//! File-backed preference storage
//!
//! Native hosts keep preferences in a small JSON object on disk. Writes go to
//! a temporary file first and are renamed into place, so a crash mid-write
//! leaves the previous file intact.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::highscores::PreferenceStore;

/// JSON file preference store
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, u32>,
}

impl JsonFileStore {
    /// Open `path`, starting empty when it is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("Corrupt preferences at {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(_) => {
                log::info!("No preferences found, starting fresh");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    fn flush(&self) {
        let json = match serde_json::to_string_pretty(&self.values) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode preferences: {}", e);
                return;
            }
        };
        let tmp = self.path.with_extension("tmp");
        if let Err(e) = std::fs::write(&tmp, json).and_then(|_| std::fs::rename(&tmp, &self.path)) {
            log::warn!("Failed to save preferences to {}: {}", self.path.display(), e);
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn get_int(&self, key: &str, default: u32) -> u32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
        self.flush();
    }
}
