//! High score tracking
//!
//! The best score is a single integer kept in a key-value preference store
//! under `HIGH_SCORE`, durable across sessions when the store is.

use std::collections::HashMap;

use crate::consts::HIGH_SCORE_KEY;

/// Durable integer key-value storage supplied by the host
pub trait PreferenceStore {
    /// Read `key`, or `default` when it was never written
    fn get_int(&self, key: &str, default: u32) -> u32;

    /// Write `key`. Implementations log their own failures.
    fn set_int(&mut self, key: &str, value: u32);
}

/// Volatile store (tests, hosts without storage)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get_int(&self, key: &str, default: u32) -> u32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
    }
}

/// The persisted best score
pub struct HighScore {
    store: Box<dyn PreferenceStore>,
    best: u32,
}

impl HighScore {
    /// Load the best score from `store`
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let best = store.get_int(HIGH_SCORE_KEY, 0);
        log::info!("Loaded high score {}", best);
        Self { store, best }
    }

    /// Current best
    pub fn best(&self) -> u32 {
        self.best
    }

    /// Check if a score beats the stored best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record a final score. Persists and returns true only for a new best.
    pub fn submit(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        self.store.set_int(HIGH_SCORE_KEY, score);
        log::info!("New high score {}", score);
        true
    }
}
