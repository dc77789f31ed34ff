//! High score persistence
//!
//! The simulation reads the high score synchronously and saves fire-and-forget.
//! Stores keep an in-memory cache so reads never touch storage, and storage
//! failures degrade to a zero score on load or a logged warning on save.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Persistence collaborator for the best cumulative score
pub trait HighScoreStore {
    /// Cached high score (0 when nothing was stored)
    fn load_high_score(&self) -> u64;
    /// Record a new high score. Must not fail or block the caller.
    fn save_high_score(&mut self, score: u64);
}

/// Process-lifetime store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    cached: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        Self { cached: score }
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&self) -> u64 {
        self.cached
    }

    fn save_high_score(&mut self, score: u64) {
        self.cached = score;
    }
}

/// On-disk record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// JSON file store, read once at construction
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    cached: u64,
}

impl JsonFileStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let cached = std::fs::read_to_string(&path)
            .ok()
            .and_then(|json| serde_json::from_str::<HighScoreRecord>(&json).ok())
            .map(|record| record.high_score);

        match cached {
            Some(score) => log::info!("Loaded high score {} from {}", score, path.display()),
            None => log::info!("No high score found at {}, starting fresh", path.display()),
        }

        Self {
            path,
            cached: cached.unwrap_or(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonFileStore {
    fn load_high_score(&self) -> u64 {
        self.cached
    }

    fn save_high_score(&mut self, score: u64) {
        self.cached = score;
        let record = HighScoreRecord { high_score: score };
        let result = serde_json::to_string(&record)
            .map_err(std::io::Error::from)
            .and_then(|json| std::fs::write(&self.path, json));
        match result {
            Ok(()) => log::info!("High score {} saved", score),
            Err(e) => log::warn!("Failed to save high score to {}: {}", self.path.display(), e),
        }
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load_high_score(&self) -> u64 {
        (**self).load_high_score()
    }

    fn save_high_score(&mut self, score: u64) {
        (**self).save_high_score(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tide-leap-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load_high_score(), 0);
        store.save_high_score(1234);
        assert_eq!(store.load_high_score(), 1234);
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = temp_path("round-trip");
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileStore::open(&path);
        assert_eq!(store.load_high_score(), 0);
        store.save_high_score(4321);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.load_high_score(), 4321);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_reads_zero() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{not json").expect("write temp file");
        assert_eq!(JsonFileStore::open(&path).load_high_score(), 0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unwritable_path_is_swallowed() {
        let path = std::env::temp_dir()
            .join("tide-leap-missing-dir")
            .join("nested")
            .join("score.json");
        let mut store = JsonFileStore::open(&path);
        store.save_high_score(99);
        assert_eq!(store.load_high_score(), 99);
    }
}
