//! Best score across sessions
//!
//! Stored as a bare decimal integer so older saves keep loading.

use serde::{Deserialize, Serialize};

use crate::persistence::Storage;

/// Persisted high score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "kisscam-highscore";

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would replace the current best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished round. Returns true when it set a new best.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Load from storage. Missing or unreadable values count as zero.
    pub fn load(storage: &dyn Storage) -> Self {
        let Some(raw) = storage.get(Self::STORAGE_KEY) else {
            log::info!("No high score found, starting fresh");
            return Self::new();
        };
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => {
                let best = value.floor() as u64;
                log::info!("Loaded high score {}", best);
                Self { best }
            }
            Ok(_) => Self::new(),
            Err(e) => {
                log::warn!("Ignoring unreadable high score {:?}: {}", raw, e);
                Self::new()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        match storage.set(Self::STORAGE_KEY, &self.best.to_string()) {
            Ok(()) => log::info!("High score saved ({})", self.best),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
    }
}
