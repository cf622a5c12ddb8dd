//! Best score persisted between runs
//!
//! The engine never touches storage; the host loads the stored value when it
//! starts and records each final score, which is written back only when it
//! beats the stored one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u32,
}

pub struct HighScoreStore {
    path: PathBuf,
    high_score: u32,
}

impl HighScoreStore {
    /// Load the stored high score; a missing file counts as zero
    pub fn load(path: &Path) -> Result<Self> {
        let high_score = if path.exists() {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read high score from {:?}", path))?;
            let record: HighScoreRecord = serde_json::from_str(&json)
                .with_context(|| format!("Failed to parse high score file {:?}", path))?;
            record.high_score
        } else {
            0
        };

        Ok(Self {
            path: path.to_path_buf(),
            high_score,
        })
    }

    /// Like [`HighScoreStore::load`], but a broken file is logged and reset
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(store) => store,
            Err(e) => {
                warn!("Ignoring high score file: {:#}", e);
                Self {
                    path: path.to_path_buf(),
                    high_score: 0,
                }
            }
        }
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a final score, writing it out if it is a new best
    ///
    /// Returns whether the score was a new best.
    pub fn record(&mut self, score: u32) -> Result<bool> {
        if score <= self.high_score {
            return Ok(false);
        }

        self.save(score)?;
        self.high_score = score;
        info!("New high score {} saved to {:?}", score, self.path);
        Ok(true)
    }

    fn save(&self, high_score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let record = HighScoreRecord { high_score };
        let json =
            serde_json::to_string_pretty(&record).context("Failed to serialize high score")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write high score to {:?}", self.path))?;
        Ok(())
    }
}
