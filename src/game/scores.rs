//! Persistent high-score list
//!
//! Scores live in one JSON file named after the storage key. A missing or
//! unreadable file is treated as an empty list.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::core::config::StorageConfig;
use crate::core::error::Result;
use crate::core::types::ItemId;

/// Number of entries shown on the leaderboard
pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScore {
    pub id: String,
    pub name: String,
    /// Final population
    pub score: i64,
    /// RFC 3339 timestamp of registration
    pub date: String,
}

#[derive(Debug, Clone)]
pub struct ScoreBoard {
    path: PathBuf,
    scores: Vec<HighScore>,
}

impl ScoreBoard {
    /// Load the board from the configured storage location
    pub fn load(storage: &StorageConfig) -> Self {
        Self::load_from(storage.scores_path())
    }

    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse high scores");
                Vec::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read high scores");
                Vec::new()
            }
        };
        Self { path, scores }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All registered scores in registration order
    pub fn all(&self) -> &[HighScore] {
        &self.scores
    }

    /// Append a score and write the whole list back
    pub fn register(&mut self, name: &str, score: i64) -> Result<HighScore> {
        let entry = HighScore {
            id: ItemId::generate().0,
            name: name.trim().to_string(),
            score,
            date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let mut scores = self.scores.clone();
        scores.push(entry.clone());
        write_scores(&self.path, &scores)?;
        self.scores = scores;
        tracing::info!(name = %entry.name, score, "high score registered");
        Ok(entry)
    }

    /// Highest `n` scores, best first; ties keep registration order
    pub fn top(&self, n: usize) -> Vec<&HighScore> {
        let mut sorted: Vec<&HighScore> = self.scores.iter().collect();
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted.truncate(n);
        sorted
    }

}

fn write_scores(path: &Path, scores: &[HighScore]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(scores)?;
    std::fs::write(path, json)?;
    Ok(())
}
