//! Leaderboard persistence.
//!
//! A small JSON file of `{name, score, level}` records, best first.
//! Storage failures are never fatal: a bad read means an empty board, a
//! bad write is logged and dropped, and the game carries on either way.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

const MAX_ENTRIES: usize = 10;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub level: u32,
}

#[derive(Debug)]
pub struct Leaderboard {
    path: PathBuf,
    entries: Vec<ScoreEntry>,
}

/// Default board location under `$HOME`.
pub fn default_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".star_invaders_scores.json")
}

impl Leaderboard {
    /// Load the board, treating any read or parse failure as "no
    /// leaderboard data".
    pub fn load(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Vec<ScoreEntry>>(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "unreadable leaderboard, starting empty");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Leaderboard { path, entries }
    }

    /// The resident high score consumed at startup.
    pub fn high_score(&self) -> u32 {
        self.entries.iter().map(|e| e.score).max().unwrap_or(0)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Insert a finished run and persist. Write errors are logged and
    /// swallowed.
    pub fn record(&mut self, entry: ScoreEntry) {
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
        if let Err(e) = self.save() {
            warn!(path = %self.path.display(), error = %e, "could not save leaderboard");
        }
    }

    fn save(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_empty_board() {
        let board = Leaderboard::load(PathBuf::from("/definitely/not/here.json"));
        assert!(board.entries().is_empty());
        assert_eq!(board.high_score(), 0);
    }

    #[test]
    fn record_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut board = Leaderboard::load(path.clone());
        board.record(ScoreEntry {
            name: "ace".into(),
            score: 1200,
            level: 3,
        });
        board.record(ScoreEntry {
            name: "rookie".into(),
            score: 300,
            level: 1,
        });

        let reloaded = Leaderboard::load(path);
        assert_eq!(reloaded.high_score(), 1200);
        assert_eq!(reloaded.entries()[0].name, "ace");
        assert_eq!(reloaded.entries().len(), 2);
    }

    #[test]
    fn board_keeps_only_the_top_ten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut board = Leaderboard::load(path);
        for i in 0..15u32 {
            board.record(ScoreEntry {
                name: format!("p{i}"),
                score: i * 10,
                level: 1,
            });
        }
        assert_eq!(board.entries().len(), 10);
        // lowest surviving score is 50: entries 0..4 were dropped
        assert!(board.entries().iter().all(|e| e.score >= 50));
    }

    #[test]
    fn corrupt_file_is_an_empty_board() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "not json at all").unwrap();

        let board = Leaderboard::load(path);
        assert!(board.entries().is_empty());
    }
}
