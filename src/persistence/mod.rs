//! Score persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Backup rotation (old save copied to backup, tmp renamed over save)
//! - A missing save falls back to the backup
//! - Corruption detection and recovery from the backup
//!
//! The simulations never touch this module directly: [`PersistentScores`]
//! wraps a [`ScoreBoard`] and writes it through after each recorded game.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::highscores::{ScoreBoard, ScoreRecorder};

/// Current on-disk format version
pub const SAVE_VERSION: u32 = 1;

/// Storage backend for the score aggregate
pub trait ScoreStore {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&mut self) -> Result<Option<ScoreBoard>, PersistenceError>;
    fn save(&mut self, scores: &ScoreBoard) -> Result<(), PersistenceError>;
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    scores: ScoreBoard,
}

/// JSON file store with a rotating backup
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        self.path.with_extension("bak")
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    fn read(path: &Path) -> Result<Option<ScoreBoard>, PersistenceError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let envelope: Envelope = serde_json::from_str(&json)?;
        if envelope.version > SAVE_VERSION {
            log::warn!(
                "Score file version {} is newer than supported {}",
                envelope.version,
                SAVE_VERSION
            );
        }
        Ok(Some(envelope.scores))
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&mut self) -> Result<Option<ScoreBoard>, PersistenceError> {
        match Self::read(&self.path) {
            Ok(Some(scores)) => Ok(Some(scores)),
            Ok(None) => {
                let recovered = Self::read(&self.backup_path()).unwrap_or_else(|err| {
                    log::warn!("Score backup unreadable ({})", err);
                    None
                });
                if recovered.is_some() {
                    log::info!("Score file missing, recovered scores from backup");
                }
                Ok(recovered)
            }
            Err(err) => {
                log::warn!("Score file unreadable ({}), trying backup", err);
                match Self::read(&self.backup_path()) {
                    Ok(Some(scores)) => {
                        log::info!("Recovered scores from backup");
                        Ok(Some(scores))
                    }
                    _ => Err(err),
                }
            }
        }
    }

    fn save(&mut self, scores: &ScoreBoard) -> Result<(), PersistenceError> {
        let envelope = Envelope {
            version: SAVE_VERSION,
            scores: scores.clone(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;

        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        // The primary file is replaced in one rename and never goes missing
        if self.path.exists() {
            fs::copy(&self.path, self.backup_path())?;
        }
        fs::rename(&tmp, &self.path)?;
        log::debug!("Scores saved to {}", self.path.display());
        Ok(())
    }
}

/// Store that keeps the last save in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    saved: Option<ScoreBoard>,
    saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scores(scores: ScoreBoard) -> Self {
        Self {
            saved: Some(scores),
            saves: 0,
        }
    }

    pub fn saved(&self) -> Option<&ScoreBoard> {
        self.saved.as_ref()
    }

    pub fn save_count(&self) -> u32 {
        self.saves
    }
}

impl ScoreStore for MemoryStore {
    fn load(&mut self) -> Result<Option<ScoreBoard>, PersistenceError> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, scores: &ScoreBoard) -> Result<(), PersistenceError> {
        self.saved = Some(scores.clone());
        self.saves += 1;
        Ok(())
    }
}

/// Score board that writes through to a store after every recorded game
///
/// Store failures are logged and swallowed so a full disk can never stall a tick.
pub struct PersistentScores<S: ScoreStore> {
    scores: ScoreBoard,
    store: S,
}

impl<S: ScoreStore> PersistentScores<S> {
    pub fn new(mut store: S) -> Self {
        let scores = match store.load() {
            Ok(Some(scores)) => {
                log::info!("Loaded scores ({} games played)", scores.total_games_played);
                scores
            }
            Ok(None) => {
                log::info!("No saved scores, starting fresh");
                ScoreBoard::new()
            }
            Err(err) => {
                log::warn!("Failed to load scores: {}", err);
                ScoreBoard::new()
            }
        };
        Self { scores, store }
    }

    pub fn scores(&self) -> &ScoreBoard {
        &self.scores
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn reset_all(&mut self) {
        self.scores.reset_all();
        self.flush();
    }

    fn flush(&mut self) {
        if let Err(err) = self.store.save(&self.scores) {
            log::warn!("Failed to save scores: {}", err);
        }
    }
}

impl<S: ScoreStore> ScoreRecorder for PersistentScores<S> {
    fn record_snake_score(&mut self, score: u32) {
        self.scores.record_snake_score(score);
        self.flush();
    }

    fn record_pong_player_win(&mut self) {
        self.scores.record_pong_player_win();
        self.flush();
    }

    fn record_pong_ai_win(&mut self) {
        self.scores.record_pong_ai_win();
        self.flush();
    }

    fn snake_high_score(&self) -> u32 {
        self.scores.snake_high_score()
    }

    fn pong_record(&self) -> (u32, u32) {
        self.scores.pong_record()
    }
}
