//! Score and session statistics
//!
//! [`ScoreBoard`] is a pure in-memory aggregate; serializing it is the
//! persistence layer's job. The simulations only see the [`ScoreRecorder`]
//! interface.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::now_ms;
use crate::sim::GameKind;

/// Maximum number of snake scores kept on the leaderboard
pub const MAX_HIGH_SCORES: usize = 10;

/// What the simulations report when a game ends
pub trait ScoreRecorder {
    fn record_snake_score(&mut self, score: u32);
    fn record_pong_player_win(&mut self);
    fn record_pong_ai_win(&mut self);
    fn snake_high_score(&self) -> u32;
    /// (player wins, AI wins)
    fn pong_record(&self) -> (u32, u32);
}

impl<T: ScoreRecorder> ScoreRecorder for Rc<RefCell<T>> {
    fn record_snake_score(&mut self, score: u32) {
        self.borrow_mut().record_snake_score(score)
    }

    fn record_pong_player_win(&mut self) {
        self.borrow_mut().record_pong_player_win()
    }

    fn record_pong_ai_win(&mut self) {
        self.borrow_mut().record_pong_ai_win()
    }

    fn snake_high_score(&self) -> u32 {
        self.borrow().snake_high_score()
    }

    fn pong_record(&self) -> (u32, u32) {
        self.borrow().pong_record()
    }
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// Best snake scores, highest first, at most `MAX_HIGH_SCORES`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<HighScoreEntry>,
}

impl Leaderboard {
    /// Insert behind any equal scores and return the 1-based rank.
    ///
    /// Zero scores and scores that would land past the last slot are not kept.
    pub fn add(&mut self, score: u32, timestamp: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let index = self.entries.partition_point(|e| e.score >= score);
        if index >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(index, HighScoreEntry { score, timestamp });
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(index + 1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeRecord {
    pub high_score: u32,
    pub high_score_date: Option<u64>,
    pub total_score: u64,
    pub games_played: u32,
    /// Not persisted across runs
    #[serde(skip)]
    pub session_score: u64,
    pub leaderboard: Leaderboard,
}

impl SnakeRecord {
    pub fn average_score(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.total_score as f64 / self.games_played as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongRecord {
    pub player_wins: u32,
    pub ai_wins: u32,
    pub games_played: u32,
    #[serde(skip)]
    pub session_wins: u32,
    pub last_win_date: Option<u64>,
}

impl PongRecord {
    /// Player win percentage (0 - 100)
    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.player_wins as f64 * 100.0 / self.games_played as f64
        }
    }
}

/// Aggregate statistics for both games
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreBoard {
    pub snake: SnakeRecord,
    pub pong: PongRecord,
    pub total_games_played: u32,
    pub last_played: Option<GameKind>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snake score at an explicit time
    pub fn record_snake_score_at(&mut self, score: u32, timestamp: u64) {
        let snake = &mut self.snake;
        snake.games_played += 1;
        snake.total_score += u64::from(score);
        snake.session_score += u64::from(score);
        if score > snake.high_score {
            snake.high_score = score;
            snake.high_score_date = Some(timestamp);
            log::info!("New snake high score: {}", score);
        }
        if let Some(rank) = snake.leaderboard.add(score, timestamp) {
            log::debug!("Snake score {} ranked #{}", score, rank);
        }
        self.finish_game(GameKind::Snake);
    }

    pub fn record_pong_result_at(&mut self, player_won: bool, timestamp: u64) {
        let pong = &mut self.pong;
        pong.games_played += 1;
        if player_won {
            pong.player_wins += 1;
            pong.session_wins += 1;
            pong.last_win_date = Some(timestamp);
        } else {
            pong.ai_wins += 1;
        }
        self.finish_game(GameKind::Pong);
    }

    fn finish_game(&mut self, game: GameKind) {
        self.total_games_played += 1;
        self.last_played = Some(game);
    }

    /// Zero the per-run counters only
    pub fn reset_session(&mut self) {
        self.snake.session_score = 0;
        self.pong.session_wins = 0;
    }

    pub fn reset_all(&mut self) {
        *self = Self::default();
        log::info!("All scores reset");
    }

    /// Multi-line human readable summary
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Snake: high score {} | games {} | average {:.1}\n",
            self.snake.high_score,
            self.snake.games_played,
            self.snake.average_score()
        ));
        out.push_str(&format!(
            "Pong: {} wins / {} losses | win rate {:.1}%\n",
            self.pong.player_wins,
            self.pong.ai_wins,
            self.pong.win_rate()
        ));
        out.push_str(&format!("Total games: {}", self.total_games_played));
        if let Some(game) = self.last_played {
            out.push_str(&format!(" | last played: {}", game));
        }
        out
    }
}

impl ScoreRecorder for ScoreBoard {
    fn record_snake_score(&mut self, score: u32) {
        self.record_snake_score_at(score, now_ms());
    }

    fn record_pong_player_win(&mut self) {
        self.record_pong_result_at(true, now_ms());
    }

    fn record_pong_ai_win(&mut self) {
        self.record_pong_result_at(false, now_ms());
    }

    fn snake_high_score(&self) -> u32 {
        self.snake.high_score
    }

    fn pong_record(&self) -> (u32, u32) {
        (self.pong.player_wins, self.pong.ai_wins)
    }
}
