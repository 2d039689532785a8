//! Event channel from the simulations to the presentation layer
//!
//! A single tagged stream replaces per-kind listener registrations. The
//! presentation layer drains the queue once per frame.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::lifecycle::GameState;
use super::snake::FoodKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Snake,
    Pong,
}

impl GameKind {
    pub fn name(&self) -> &'static str {
        match self {
            GameKind::Snake => "Snake",
            GameKind::Pong => "Pong",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// End-of-game figures, per game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameStatistics {
    Snake {
        final_length: usize,
        food_eaten: u32,
        final_tick_interval: Duration,
    },
    Pong {
        /// Longest rally, in bounces
        max_rally_bounces: u32,
        total_bounces: u32,
        /// "player X | AI Y"
        summary: String,
    },
}

/// Terminal snapshot of a finished game, emitted exactly once per instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub game: GameKind,
    pub score: u32,
    pub victory: bool,
    pub statistics: Option<GameStatistics>,
}

impl GameResult {
    pub fn new(game: GameKind, score: u32, victory: bool) -> Self {
        Self {
            game,
            score,
            victory,
            statistics: None,
        }
    }

    pub fn with_statistics(mut self, statistics: GameStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: score {} ({})",
            self.game,
            self.score,
            if self.victory { "victory" } else { "defeat" }
        )
    }
}

/// Notable moments the presentation layer may want to celebrate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialKind {
    SpecialFoodEaten(FoodKind),
    FoodExpired(FoodKind),
    TickIntervalChanged,
    GoalScored,
    DifficultyChanged,
    NewHighScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u32, delta: i32 },
    StateChanged { old: GameState, new: GameState },
    GameOver(GameResult),
    Special { kind: SpecialKind, detail: String },
}

/// FIFO of pending events
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    pub fn special(&mut self, kind: SpecialKind, detail: impl Into<String>) {
        self.push(GameEvent::Special {
            kind,
            detail: detail.into(),
        });
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
