//! Game lifecycle shared by both engines

use serde::{Deserialize, Serialize};

/// Current phase of a game instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Entities being built
    Starting,
    /// Active gameplay, ticks advance the simulation
    Playing,
    /// Ticking suspended, entities frozen
    Paused,
    /// Run ended in defeat
    GameOver,
    /// Match decided
    Victory,
    /// Ready, waiting for the start command
    WaitingRestart,
    /// Leaving for the menu
    ReturningMenu,
}

impl GameState {
    pub fn display_name(&self) -> &'static str {
        match self {
            GameState::Starting => "Starting...",
            GameState::Playing => "Playing",
            GameState::Paused => "Paused",
            GameState::GameOver => "Game Over",
            GameState::Victory => "Victory!",
            GameState::WaitingRestart => "Press R to play again",
            GameState::ReturningMenu => "Returning to menu...",
        }
    }

    pub fn is_active(&self) -> bool {
        *self == GameState::Playing
    }

    pub fn is_paused(&self) -> bool {
        *self == GameState::Paused
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameState::GameOver | GameState::Victory)
    }

    pub fn can_be_paused(&self) -> bool {
        *self == GameState::Playing
    }

    pub fn can_be_resumed(&self) -> bool {
        *self == GameState::Paused
    }

    pub fn can_be_restarted(&self) -> bool {
        matches!(
            self,
            GameState::GameOver | GameState::Victory | GameState::WaitingRestart
        )
    }

    /// The logical successor of this state
    pub fn next_state(&self) -> GameState {
        match self {
            GameState::Starting => GameState::Playing,
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            GameState::GameOver | GameState::Victory => GameState::WaitingRestart,
            GameState::WaitingRestart | GameState::ReturningMenu => GameState::Starting,
        }
    }

    /// PLAYING <-> PAUSED; every other state is returned unchanged
    pub fn toggle_play_pause(&self) -> GameState {
        match self {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            other => *other,
        }
    }
}
