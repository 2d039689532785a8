//! Game settings and tuning
//!
//! Defaults reproduce the classic arcade feel; everything can be overridden
//! from a JSON settings file. Loads are always validated.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// AI difficulty presets bound to the digit keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Medium => "Medium",
            DifficultyLevel::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" | "1" => Some(DifficultyLevel::Easy),
            "medium" | "med" | "2" => Some(DifficultyLevel::Medium),
            "hard" | "3" => Some(DifficultyLevel::Hard),
            _ => None,
        }
    }

    /// AI difficulty scalar for this preset
    pub fn difficulty(&self) -> f32 {
        match self {
            DifficultyLevel::Easy => 0.3,
            DifficultyLevel::Medium => 0.5,
            DifficultyLevel::Hard => 0.8,
        }
    }
}

/// Snake tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeSettings {
    /// Board size in cells
    pub board_width: i32,
    pub board_height: i32,

    // === Tick interval (ms) ===
    pub initial_tick_ms: u64,
    /// Fastest allowed interval
    pub min_tick_ms: u64,
    /// Slowest allowed interval
    pub max_tick_ms: u64,
    pub speed_up_step_ms: u64,
    pub slow_down_step_ms: u64,
    /// Difficulty ramp applied every `ramp_every` normal foods
    pub ramp_step_ms: u64,
    pub ramp_every: u32,
}

impl Default for SnakeSettings {
    fn default() -> Self {
        Self {
            board_width: SNAKE_BOARD_WIDTH,
            board_height: SNAKE_BOARD_HEIGHT,
            initial_tick_ms: SNAKE_INITIAL_TICK_MS,
            min_tick_ms: SNAKE_MIN_TICK_MS,
            max_tick_ms: SNAKE_MAX_TICK_MS,
            speed_up_step_ms: SNAKE_SPEED_UP_STEP_MS,
            slow_down_step_ms: SNAKE_SLOW_DOWN_STEP_MS,
            ramp_step_ms: SNAKE_RAMP_STEP_MS,
            ramp_every: SNAKE_RAMP_EVERY,
        }
    }
}

impl SnakeSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width < 2 || self.board_height < 2 {
            return Err(ConfigError::BoardTooSmall {
                width: self.board_width,
                height: self.board_height,
            });
        }
        if self.min_tick_ms == 0
            || self.min_tick_ms > self.initial_tick_ms
            || self.initial_tick_ms > self.max_tick_ms
        {
            return Err(ConfigError::TickBounds {
                min_ms: self.min_tick_ms,
                initial_ms: self.initial_tick_ms,
                max_ms: self.max_tick_ms,
            });
        }
        if self.ramp_every == 0 {
            return Err(ConfigError::NonPositive {
                field: "ramp_every",
                value: 0.0,
            });
        }
        Ok(())
    }

    pub fn initial_tick(&self) -> Duration {
        Duration::from_millis(self.initial_tick_ms)
    }
}

/// Pong tuning. Distances are pixels, speeds are pixels per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongSettings {
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Paddles ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub paddle_margin: f32,

    // === Ball ===
    pub ball_size: f32,
    pub initial_ball_speed: f32,
    pub speed_increase: f32,
    pub max_speed_multiplier: f32,
    pub min_velocity_y: f32,

    // === Match ===
    pub winning_score: u32,
    /// Starting AI difficulty (0.1 - 1.0)
    pub ai_difficulty: f32,
    pub tick_micros: u64,
}

impl Default for PongSettings {
    fn default() -> Self {
        Self {
            canvas_width: PONG_CANVAS_WIDTH,
            canvas_height: PONG_CANVAS_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_margin: PADDLE_MARGIN,
            ball_size: BALL_SIZE,
            initial_ball_speed: BALL_INITIAL_SPEED,
            speed_increase: BALL_SPEED_INCREASE,
            max_speed_multiplier: BALL_MAX_SPEED_MULTIPLIER,
            min_velocity_y: BALL_MIN_VELOCITY_Y,
            winning_score: PONG_WINNING_SCORE,
            ai_difficulty: AI_DEFAULT_DIFFICULTY,
            tick_micros: PONG_TICK_MICROS,
        }
    }
}

impl PongSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return Err(ConfigError::CanvasNotPositive {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        for (field, value) in [
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("ball_size", self.ball_size),
            ("initial_ball_speed", self.initial_ball_speed),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.paddle_height > self.canvas_height {
            return Err(ConfigError::PaddleDoesNotFit {
                paddle_height: self.paddle_height,
                canvas_height: self.canvas_height,
            });
        }
        if self.ball_size >= self.canvas_height || self.ball_size >= self.canvas_width {
            return Err(ConfigError::BallDoesNotFit {
                ball_size: self.ball_size,
            });
        }
        if self.speed_increase < 1.0 {
            return Err(ConfigError::SpeedFactor {
                factor: self.speed_increase,
            });
        }
        if self.max_speed_multiplier < 1.0 {
            return Err(ConfigError::SpeedFactor {
                factor: self.max_speed_multiplier,
            });
        }
        if self.min_velocity_y < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "min_velocity_y",
                value: self.min_velocity_y,
            });
        }
        // A floor at or above the speed leaves no horizontal component after a hit
        if self.min_velocity_y >= self.initial_ball_speed {
            return Err(ConfigError::MinVelocityTooHigh {
                min_velocity_y: self.min_velocity_y,
                ball_speed: self.initial_ball_speed,
            });
        }
        if self.winning_score == 0 {
            return Err(ConfigError::WinningScoreZero);
        }
        if !(AI_MIN_DIFFICULTY..=AI_MAX_DIFFICULTY).contains(&self.ai_difficulty) {
            return Err(ConfigError::DifficultyOutOfRange {
                difficulty: self.ai_difficulty,
            });
        }
        if self.tick_micros == 0 {
            return Err(ConfigError::NonPositive {
                field: "tick_micros",
                value: 0.0,
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_micros(self.tick_micros)
    }

    /// X of the left paddle's left edge
    pub fn left_paddle_x(&self) -> f32 {
        self.paddle_margin
    }

    /// X of the right paddle's left edge
    pub fn right_paddle_x(&self) -> f32 {
        self.canvas_width - self.paddle_margin - self.paddle_width
    }
}

/// Cue volume preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }
}

impl AudioSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("master_volume", self.master_volume),
            ("sfx_volume", self.sfx_volume),
            ("music_volume", self.music_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::VolumeOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

/// All arcade settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub snake: SnakeSettings,
    pub pong: PongSettings,
    pub audio: AudioSettings,
    /// Fixed RNG seed (random per run when absent)
    pub seed: Option<u64>,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.snake.validate()?;
        self.pong.validate()?;
        self.audio.validate()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Load settings from a JSON file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Io {
                message: err.to_string(),
            }),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| ConfigError::Io {
            message: e.to_string(),
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}
