//! Error types for configuration and score persistence
//!
//! The simulations themselves never fail once constructed; these errors cover
//! rejected settings and the I/O edge of the score store.

use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    BoardTooSmall { width: i32, height: i32 },
    CanvasNotPositive { width: f32, height: f32 },
    PaddleDoesNotFit { paddle_height: f32, canvas_height: f32 },
    BallDoesNotFit { ball_size: f32 },
    NonPositive { field: &'static str, value: f32 },
    TickBounds { min_ms: u64, initial_ms: u64, max_ms: u64 },
    SpeedFactor { factor: f32 },
    MinVelocityTooHigh { min_velocity_y: f32, ball_speed: f32 },
    DifficultyOutOfRange { difficulty: f32 },
    VolumeOutOfRange { field: &'static str, value: f32 },
    WinningScoreZero,
    Parse { message: String },
    Io { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoardTooSmall { width, height } => {
                write!(f, "snake board must be at least 2x2 cells, got {width}x{height}")
            }
            Self::CanvasNotPositive { width, height } => {
                write!(f, "pong canvas must be positive, got {width}x{height}")
            }
            Self::PaddleDoesNotFit {
                paddle_height,
                canvas_height,
            } => write!(
                f,
                "paddle height {paddle_height} does not fit canvas height {canvas_height}"
            ),
            Self::BallDoesNotFit { ball_size } => {
                write!(f, "ball size {ball_size} does not fit the canvas")
            }
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::TickBounds {
                min_ms,
                initial_ms,
                max_ms,
            } => write!(
                f,
                "tick interval bounds must satisfy 0 < min <= initial <= max, got {min_ms} / {initial_ms} / {max_ms}"
            ),
            Self::SpeedFactor { factor } => {
                write!(f, "speed factors must be at least 1.0, got {factor}")
            }
            Self::MinVelocityTooHigh {
                min_velocity_y,
                ball_speed,
            } => write!(
                f,
                "min_velocity_y {min_velocity_y} must be below the initial ball speed {ball_speed}"
            ),
            Self::DifficultyOutOfRange { difficulty } => {
                write!(f, "AI difficulty must be within 0.1..=1.0, got {difficulty}")
            }
            Self::VolumeOutOfRange { field, value } => {
                write!(f, "{field} must be within 0.0..=1.0, got {value}")
            }
            Self::WinningScoreZero => write!(f, "winning score must be at least 1"),
            Self::Parse { message } => write!(f, "invalid settings: {message}"),
            Self::Io { message } => write!(f, "failed to access settings file: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug)]
pub enum PersistenceError {
    Io(std::io::Error),
    Serde(serde_json::Error),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "score store I/O failed: {err}"),
            Self::Serde(err) => write!(f, "score store is not valid JSON: {err}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serde(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err)
    }
}
