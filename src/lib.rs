//! Retro Arcade - Snake and Pong simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (snake grid, pong physics, lifecycle, events)
//! - `highscores`: In-memory score aggregate and the recorder interface
//! - `persistence`: Score store adapters (JSON file, memory)
//! - `audio`: Fire-and-forget sound cues
//! - `settings`: Data-driven tuning for both games
//! - `attract`: Autopilots for demo mode

pub mod attract;
pub mod audio;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use audio::{AudioCues, AudioManager, SilentAudio, SoundEffect};
pub use error::{ConfigError, PersistenceError};
pub use highscores::{ScoreBoard, ScoreRecorder};
pub use settings::{AudioSettings, PongSettings, Settings, SnakeSettings};

use std::time::{SystemTime, UNIX_EPOCH};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Snake board, in cells
    pub const SNAKE_BOARD_WIDTH: i32 = 40;
    pub const SNAKE_BOARD_HEIGHT: i32 = 30;

    /// Snake tick interval bounds (milliseconds)
    pub const SNAKE_INITIAL_TICK_MS: u64 = 120;
    pub const SNAKE_MIN_TICK_MS: u64 = 60;
    pub const SNAKE_MAX_TICK_MS: u64 = 180;
    /// Interval change when eating SPEED_UP / SLOW_DOWN food
    pub const SNAKE_SPEED_UP_STEP_MS: u64 = 15;
    pub const SNAKE_SLOW_DOWN_STEP_MS: u64 = 25;
    /// Global ramp: every N normal foods, shave this much off the interval
    pub const SNAKE_RAMP_STEP_MS: u64 = 8;
    pub const SNAKE_RAMP_EVERY: u32 = 5;

    /// Special food blinks during its last seconds
    pub const FOOD_BLINK_WINDOW: Duration = Duration::from_secs(3);
    /// Random placement attempts before falling back to a full scan
    pub const FOOD_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Pong canvas (pixels)
    pub const PONG_CANVAS_WIDTH: f32 = 800.0;
    pub const PONG_CANVAS_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 15.0;
    pub const PADDLE_HEIGHT: f32 = 80.0;
    /// Pixels per tick
    pub const PADDLE_SPEED: f32 = 5.0;
    /// Distance from the canvas edge to the paddle face
    pub const PADDLE_MARGIN: f32 = 30.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 15.0;
    /// Pixels per tick
    pub const BALL_INITIAL_SPEED: f32 = 3.0;
    /// Speed boost when ball hits paddle (multiplicative)
    pub const BALL_SPEED_INCREASE: f32 = 1.05;
    /// Speed cap as a multiple of the initial speed
    pub const BALL_MAX_SPEED_MULTIPLIER: f32 = 2.0;
    /// Floor on |vy| after a paddle hit
    pub const BALL_MIN_VELOCITY_Y: f32 = 0.5;
    /// Steepest paddle rebound (radians)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_4;
    /// Serve direction spread either side of horizontal (radians)
    pub const SERVE_ANGLE_SPREAD: f32 = std::f32::consts::FRAC_PI_3;

    /// First side to this many points wins the match
    pub const PONG_WINNING_SCORE: u32 = 5;
    /// ~60 Hz
    pub const PONG_TICK_MICROS: u64 = 16_670;

    /// AI tuning
    pub const AI_DEFAULT_DIFFICULTY: f32 = 0.7;
    pub const AI_MIN_DIFFICULTY: f32 = 0.1;
    pub const AI_MAX_DIFFICULTY: f32 = 1.0;
    /// Aim error as a fraction of paddle height at difficulty 0
    pub const AI_ERROR_FACTOR: f32 = 0.3;
    /// Reaction delay after a hit at difficulty 0 (ticks)
    pub const AI_MAX_REACTION_DELAY: f32 = 20.0;

    /// Maximum timer fires per `ManualScheduler::advance` to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Wall-clock milliseconds since the Unix epoch (0 if the clock is before it)
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Fold a coordinate into `[0, range]` by mirroring off both bounds
///
/// Equivalent to reflecting repeatedly until the value lands in range, but
/// terminates in constant time for any finite input.
#[inline]
pub fn mirror_into_range(value: f32, range: f32) -> f32 {
    if range <= 0.0 {
        return 0.0;
    }
    if (0.0..=range).contains(&value) {
        return value;
    }
    let period = 2.0 * range;
    let folded = value.rem_euclid(period);
    if folded > range {
        period - folded
    } else {
        folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_inside_range_is_identity() {
        assert_eq!(mirror_into_range(42.0, 585.0), 42.0);
        assert_eq!(mirror_into_range(0.0, 585.0), 0.0);
        assert_eq!(mirror_into_range(585.0, 585.0), 585.0);
    }

    #[test]
    fn test_mirror_single_reflection() {
        // Overshoot the top by 10 -> 10 below it
        assert!((mirror_into_range(-10.0, 100.0) - 10.0).abs() < 1e-4);
        // Overshoot the bottom by 30 -> 30 above it
        assert!((mirror_into_range(130.0, 100.0) - 70.0).abs() < 1e-4);
    }

    #[test]
    fn test_mirror_multiple_reflections() {
        // -250 -> 250 -> (200 - 250) = -50 -> 50
        assert!((mirror_into_range(-250.0, 100.0) - 50.0).abs() < 1e-4);
        assert!((mirror_into_range(310.0, 100.0) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_mirror_degenerate_range() {
        assert_eq!(mirror_into_range(12.0, 0.0), 0.0);
    }
}
