//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, driven through an injected [`Scheduler`]
//! - Seeded RNG only
//! - Simulation time only (food expiry never reads the wall clock)
//! - No rendering or platform dependencies

pub mod collaborators;
pub mod events;
pub mod grid;
pub mod lifecycle;
pub mod pong;
pub mod rng;
pub mod scheduler;
pub mod snake;

#[cfg(test)]
mod testing;

pub use collaborators::Collaborators;
pub use events::{EventQueue, GameEvent, GameKind, GameResult, GameStatistics, SpecialKind};
pub use grid::{Direction, Point};
pub use lifecycle::GameState;
pub use pong::{Ball, GoalResult, Paddle, PaddleMove, PaddleType, PongCommand, PongSimulation};
pub use rng::GameRng;
pub use scheduler::{ManualScheduler, Scheduler, Ticker, TimerHandle};
pub use snake::{Food, FoodKind, Snake, SnakeCommand, SnakeSimulation};
