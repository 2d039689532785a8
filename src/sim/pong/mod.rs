//! Two-paddle ball engine

pub mod ball;
pub mod paddle;
pub mod simulation;

pub use ball::{Ball, GoalResult};
pub use paddle::{Paddle, PaddleMove, PaddleType};
pub use simulation::{PongCommand, PongSimulation};
