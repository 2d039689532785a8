//! Grid snake engine

pub mod body;
pub mod food;
pub mod simulation;

pub use body::Snake;
pub use food::{Food, FoodKind};
pub use simulation::{SnakeCommand, SnakeSimulation};
