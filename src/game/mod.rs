//! Core game logic module for Snake
//!
//! Everything here is pure in-memory state: no I/O, no timing, no rendering.
//! Hosts drive a [`GameSession`] by calling `tick` at their own pace and feed
//! it [`Direction`] requests from whatever input device they own.

pub mod config;
pub mod direction;
pub mod engine;
pub mod food;
pub mod grid;
pub mod observer;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig, MAX_GRID_CELLS};
pub use direction::Direction;
pub use engine::{GameEngine, TickResult};
pub use food::{BoardFull, FoodPlacer};
pub use grid::{EdgePolicy, Grid, OutOfBounds, Position};
pub use observer::{NoopObserver, SessionObserver};
pub use session::GameSession;
pub use state::{GameOverCause, GameState, SessionState, Snake, Snapshot};
