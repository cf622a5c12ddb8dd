//! Snake - a deterministic, tick-driven Snake engine
//!
//! This library provides:
//! - Core game logic (game module): grid, snake, food placement, engine, session
//! - Terminal input mapping (input module)
//! - TUI rendering (render module)
//! - Host-side metrics and high score persistence (metrics module)
//! - Execution modes: interactive human play and headless simulation (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
