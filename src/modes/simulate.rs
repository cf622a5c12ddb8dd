//! Headless batch play
//!
//! Drives the engine without a terminal: a seeded random policy turns the
//! snake now and then, games run back to back on one session, and the
//! outcome is summarized in a [`SimulationReport`]. Two runs with the same
//! seeds produce the same report, which makes this handy for checking engine
//! changes against recorded numbers.
//!
//! # Example
//!
//! ```rust
//! use snake_engine::game::GameConfig;
//! use snake_engine::modes::{SimulateConfig, SimulateMode};
//!
//! let config = SimulateConfig {
//!     games: 5,
//!     game_config: GameConfig::small().with_seed(1),
//!     ..Default::default()
//! };
//! let report = SimulateMode::new(config).unwrap().run();
//! assert_eq!(report.games, 5);
//! ```

use anyhow::{Context, Result};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::game::{Direction, GameConfig, GameOverCause, GameSession, TickResult};

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulateConfig {
    /// Number of games to play
    pub games: usize,
    /// Games still running after this many ticks are cut off
    pub max_ticks: u64,
    /// Chance of requesting a random turn on each tick
    pub turn_probability: f64,
    /// Seed for the turning policy, separate from the food seed
    pub policy_seed: u64,
    pub game_config: GameConfig,
}

impl Default for SimulateConfig {
    fn default() -> Self {
        Self {
            games: 100,
            max_ticks: 10_000,
            turn_probability: 0.2,
            policy_seed: 0,
            game_config: GameConfig::default(),
        }
    }
}

/// Aggregate outcome of a simulation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationReport {
    pub games: usize,
    pub total_ticks: u64,
    pub best_score: u32,
    pub total_score: u64,
    pub wall_collisions: usize,
    pub self_collisions: usize,
    pub boards_cleared: usize,
    /// Games cut off by `max_ticks`
    pub timeouts: usize,
}

impl SimulationReport {
    pub fn mean_score(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_score as f64 / self.games as f64
        }
    }

    fn record(&mut self, score: u32, ticks: u64, cause: Option<GameOverCause>) {
        self.games += 1;
        self.total_ticks += ticks;
        self.total_score += u64::from(score);
        self.best_score = self.best_score.max(score);

        match cause {
            Some(GameOverCause::WallCollision) => self.wall_collisions += 1,
            Some(GameOverCause::SelfCollision) => self.self_collisions += 1,
            Some(GameOverCause::BoardCleared) => self.boards_cleared += 1,
            None => self.timeouts += 1,
        }
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Games: {} | Ticks: {} | Best: {} | Mean: {:.2} | Wall: {} | Self: {} | Cleared: {} | Timeouts: {}",
            self.games,
            self.total_ticks,
            self.best_score,
            self.mean_score(),
            self.wall_collisions,
            self.self_collisions,
            self.boards_cleared,
            self.timeouts
        )
    }
}

pub struct SimulateMode {
    session: GameSession,
    policy: StdRng,
    config: SimulateConfig,
}

impl SimulateMode {
    pub fn new(config: SimulateConfig) -> Result<Self> {
        let session = GameSession::new(config.game_config.clone())
            .context("Invalid game configuration")?;
        let policy = StdRng::seed_from_u64(config.policy_seed);

        Ok(Self {
            session,
            policy,
            config,
        })
    }

    /// Seed used for food placement
    pub fn food_seed(&self) -> u64 {
        self.session.seed()
    }

    /// Play all games and return the report
    pub fn run(&mut self) -> SimulationReport {
        info!(
            "Simulating {} games (food seed {}, policy seed {})",
            self.config.games,
            self.session.seed(),
            self.config.policy_seed
        );

        let mut report = SimulationReport::default();

        for game in 0..self.config.games {
            if game > 0 {
                self.session.restart();
            }

            let (score, ticks, cause) = self.play_game();
            debug!("Game {}: score {} in {} ticks ({:?})", game + 1, score, ticks, cause);
            report.record(score, ticks, cause);
        }

        info!("{}", report.format_summary());
        report
    }

    fn play_game(&mut self) -> (u32, u64, Option<GameOverCause>) {
        for tick in 1..=self.config.max_ticks {
            if self.policy.gen_bool(self.config.turn_probability.clamp(0.0, 1.0)) {
                if let Some(&direction) = Direction::ALL.choose(&mut self.policy) {
                    self.session.request_direction(direction);
                }
            }

            if let TickResult::GameOver { cause, final_score } = self.session.tick() {
                return (final_score, tick, Some(cause));
            }
        }

        (self.session.score(), self.config.max_ticks, None)
    }

    /// Print a summary of the run to stdout
    pub fn print_report(&self, report: &SimulationReport) {
        println!("{}", "=".repeat(70));
        println!("Snake simulation");
        println!("{}", "=".repeat(70));
        println!(
            "Grid: {}x{} ({:?} edges)",
            self.config.game_config.grid_width,
            self.config.game_config.grid_height,
            self.config.game_config.edge_policy
        );
        println!("Food seed: {}", self.session.seed());
        println!("Policy seed: {}", self.config.policy_seed);
        println!("{}", report.format_summary());
        println!("{}", "=".repeat(70));
    }
}
