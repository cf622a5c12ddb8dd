//! A single player's game, start to finish and back again
//!
//! [`GameSession`] is the surface a host talks to: it buffers direction
//! requests, advances the engine once per [`GameSession::tick`], reports to a
//! [`SessionObserver`], and can be restarted any number of times on the same
//! grid.

use log::info;

use super::{
    config::{ConfigError, GameConfig},
    direction::Direction,
    engine::{GameEngine, TickResult},
    grid::Grid,
    observer::{NoopObserver, SessionObserver},
    state::{GameState, SessionState, Snapshot},
};

pub struct GameSession<O: SessionObserver = NoopObserver> {
    engine: GameEngine,
    state: GameState,
    observer: O,
}

impl GameSession<NoopObserver> {
    /// Create a session with no observer attached
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_observer(config, NoopObserver)
    }
}

impl<O: SessionObserver> GameSession<O> {
    pub fn with_observer(config: GameConfig, observer: O) -> Result<Self, ConfigError> {
        let mut engine = GameEngine::new(config)?;
        let state = engine.reset();

        info!(
            "Session started: {}x{} grid, {:?} edges, seed {}",
            engine.grid().width(),
            engine.grid().height(),
            engine.grid().edge_policy(),
            engine.seed()
        );

        Ok(Self {
            engine,
            state,
            observer,
        })
    }

    /// Buffer a turn for the next tick
    ///
    /// Ignored once the session is over, and for reversals of a snake longer
    /// than one segment. Returns whether the request was taken.
    pub fn request_direction(&mut self, direction: Direction) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.state.snake.set_pending_direction(direction)
    }

    /// Advance the game by one step
    pub fn tick(&mut self) -> TickResult {
        let was_running = self.state.is_running();
        let result = self.engine.step(&mut self.state);

        match &result {
            TickResult::Continued {
                score,
                ate_food: true,
                ..
            } => {
                self.observer.on_score_changed(*score);
            }
            TickResult::GameOver { cause, final_score } if was_running => {
                info!(
                    "Game over after {} ticks: {}, final score {}",
                    self.state.ticks,
                    cause.as_str(),
                    final_score
                );
                self.observer.on_game_over(*final_score);
            }
            _ => {}
        }

        result
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Start over with a fresh snake, food and score on the same grid
    pub fn restart(&mut self) {
        self.state = self.engine.reset();
        info!("Session restarted");
    }

    pub fn state(&self) -> SessionState {
        self.state.session_state()
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn grid(&self) -> &Grid {
        self.engine.grid()
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    /// Seed driving food placement, for replaying a run
    pub fn seed(&self) -> u64 {
        self.engine.seed()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    #[cfg(test)]
    pub(crate) fn game_state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
