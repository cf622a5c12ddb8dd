use std::collections::HashSet;

use log::debug;

use super::{
    config::{ConfigError, GameConfig},
    food::{BoardFull, FoodPlacer},
    grid::{Grid, OutOfBounds},
    state::{GameOverCause, GameState, Snake, Snapshot},
};

/// Outcome of a single tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickResult {
    /// The snake moved and the session keeps running
    Continued {
        score: u32,
        /// Whether food was eaten on this tick
        ate_food: bool,
        snapshot: Snapshot,
    },
    /// The session is over; repeated on every tick until restart
    GameOver {
        cause: GameOverCause,
        final_score: u32,
    },
}

impl TickResult {
    pub fn is_game_over(&self) -> bool {
        matches!(self, TickResult::GameOver { .. })
    }

    pub fn score(&self) -> u32 {
        match self {
            TickResult::Continued { score, .. } => *score,
            TickResult::GameOver { final_score, .. } => *final_score,
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    food: FoodPlacer,
    /// Snake every session starts from
    start: Snake,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    ///
    /// Fails if the grid is empty or the starting snake does not fit on it.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = Grid::new(config.grid_width, config.grid_height, config.edge_policy);
        let food = match config.seed {
            Some(seed) => FoodPlacer::new(seed),
            None => FoodPlacer::from_entropy(),
        };

        let start = initial_snake(&config, &grid)?;

        Ok(Self {
            config,
            grid,
            food,
            start,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Seed driving food placement
    pub fn seed(&self) -> u64 {
        self.food.seed()
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let snake = self.start.clone();

        match self.food.place(&self.grid, &snake) {
            Ok(food) => GameState::new(snake, Some(food)),
            Err(BoardFull) => {
                let mut state = GameState::new(snake, None);
                state.cause = Some(GameOverCause::BoardCleared);
                state
            }
        }
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState) -> TickResult {
        if let Some(cause) = state.cause {
            return TickResult::GameOver {
                cause,
                final_score: state.score,
            };
        }

        state.ticks += 1;

        let heading = state.snake.apply_pending_direction();
        let candidate = state.snake.head().moved_in_direction(heading);

        let new_head = match self.grid.wrap_or_reject(candidate) {
            Ok(pos) => pos,
            Err(OutOfBounds { position }) => {
                debug!("Wall hit at ({}, {})", position.x, position.y);
                return Self::finish(state, GameOverCause::WallCollision);
            }
        };

        let grew = state.food == Some(new_head);

        if state.snake.collides_on_move(new_head, grew) {
            return Self::finish(state, GameOverCause::SelfCollision);
        }

        state.snake.advance(new_head, grew);

        if grew {
            state.score = state.score.saturating_add(self.config.food_reward);

            match self.food.place(&self.grid, &state.snake) {
                Ok(food) => {
                    debug!("Food eaten, next at ({}, {})", food.x, food.y);
                    state.food = Some(food);
                }
                Err(BoardFull) => {
                    state.food = None;
                    return Self::finish(state, GameOverCause::BoardCleared);
                }
            }
        }

        debug_assert!(state.snake.has_distinct_segments());
        debug_assert!(state.food.map_or(true, |food| !state.snake.occupies(food)));

        TickResult::Continued {
            score: state.score,
            ate_food: grew,
            snapshot: state.snapshot(),
        }
    }

    fn finish(state: &mut GameState, cause: GameOverCause) -> TickResult {
        state.cause = Some(cause);
        TickResult::GameOver {
            cause,
            final_score: state.score,
        }
    }
}

/// Starting snake at the grid center, checked against the edge policy
fn initial_snake(config: &GameConfig, grid: &Grid) -> Result<Snake, ConfigError> {
    let length = config.initial_snake_length;
    let direction = config.initial_direction;
    let does_not_fit = || ConfigError::SnakeDoesNotFit {
        length,
        direction,
        width: grid.width(),
        height: grid.height(),
    };

    let raw = Snake::new(grid.center(), direction, length);
    let segments = raw
        .segments()
        .map(|pos| grid.wrap_or_reject(pos).map_err(|_| does_not_fit()))
        .collect::<Result<Vec<_>, _>>()?;

    let distinct: HashSet<_> = segments.iter().collect();
    if distinct.len() != segments.len() {
        return Err(does_not_fit());
    }

    Ok(Snake::from_segments(segments, direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::direction::Direction;
    use crate::game::grid::{EdgePolicy, Position};

    fn walled(width: usize, height: usize) -> GameEngine {
        GameEngine::new(
            GameConfig::new(width, height)
                .with_edge_policy(EdgePolicy::Wall)
                .with_seed(11),
        )
        .unwrap()
    }

    #[test]
    fn test_reset() {
        let mut engine = GameEngine::new(GameConfig::default().with_initial_length(3)).unwrap();
        let state = engine.reset();

        assert!(state.is_running());
        assert_eq!(state.score, 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Position::new(10, 10));
        let food = state.food.unwrap();
        assert!(!state.snake.occupies(food));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = GameEngine::new(GameConfig::small().with_seed(1)).unwrap();
        let mut state = engine.reset();
        state.food = Some(Position::new(0, 0));
        let initial_head = state.snake.head();

        let result = engine.step(&mut state);

        assert!(!result.is_game_over());
        assert_eq!(state.ticks, 1);
        assert_eq!(state.snake.head(), initial_head.moved_in_direction(Direction::Right));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = GameEngine::new(GameConfig::small().with_seed(3)).unwrap();
        let mut state = engine.reset();

        let head = state.snake.head();
        state.food = Some(head.moved_in_direction(state.snake.heading()));
        let initial_length = state.snake.len();

        let result = engine.step(&mut state);

        match result {
            TickResult::Continued {
                score,
                ate_food,
                snapshot,
            } => {
                assert!(ate_food);
                assert_eq!(score, 1);
                assert_eq!(snapshot.segments.len(), initial_length + 1);
            }
            other => panic!("expected Continued, got {:?}", other),
        }
        assert_eq!(state.snake.len(), initial_length + 1);
        assert!(!state.snake.occupies(state.food.unwrap()));
    }

    #[test]
    fn test_custom_food_reward() {
        let mut config = GameConfig::small().with_seed(3);
        config.food_reward = 10;
        let mut engine = GameEngine::new(config).unwrap();
        let mut state = engine.reset();
        state.food = Some(state.snake.head().moved_in_direction(Direction::Right));

        assert_eq!(engine.step(&mut state).score(), 10);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = walled(10, 10);
        let mut state = GameState::new(
            Snake::new(Position::new(0, 5), Direction::Left, 3),
            Some(Position::new(5, 5)),
        );
        let before = state.snake.clone();

        let result = engine.step(&mut state);

        assert_eq!(
            result,
            TickResult::GameOver {
                cause: GameOverCause::WallCollision,
                final_score: 0
            }
        );
        assert!(!state.is_running());
        assert_eq!(state.snake, before);
    }

    #[test]
    fn test_wrap_around() {
        let mut engine = GameEngine::new(GameConfig::small().with_seed(2)).unwrap();
        let mut state = GameState::new(
            Snake::new(Position::new(9, 4), Direction::Right, 2),
            Some(Position::new(5, 8)),
        );

        let result = engine.step(&mut state);

        assert!(!result.is_game_over());
        assert_eq!(state.snake.head(), Position::new(0, 4));
        assert_eq!(state.snake.tail(), Position::new(9, 4));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = walled(10, 10);

        // Body: (5,5), (4,5), (3,5), (2,5), (1,5)
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 5);
        let mut state = GameState::new(snake, Some(Position::new(8, 8)));

        // Down: (5,6), (5,5), (4,5), (3,5), (2,5)
        state.snake.set_pending_direction(Direction::Down);
        engine.step(&mut state);
        // Left: (4,6), (5,6), (5,5), (4,5), (3,5)
        state.snake.set_pending_direction(Direction::Left);
        engine.step(&mut state);
        // Up: (4,5) is still body
        state.snake.set_pending_direction(Direction::Up);
        let result = engine.step(&mut state);

        assert_eq!(
            result,
            TickResult::GameOver {
                cause: GameOverCause::SelfCollision,
                final_score: 0
            }
        );
    }

    #[test]
    fn test_chasing_tail_is_allowed() {
        let mut engine = walled(10, 10);

        // 2x2 loop: head (5,5) heading Up, tail at (5,4) will be vacated
        let snake = Snake::from_segments(
            vec![
                Position::new(5, 5),
                Position::new(6, 5),
                Position::new(6, 4),
                Position::new(5, 4),
            ],
            Direction::Left,
        );
        let mut state = GameState::new(snake, Some(Position::new(0, 0)));
        state.snake.set_pending_direction(Direction::Up);

        let result = engine.step(&mut state);

        assert!(!result.is_game_over());
        assert_eq!(state.snake.head(), Position::new(5, 4));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = GameEngine::new(GameConfig::small().with_initial_length(3)).unwrap();
        let mut state = engine.reset();
        let head = state.snake.head();

        assert!(!state.snake.set_pending_direction(Direction::Left));
        engine.step(&mut state);

        assert_eq!(state.snake.heading(), Direction::Right);
        assert_eq!(state.snake.head(), head.moved_in_direction(Direction::Right));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = GameEngine::new(GameConfig::small()).unwrap();
        let mut state = engine.reset();
        state.cause = Some(GameOverCause::SelfCollision);
        state.score = 4;
        let before = state.clone();

        let first = engine.step(&mut state);
        let second = engine.step(&mut state);

        assert_eq!(first, second);
        assert_eq!(
            first,
            TickResult::GameOver {
                cause: GameOverCause::SelfCollision,
                final_score: 4
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_board_cleared() {
        let mut engine = walled(3, 1);
        // Snake fills (1,0),(0,0); food on the last free cell
        let mut state = GameState::new(
            Snake::new(Position::new(1, 0), Direction::Right, 2),
            Some(Position::new(2, 0)),
        );

        let result = engine.step(&mut state);

        assert_eq!(
            result,
            TickResult::GameOver {
                cause: GameOverCause::BoardCleared,
                final_score: 1
            }
        );
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.food, None);
    }

    #[test]
    fn test_walled_scenario() {
        let mut engine = walled(5, 5);
        let mut state = engine.reset();
        state.food = Some(Position::new(0, 0));
        assert_eq!(state.snake.head(), Position::new(2, 2));

        engine.step(&mut state);
        assert_eq!(state.snake.head(), Position::new(3, 2));
        engine.step(&mut state);
        assert_eq!(state.snake.head(), Position::new(4, 2));

        let result = engine.step(&mut state);
        assert_eq!(
            result,
            TickResult::GameOver {
                cause: GameOverCause::WallCollision,
                final_score: 0
            }
        );
    }

    #[test]
    fn test_snake_must_fit() {
        let config = GameConfig::new(5, 5)
            .with_edge_policy(EdgePolicy::Wall)
            .with_initial_length(4);
        assert!(matches!(
            GameEngine::new(config),
            Err(ConfigError::SnakeDoesNotFit { length: 4, .. })
        ));

        // Wrapping lets the body continue past the left edge
        let config = GameConfig::new(5, 5).with_initial_length(4);
        let mut engine = GameEngine::new(config).unwrap();
        assert_eq!(engine.reset().snake.tail(), Position::new(4, 2));

        // But not overlap itself
        let config = GameConfig::new(3, 3).with_initial_length(4);
        assert!(matches!(
            GameEngine::new(config),
            Err(ConfigError::SnakeDoesNotFit { .. })
        ));
    }
}
