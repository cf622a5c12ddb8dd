use std::collections::VecDeque;

use super::direction::Direction;
use super::grid::Position;

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at the front
    body: VecDeque<Position>,
    /// Current direction of movement
    heading: Direction,
    /// Turn requested since the last tick, applied by the next one
    pending: Option<Direction>,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    ///
    /// Body segments are laid out behind the head, opposite to the heading.
    /// No bounds are applied here; the engine validates the layout against
    /// the grid.
    pub fn new(head: Position, heading: Direction, length: usize) -> Self {
        let (dx, dy) = heading.opposite().delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(dx * i, dy * i))
            .collect();

        Self {
            body,
            heading,
            pending: None,
        }
    }

    /// Build a snake from explicit segments, head first
    pub(crate) fn from_segments(segments: Vec<Position>, heading: Direction) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");
        Self {
            body: segments.into(),
            heading,
            pending: None,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending
    }

    /// Segments from head to tail
    pub fn segments(&self) -> impl Iterator<Item = Position> + '_ {
        self.body.iter().copied()
    }

    /// Request a turn for the next tick
    ///
    /// A reversal of the current heading is ignored while the snake is longer
    /// than one segment. Otherwise the request replaces whatever was pending.
    /// Returns whether the request was accepted.
    pub fn set_pending_direction(&mut self, direction: Direction) -> bool {
        if self.len() > 1 && self.heading.is_opposite(direction) {
            return false;
        }
        self.pending = Some(direction);
        true
    }

    /// Consume the pending turn, if any, and return the heading for this tick
    pub fn apply_pending_direction(&mut self) -> Direction {
        if let Some(direction) = self.pending.take() {
            self.heading = direction;
        }
        self.heading
    }

    /// Move the head to `new_head`, dropping the tail unless the snake grew
    pub fn advance(&mut self, new_head: Position, grew: bool) {
        self.body.push_front(new_head);

        if !grew {
            self.body.pop_back();
        }
    }

    /// Check if position is occupied by any segment
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Check whether moving the head to `pos` would hit the body
    ///
    /// The tail cell is free when the snake is not growing, since it moves
    /// away during the same tick.
    pub fn collides_on_move(&self, pos: Position, grew: bool) -> bool {
        let checked = if grew {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        self.body.iter().take(checked).any(|&segment| segment == pos)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub(crate) fn has_distinct_segments(&self) -> bool {
        self.body
            .iter()
            .enumerate()
            .all(|(i, segment)| !self.body.iter().skip(i + 1).any(|other| other == segment))
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOverCause {
    /// Snake hit the edge of a walled grid
    WallCollision,
    /// Snake hit itself
    SelfCollision,
    /// Snake fills the board, no cell left for food
    BoardCleared,
}

impl GameOverCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverCause::WallCollision => "wall collision",
            GameOverCause::SelfCollision => "self collision",
            GameOverCause::BoardCleared => "board cleared",
        }
    }
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Over,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// `None` only once the board has been cleared
    pub food: Option<Position>,
    pub score: u32,
    pub ticks: u64,
    /// Set once, when the session ends
    pub cause: Option<GameOverCause>,
}

impl GameState {
    /// Create a new running game state
    pub fn new(snake: Snake, food: Option<Position>) -> Self {
        Self {
            snake,
            food,
            score: 0,
            ticks: 0,
            cause: None,
        }
    }

    pub fn session_state(&self) -> SessionState {
        if self.cause.is_some() {
            SessionState::Over
        } else {
            SessionState::Running
        }
    }

    pub fn is_running(&self) -> bool {
        self.cause.is_none()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            segments: self.snake.segments().collect(),
            food: self.food,
            score: self.score,
            state: self.session_state(),
            heading: self.snake.heading(),
            ticks: self.ticks,
            cause: self.cause,
        }
    }
}

/// Read-only copy of everything a host needs to draw a frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Snake segments, head first
    pub segments: Vec<Position>,
    pub food: Option<Position>,
    pub score: u32,
    pub state: SessionState,
    pub heading: Direction,
    pub ticks: u64,
    pub cause: Option<GameOverCause>,
}

impl Snapshot {
    pub fn head(&self) -> Position {
        self.segments[0]
    }

    pub fn is_over(&self) -> bool {
        self.state == SessionState::Over
    }
}
