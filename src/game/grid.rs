use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::direction::Direction;

/// A cell coordinate on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// What happens when the snake moves past the edge of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Leaving the grid is a wall collision
    Wall,
    /// Leaving the grid re-enters on the opposite edge
    #[default]
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("position ({}, {}) is outside the grid", .position.x, .position.y)]
pub struct OutOfBounds {
    pub position: Position,
}

/// Fixed-size board. Dimensions and edge policy never change after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    edge_policy: EdgePolicy,
}

impl Grid {
    /// # Panics
    ///
    /// Panics if either dimension does not fit in an `i32` coordinate.
    pub fn new(width: usize, height: usize, edge_policy: EdgePolicy) -> Self {
        assert!(
            i32::try_from(width).is_ok() && i32::try_from(height).is_ok(),
            "grid {}x{} exceeds the coordinate range",
            width,
            height
        );
        Self {
            width,
            height,
            edge_policy,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn edge_policy(&self) -> EdgePolicy {
        self.edge_policy
    }

    /// Number of cells on the board
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn center(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Bring a position onto the board according to the edge policy
    ///
    /// Under [`EdgePolicy::Wall`] anything outside the grid is rejected; under
    /// [`EdgePolicy::Wrap`] the coordinates are reduced modulo the grid size and
    /// this never fails.
    pub fn wrap_or_reject(&self, pos: Position) -> Result<Position, OutOfBounds> {
        if self.contains(pos) {
            return Ok(pos);
        }

        match self.edge_policy {
            EdgePolicy::Wall => Err(OutOfBounds { position: pos }),
            EdgePolicy::Wrap => Ok(Position::new(
                pos.x.rem_euclid(self.width as i32),
                pos.y.rem_euclid(self.height as i32),
            )),
        }
    }

    /// All cells, row by row
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }
}
