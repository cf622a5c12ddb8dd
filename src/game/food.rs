use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use super::grid::{Grid, Position};
use super::state::Snake;

/// Every cell of the grid is covered by the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no free cell left for food")]
pub struct BoardFull;

/// Picks food cells uniformly among the free cells of the grid
///
/// Placement is fully determined by the seed, so a session can be replayed
/// by reusing it.
pub struct FoodPlacer {
    rng: StdRng,
    seed: u64,
}

impl FoodPlacer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_entropy() -> Self {
        let seed: u64 = rand::thread_rng().gen();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Choose a cell inside the grid that the snake does not occupy
    pub fn place(&mut self, grid: &Grid, snake: &Snake) -> Result<Position, BoardFull> {
        let occupied: HashSet<Position> = snake.segments().collect();
        let free: Vec<Position> = grid.cells().filter(|pos| !occupied.contains(pos)).collect();

        free.choose(&mut self.rng).copied().ok_or(BoardFull)
    }
}
