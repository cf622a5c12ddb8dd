use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::direction::Direction;
use super::grid::EdgePolicy;

/// Largest board accepted; food placement walks every cell
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Whether the edges are walls or wrap around
    pub edge_policy: EdgePolicy,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Heading of the snake at start and after every restart
    pub initial_direction: Direction,
    /// Points awarded per food eaten
    pub food_reward: u32,
    /// Seed for food placement; drawn at random when unset
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("grid {width}x{height} is too large, at most {max_cells} cells are supported")]
    GridTooLarge {
        width: usize,
        height: usize,
        max_cells: usize,
    },
    #[error("initial snake length must be at least 1")]
    ZeroLength,
    #[error("snake of length {length} heading {direction:?} does not fit on a {width}x{height} grid")]
    SnakeDoesNotFit {
        length: usize,
        direction: Direction,
        width: usize,
        height: usize,
    },
    #[error("no free cell left for food on a {width}x{height} grid with a snake of length {length}")]
    NoRoomForFood {
        length: usize,
        width: usize,
        height: usize,
    },
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            edge_policy: EdgePolicy::Wrap,
            initial_snake_length: 1,
            initial_direction: Direction::Right,
            food_reward: 1,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn with_edge_policy(mut self, edge_policy: EdgePolicy) -> Self {
        self.edge_policy = edge_policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_initial_length(mut self, length: usize) -> Self {
        self.initial_snake_length = length;
        self
    }

    /// Checks that don't need the grid geometry
    ///
    /// The snake layout itself is checked when the engine is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        let too_large = ConfigError::GridTooLarge {
            width: self.grid_width,
            height: self.grid_height,
            max_cells: MAX_GRID_CELLS,
        };
        if i32::try_from(self.grid_width).is_err() || i32::try_from(self.grid_height).is_err() {
            return Err(too_large);
        }
        let area = match self.grid_width.checked_mul(self.grid_height) {
            Some(area) if area <= MAX_GRID_CELLS => area,
            _ => return Err(too_large),
        };
        if self.initial_snake_length == 0 {
            return Err(ConfigError::ZeroLength);
        }
        if self.initial_snake_length >= area {
            return Err(ConfigError::NoRoomForFood {
                length: self.initial_snake_length,
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        Ok(())
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.initial_snake_length, 1);
        assert_eq!(config.edge_policy, EdgePolicy::Wrap);
        assert_eq!(config.food_reward, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 12).with_edge_policy(EdgePolicy::Wall).with_seed(9);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 12);
        assert_eq!(config.edge_policy, EdgePolicy::Wall);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            GameConfig::new(0, 5).validate(),
            Err(ConfigError::EmptyGrid { width: 0, height: 5 })
        );
        assert_eq!(
            GameConfig::small().with_initial_length(0).validate(),
            Err(ConfigError::ZeroLength)
        );
        assert!(matches!(
            GameConfig::new(2, 2).with_initial_length(4).validate(),
            Err(ConfigError::NoRoomForFood { .. })
        ));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        assert!(matches!(
            GameConfig::new(usize::MAX / 2 + 1, 3).validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
        assert!(matches!(
            GameConfig::new((1 << 32) + 5, 5).validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
        assert!(matches!(
            GameConfig::new(1, i32::MAX as usize + 1).validate(),
            Err(ConfigError::GridTooLarge { .. })
        ));
        assert!(matches!(
            GameConfig::new(2048, 1024).validate(),
            Err(ConfigError::GridTooLarge { max_cells: MAX_GRID_CELLS, .. })
        ));
        assert!(GameConfig::new(1024, 1024).validate().is_ok());
    }

    #[test]
    fn test_load_partial_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snake.json");
        std::fs::write(&path, r#"{ "grid_width": 8, "edge_policy": "wall", "seed": 5 }"#).unwrap();

        let config = GameConfig::from_json_file(&path).unwrap();
        assert_eq!(config.grid_width, 8);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.edge_policy, EdgePolicy::Wall);
        assert_eq!(config.seed, Some(5));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = GameConfig::from_json_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
