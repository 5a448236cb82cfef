//! Per-mode game configuration
//!
//! One `GameConfig` parameterizes the shared scene driver instead of a
//! scene-subclass-per-game: spawn cadence, gap width, gravity and lives are
//! data, not overrides. Validation happens once at construction; the tick
//! itself never fails.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Which of the two games this scene runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Swipe to cut tossed targets; bombs end the run, escaped targets cost lives
    Slicing,
    /// Flap through rock gaps; any obstacle contact ends the run
    SideScroller,
}

/// Invalid configuration detected at construction
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("spawn interval must be positive, got {0}")]
    NonPositiveSpawnInterval(f32),
    #[error("obstacle gap must be non-negative, got {0}")]
    NegativeGap(f32),
    #[error("play field must have positive size, got {0}x{1}")]
    EmptyFrame(f32, f32),
    #[error("at least one life required")]
    ZeroLives,
    #[error("bomb chance must be within [0, 1], got {0}")]
    BombChanceOutOfRange(f64),
}

/// Tunable parameters for one game scene
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub mode: GameMode,
    /// Play field size in pixels
    pub frame_width: f32,
    pub frame_height: f32,
    /// Seconds between spawner firings
    pub spawn_interval: f32,
    /// Vertical gap between a rock pair (difficulty, side-scroller only)
    pub rock_gap: f32,
    /// Downward acceleration applied to gravity-affected bodies
    pub gravity: f32,
    /// Starting lives; 1 means any failure ends the run immediately
    pub lives: u32,
    /// Chance that a slicing toss is a bomb
    pub bomb_chance: f64,
}

impl GameConfig {
    /// Stock slicing game: 3 lives, tossed targets, no rock gap in play
    pub fn slicing() -> Self {
        Self {
            mode: GameMode::Slicing,
            frame_width: FRAME_WIDTH,
            frame_height: FRAME_HEIGHT,
            spawn_interval: SPAWN_INTERVAL,
            rock_gap: ROCK_GAP,
            gravity: SLICE_GRAVITY,
            lives: 3,
            bomb_chance: BOMB_CHANCE,
        }
    }

    /// Stock side-scroller: single life, rock pairs every 3 seconds
    pub fn side_scroller() -> Self {
        Self {
            mode: GameMode::SideScroller,
            frame_width: FRAME_WIDTH,
            frame_height: FRAME_HEIGHT,
            spawn_interval: SPAWN_INTERVAL,
            rock_gap: ROCK_GAP,
            gravity: SCROLLER_GRAVITY,
            lives: 1,
            bomb_chance: 0.0,
        }
    }

    /// Check the invariants a scene relies on during ticks
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn_interval <= 0.0 {
            return Err(ConfigError::NonPositiveSpawnInterval(self.spawn_interval));
        }
        if self.rock_gap < 0.0 {
            return Err(ConfigError::NegativeGap(self.rock_gap));
        }
        if self.frame_width <= 0.0 || self.frame_height <= 0.0 {
            return Err(ConfigError::EmptyFrame(self.frame_width, self.frame_height));
        }
        if self.lives == 0 {
            return Err(ConfigError::ZeroLives);
        }
        if !(0.0..=1.0).contains(&self.bomb_chance) {
            return Err(ConfigError::BombChanceOutOfRange(self.bomb_chance));
        }
        Ok(())
    }
}
