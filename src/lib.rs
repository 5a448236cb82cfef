//! Slice Dash - simulation cores for two pocket arcade games
//!
//! Two game modes share one deterministic core:
//! - Slicing: swipe a bounded gesture path to cut tossed targets, avoid bombs
//! - Side-scroller: flap a physics-driven player through scrolling rock gaps
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, gestures, contacts, game state)
//! - `config`: Per-mode game configuration with fail-fast validation
//!
//! This crate is a library consumed by a presentation shell. It never renders,
//! plays audio, or reads input devices: the shell feeds buffered pointer events
//! into [`sim::tick()`] and reads back entity positions, the gesture polyline,
//! score/lives and one-shot [`sim::GameEvent`]s after each tick.

pub mod config;
pub mod sim;

pub use config::{ConfigError, GameConfig, GameMode};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Reference play field (landscape tablet coordinates)
    pub const FRAME_WIDTH: f32 = 1024.0;
    pub const FRAME_HEIGHT: f32 = 768.0;

    /// Maximum pointer samples kept in the gesture path
    pub const GESTURE_MAX_POINTS: usize = 12;
    /// Gesture fade-out duration signalled to the shell on release
    pub const GESTURE_FADE_SECS: f32 = 0.25;
    /// Minimum gap between swoosh sound requests
    pub const SWOOSH_COOLDOWN_SECS: f32 = 0.9;

    /// Seconds between obstacle/target spawns
    pub const SPAWN_INTERVAL: f32 = 3.0;
    /// Vertical gap between a rock pair
    pub const ROCK_GAP: f32 = 150.0;
    /// Lowest random y offset for a rock pair
    pub const ROCK_Y_OFFSET_MIN: i32 = -50;
    /// Rock collision box
    pub const ROCK_WIDTH: f32 = 90.0;
    pub const ROCK_HEIGHT: f32 = 400.0;
    /// Thin invisible body just past a rock pair that awards the point
    pub const SCORE_TRIGGER_WIDTH: f32 = 32.0;
    /// Time a rock pair takes to cross the field before despawning
    pub const ROCK_TRAVEL_SECS: f32 = 6.2;

    /// Player collision radius (both modes)
    pub const PLAYER_RADIUS: f32 = 24.0;
    /// Upward speed set by a flap, replacing any current vertical motion
    pub const FLAP_SPEED: f32 = 400.0;
    /// Downward acceleration in the side-scroller
    pub const SCROLLER_GRAVITY: f32 = -750.0;
    /// Visual tilt per unit of vertical speed
    pub const PLAYER_TILT_FACTOR: f32 = 0.001;
    /// Height of the lethal ground strip along the bottom edge
    pub const GROUND_HEIGHT: f32 = 64.0;

    /// Downward acceleration on tossed slicing targets
    pub const SLICE_GRAVITY: f32 = -650.0;
    /// Tossed target launch speed range (vertical)
    pub const TOSS_SPEED_MIN: f32 = 650.0;
    pub const TOSS_SPEED_MAX: f32 = 900.0;
    /// Sideways drift limit on a toss
    pub const TOSS_DRIFT_MAX: f32 = 200.0;
    /// Target collision radius
    pub const TARGET_RADIUS: f32 = 32.0;
    /// Chance a toss is a bomb instead of a target
    pub const BOMB_CHANCE: f64 = 0.15;

    /// Scroll-loop periods for the parallax layers (one texture width each)
    pub const BACKGROUND_LOOP_SECS: f32 = 20.0;
    pub const GROUND_LOOP_SECS: f32 = 5.0;
}
