//! Tide Leap - vertical platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, physics, character, scoring)
//! - `session`: Screen flow, lives, stage transitions and timers
//! - `stages`: Data-driven stage table
//! - `highscore`: High score persistence collaborators

pub mod highscore;
pub mod session;
pub mod sim;
pub mod stages;

pub use highscore::{HighScoreStore, JsonFileStore, MemoryStore};
pub use session::{Screen, Session};
pub use stages::{PlatformRatios, StageConfig, StageTable};

/// Game configuration constants
///
/// Coordinates are screen pixels with y growing downward. Velocities are in
/// pixels per 60 Hz frame.
pub mod consts {
    use std::f32::consts::PI;

    /// Logical play area
    pub const PLAY_WIDTH: f32 = 390.0;
    pub const SCREEN_HEIGHT: f32 = 844.0;
    /// Top of the ground platform
    pub const GROUND_Y: f32 = SCREEN_HEIGHT - 50.0;

    /// Largest delta (seconds) a single tick will integrate
    pub const MAX_DELTA: f32 = 0.1;
    /// Reference frame rate for delta-scaled terms
    pub const FRAME_RATE: f32 = 60.0;

    /// Character box
    pub const CHARACTER_WIDTH: f32 = 29.0;
    pub const CHARACTER_HEIGHT: f32 = 35.0;
    /// Spawn x offset from the ground platform's left edge
    pub const SPAWN_OFFSET_X: f32 = 50.0;

    /// Per-frame gravity increment
    pub const GRAVITY: f32 = 0.35;
    pub const MAX_FALL_SPEED: f32 = 10.5;
    pub const MAX_HORIZONTAL_SPEED: f32 = 7.0;
    /// Airborne steering strength (not charging)
    pub const AIR_CONTROL: f32 = 0.25;
    /// Airborne steering strength while charging
    pub const AIR_CONTROL_CHARGING: f32 = 0.05;
    /// Horizontal velocity multiplier per frame while airborne
    pub const AIR_FRICTION: f32 = 0.98;
    /// Scales every horizontal launch and steering term
    pub const HORIZONTAL_FACTOR: f32 = 0.7;

    /// Hold time for a full charge (seconds)
    pub const MAX_CHARGE_TIME: f64 = 1.0;
    pub const MIN_JUMP_POWER: f32 = 5.2;
    pub const MAX_JUMP_POWER: f32 = 15.54;
    pub const JUMP_ANGLE_UP: f32 = PI / 2.0;
    pub const JUMP_ANGLE_LEFT: f32 = PI * 0.556;
    pub const JUMP_ANGLE_RIGHT: f32 = PI * 0.444;

    /// Platforms are built from square blocks
    pub const BLOCK_SIZE: f32 = 14.0;
    pub const PLATFORM_HEIGHT: f32 = 14.0;
    /// Horizontal inset on each platform edge for landing overlap
    pub const LANDING_INSET: f32 = 2.0;
    /// How far below a platform top the previous bottom may sit and still land
    pub const LANDING_TOLERANCE: f32 = 4.0;
    /// Margin kept between generated platforms and the play edges
    pub const EDGE_MARGIN: f32 = 10.0;
    /// Widest horizontal step between consecutive generated platforms
    pub const MAX_HORIZONTAL_JUMP: f32 = PLAY_WIDTH * 0.5;

    pub const MAX_SLIDE_SPEED: f32 = 6.0;
    pub const CONVEYOR_SPEED: f32 = 1.5;
    pub const CONVEYOR_SEGMENT_WIDTH: f32 = 7.0;
    pub const DEFAULT_PATROL_SPEED: f32 = 1.5;

    /// Collectibles
    pub const SUPER_JUMP_SIZE: f32 = 32.0;
    pub const SUPER_JUMP_VELOCITY: f32 = 24.0;
    pub const SUPER_JUMP_SPIN: f32 = 0.02;
    pub const AIR_JUMP_SIZE: f32 = 32.0;
    /// Pickup radius relative to the summed bounding radii
    pub const PICKUP_REACH: f32 = 0.8;

    /// Goal (moon)
    pub const GOAL_SIZE: f32 = 80.0;
    /// The goal sits exactly at the apex of a jump with this charge
    pub const GOAL_CHARGE_RATIO: f32 = 0.8;

    /// Water starts this far below the ground
    pub const WATER_START_DEPTH: f32 = 300.0;
    pub const WAVE_SPEED: f32 = 0.05;

    /// Camera keeps the character at this fraction of the screen
    pub const CAMERA_LEAD: f32 = 0.6;
    pub const CAMERA_SMOOTHING: f32 = 0.1;
    pub const CAMERA_SPAWN_OFFSET: f32 = 200.0;

    /// Session
    pub const START_LIVES: u8 = 3;
    /// Delay between death and respawn / game over (seconds)
    pub const DEATH_DELAY: f32 = 1.0;

    /// Stage seed = stage * MUL + ADD
    pub const STAGE_SEED_MUL: u32 = 12345;
    pub const STAGE_SEED_ADD: u32 = 98765;
}
