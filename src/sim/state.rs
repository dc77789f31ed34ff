//! Game state and core simulation types
//!
//! A `GameState` is an immutable-per-tick snapshot: `tick` reads one and
//! returns the next.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::scoring::ScoringRules;
use super::stage::{self, StageLayout};
use crate::consts::*;
use crate::stages::StageConfig;

/// Character behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharacterState {
    #[default]
    Idle,
    Charging,
    Jumping,
    Dead,
}

/// The player character. `pos` is the top-left corner of its box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub pos: Vec2,
    pub vel: Vec2,
    pub state: CharacterState,
    /// Stage clock when the current charge began
    pub charge_start: Option<f64>,
    /// Fraction of a full charge, 0..=1
    pub charge_ratio: f32,
    pub grounded: bool,
    pub facing_right: bool,
    /// Banked mid-air jump
    pub has_air_jump: bool,
    /// Horizontal velocity captured when a charge starts airborne; while set,
    /// free air control is suppressed
    pub air_charge_locked_vx: Option<f32>,
    /// Stage clock at death
    pub dead_at: Option<f64>,
    /// Direction buffered during the charge window (straight up by default)
    pub aim: IVec2,
}

impl Character {
    /// Character standing on the ground platform
    pub fn spawn(ground: &Platform) -> Self {
        Self {
            pos: Vec2::new(ground.pos.x + SPAWN_OFFSET_X, ground.top() - CHARACTER_HEIGHT),
            vel: Vec2::ZERO,
            state: CharacterState::Idle,
            charge_start: None,
            charge_ratio: 0.0,
            grounded: true,
            facing_right: true,
            has_air_jump: false,
            air_charge_locked_vx: None,
            dead_at: None,
            aim: IVec2::NEG_Y,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state == CharacterState::Dead
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + CHARACTER_WIDTH
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + CHARACTER_HEIGHT
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(CHARACTER_WIDTH, CHARACTER_HEIGHT) / 2.0
    }
}

/// Platform behaviours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    Static,
    /// Frictionless: landing velocity becomes slide velocity
    Slippery,
    /// Stationary belt that carries a grounded character
    Conveyor { offset: f32, direction: f32 },
    /// Moves back and forth across the play width
    Patrol {
        initial_x: f32,
        direction: f32,
        speed: f32,
        range: f32,
    },
}

/// A platform. `pos` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub pos: Vec2,
    pub width: f32,
    pub block_count: u32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + PLATFORM_HEIGHT
    }

    pub fn is_slippery(&self) -> bool {
        matches!(self.kind, PlatformKind::Slippery)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Immediate strong vertical launch
    SuperJump,
    /// Banks one mid-air jump
    AirJump,
}

/// A one-time pickup. `pos` is the top-left corner of its square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub kind: CollectibleKind,
    pub pos: Vec2,
    pub size: f32,
    pub collected: bool,
    /// Radians; spin for super-jump items, float phase for air-jump items
    pub phase: f32,
}

impl Collectible {
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

/// Stage goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub pos: Vec2,
    pub size: f32,
}

impl Goal {
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }
}

/// Rising water hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Water {
    /// Surface height
    pub y: f32,
    /// Rise per frame
    pub speed: f32,
    pub rising: bool,
    pub wave_phase: f32,
}

impl Water {
    pub fn new(config: &StageConfig) -> Self {
        Self {
            y: GROUND_Y + WATER_START_DEPTH,
            speed: config.water_speed as f32,
            rising: false,
            wave_phase: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub y: f32,
    pub target_y: f32,
}

impl Camera {
    /// Framing used at spawn
    pub fn at_spawn(ground: &Platform) -> Self {
        let y = ground.top() - SCREEN_HEIGHT + CAMERA_SPAWN_OFFSET;
        Self { y, target_y: y }
    }
}

/// Cosmetic star shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StarKind {
    Dot,
    Cross,
    Crescent,
    Sparkle,
}

/// Background decoration (no collision)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub kind: StarKind,
}

/// Events emitted by a tick for the session and outer collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { air: bool },
    Landed { platform: usize },
    SuperJump,
    AirJumpGained,
    StageCleared { stage_score: u64, clear_time: f64 },
    /// Cumulative score beat the stored high score
    HighScoreUpdated { score: u64 },
    LifeLost { lives_left: u8 },
}

/// Complete simulation snapshot (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Stage number (1-based)
    pub stage: u32,
    pub config: StageConfig,
    pub scoring: ScoringRules,
    pub score: u64,
    pub high_score: u64,
    /// Set once this run beat the stored high score
    pub high_score_updated: bool,
    pub lives: u8,
    /// Seconds of play in this stage (pauses excluded, survives respawns)
    pub clock: f64,
    pub character: Character,
    /// Index 0 is always the full-width ground
    pub platforms: Vec<Platform>,
    /// Platform the character is standing on
    pub current_platform: Option<usize>,
    pub super_jumps: Vec<Collectible>,
    pub air_jumps: Vec<Collectible>,
    pub goal: Goal,
    pub water: Water,
    pub camera: Camera,
    pub stars: Vec<Star>,
}

impl GameState {
    /// Fresh state for a stage, generated from the stage's seed
    pub fn new(config: &StageConfig, stage: u32, score: u64, lives: u8, high_score: u64) -> Self {
        let layout = stage::generate(config, stage);
        let character = Character::spawn(&layout.platforms[0]);
        let camera = Camera::at_spawn(&layout.platforms[0]);
        let StageLayout {
            platforms,
            super_jumps,
            air_jumps,
            goal,
            stars,
            water,
        } = layout;

        Self {
            stage,
            config: config.clone(),
            scoring: ScoringRules::default(),
            score,
            high_score,
            high_score_updated: false,
            lives,
            clock: 0.0,
            character,
            platforms,
            current_platform: None,
            super_jumps,
            air_jumps,
            goal,
            water,
            camera,
            stars,
        }
    }

    /// Reset the stage after a lost life: geometry is regenerated from the
    /// stage seed, so it matches the previous attempt exactly. Score, lives
    /// and the stage clock carry over.
    pub fn respawn(&mut self) {
        let fresh = Self::new(&self.config, self.stage, self.score, self.lives, self.high_score);
        *self = Self {
            scoring: self.scoring,
            high_score_updated: self.high_score_updated,
            clock: self.clock,
            ..fresh
        };
    }

    /// Platform the character stands on, if any
    pub fn standing_on(&self) -> Option<&Platform> {
        self.current_platform.and_then(|i| self.platforms.get(i))
    }
}
