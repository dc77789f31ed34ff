//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, one stream per stage generation
//! - Stable iteration order (platform list order)
//! - Each tick maps a snapshot to a new snapshot
//! - No rendering, input or storage dependencies

pub mod character;
pub mod physics;
pub mod platform;
pub mod rng;
pub mod scoring;
pub mod stage;
pub mod state;
pub mod tick;

pub use character::launch_velocity;
pub use rng::{Mulberry32, stage_seed};
pub use scoring::ScoringRules;
pub use stage::{StageLayout, generate as generate_stage, jump_apex};
pub use state::{
    Camera, Character, CharacterState, Collectible, CollectibleKind, GameEvent, GameState, Goal,
    Platform, PlatformKind, Star, StarKind, Water,
};
pub use tick::{TickInput, TickOutcome, tick};
