//! Seeded stage RNG
//!
//! Mulberry32: a 32-bit state mixer whose output is bit-reproducible for a
//! given seed and call sequence. Stage geometry depends on the exact stream, so
//! every draw the generator makes is part of the layout contract.

use rand::rand_core::impls::{fill_bytes_via_next, next_u64_via_u32};
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::consts::{STAGE_SEED_ADD, STAGE_SEED_MUL};

/// Mulberry32 generator state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Stream for a stage number (1-based). Retries of the same stage see the
    /// same stream.
    pub fn for_stage(stage: u32) -> Self {
        Self::new(stage_seed(stage))
    }

    /// Next float in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }

    /// Uniform integer in [min, max] (inclusive)
    pub fn int(&mut self, min: u32, max: u32) -> u32 {
        let span = max.saturating_sub(min) as f64 + 1.0;
        (self.next_f64() * span).floor() as u32 + min
    }

    /// Uniform float in [min, max)
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        self.next_f64() * (max - min) + min
    }
}

/// Seed for a stage number
pub fn stage_seed(stage: u32) -> u32 {
    stage.wrapping_mul(STAGE_SEED_MUL).wrapping_add(STAGE_SEED_ADD)
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(1 | s);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
