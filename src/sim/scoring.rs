//! Stage scoring
//!
//! A clear is worth a flat base plus a bonus for every second left before the
//! stage deadline: the moment the water, rising from its start depth after the
//! grace period, would reach the top of the stage.

use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_RATE, WATER_START_DEPTH};
use crate::stages::StageConfig;

/// Tunable scoring constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringRules {
    pub base_score: f64,
    /// Points per second left before the deadline
    pub time_bonus_multiplier: f64,
    /// Extra multiplier per stage after the first
    pub stage_multiplier_step: f64,
    /// Extra water travel added to the stage height
    pub deadline_margin: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            base_score: 1000.0,
            time_bonus_multiplier: 10.0,
            stage_multiplier_step: 0.222,
            deadline_margin: WATER_START_DEPTH as f64,
        }
    }
}

impl ScoringRules {
    /// Latest theoretical clear time in seconds
    pub fn deadline(&self, config: &StageConfig) -> f64 {
        let height = config.total_height_px() + self.deadline_margin;
        let rise_per_second = config.water_speed * FRAME_RATE as f64;
        config.water_delay_ms as f64 / 1000.0 + height / rise_per_second
    }

    /// Score for clearing `stage` after `clear_time` seconds
    pub fn stage_score(&self, config: &StageConfig, stage: u32, clear_time: f64) -> u64 {
        let bonus = (self.deadline(config) - clear_time).max(0.0) * self.time_bonus_multiplier;
        let multiplier = 1.0 + stage.saturating_sub(1) as f64 * self.stage_multiplier_step;
        ((self.base_score + bonus) * multiplier).floor().max(0.0) as u64
    }
}
