//! Stage table
//!
//! Ordered, immutable stage parameters. The built-in table ships 15 stages;
//! a JSON table with the same shape can replace it for tuning.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_PATROL_SPEED, SCREEN_HEIGHT};

/// Relative weights for the per-platform type draw.
///
/// Weights need not sum to 1; any draw landing past the cumulative total
/// produces a static platform.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlatformRatios {
    #[serde(rename = "static")]
    pub standard: f64,
    pub slippery: f64,
    pub conveyor: f64,
    pub patrol: f64,
}

impl PlatformRatios {
    pub const fn new(standard: f64, slippery: f64, conveyor: f64, patrol: f64) -> Self {
        Self {
            standard,
            slippery,
            conveyor,
            patrol,
        }
    }

    pub fn total(&self) -> f64 {
        self.standard + self.slippery + self.conveyor + self.patrol
    }
}

/// Parameters for one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    pub id: u32,
    pub name: String,
    /// Stage height in screens
    pub total_height: f64,
    pub platform_count: u32,
    /// Vertical distance from the ground to the first platform
    pub first_platform_gap: f64,
    pub block_count_min: u32,
    pub block_count_max: u32,
    pub gap_min: f64,
    pub gap_max: f64,
    pub ratios: PlatformRatios,
    #[serde(default)]
    pub super_jump_count: u32,
    #[serde(default)]
    pub air_jump_count: u32,
    #[serde(default = "default_patrol_speed")]
    pub patrol_speed: f64,
    /// Water rise per frame once rising
    pub water_speed: f64,
    /// Grace period before the water starts rising
    pub water_delay_ms: u32,
    /// Par time in seconds
    pub base_time: f64,
}

fn default_patrol_speed() -> f64 {
    DEFAULT_PATROL_SPEED as f64
}

impl StageConfig {
    /// Stage height in pixels
    pub fn total_height_px(&self) -> f64 {
        self.total_height * SCREEN_HEIGHT as f64
    }

    pub fn water_delay_secs(&self) -> f32 {
        self.water_delay_ms as f32 / 1000.0
    }
}

/// Ordered stage table (stage numbers are 1-based)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTable {
    stages: Vec<StageConfig>,
}

impl Default for StageTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl StageTable {
    /// Parse a table from JSON (`{"stages": [...]}`). Empty tables are rejected.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let table: StageTable = serde_json::from_str(json)?;
        if table.stages.is_empty() {
            return Err(serde::de::Error::custom("stage table has no stages"));
        }
        log::info!("Loaded stage table with {} stages", table.stages.len());
        Ok(table)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn len(&self) -> u32 {
        self.stages.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Whether `stage` is the last configured stage
    pub fn is_last(&self, stage: u32) -> bool {
        stage >= self.len()
    }

    /// Config for a stage number, clamped into the table
    pub fn get(&self, stage: u32) -> &StageConfig {
        let index = stage.clamp(1, self.len().max(1)) as usize - 1;
        &self.stages[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &StageConfig> {
        self.stages.iter()
    }

    /// The shipped 15-stage progression
    pub fn builtin() -> Self {
        let r = PlatformRatios::new;
        let stages = vec![
            stage(1, 5.3, 12, 180.0, (10, 14), (150.0, 200.0), r(1.0, 0.0, 0.0, 0.0), (0, 0), 1.5, 1.0, 45.0),
            stage(2, 5.3, 12, 200.0, (4, 8), (220.0, 280.0), r(1.0, 0.0, 0.0, 0.0), (0, 0), 1.5, 0.8, 50.0),
            stage(3, 5.3, 12, 180.0, (8, 12), (150.0, 200.0), r(0.5, 0.5, 0.0, 0.0), (0, 0), 1.5, 0.8, 55.0),
            stage(4, 5.3, 12, 220.0, (4, 8), (220.0, 280.0), r(0.3, 0.7, 0.0, 0.0), (0, 0), 1.5, 0.8, 60.0),
            stage(5, 6.3, 12, 250.0, (4, 7), (250.0, 300.0), r(0.0, 1.0, 0.0, 0.0), (2, 0), 1.5, 0.8, 65.0),
            stage(6, 8.5, 20, 180.0, (8, 12), (150.0, 220.0), r(0.8, 0.2, 0.0, 0.0), (3, 0), 1.5, 0.8, 85.0),
            stage(7, 8.0, 18, 200.0, (4, 8), (200.0, 260.0), r(0.6, 0.4, 0.0, 0.0), (3, 0), 1.5, 0.8, 80.0),
            stage(8, 6.2, 14, 200.0, (6, 10), (180.0, 250.0), r(0.4, 0.4, 0.2, 0.0), (2, 0), 1.5, 0.8, 65.0),
            stage(9, 7.1, 16, 220.0, (4, 8), (220.0, 280.0), r(0.2, 0.4, 0.4, 0.0), (2, 0), 1.5, 0.8, 75.0),
            stage(10, 7.1, 16, 250.0, (4, 7), (250.0, 300.0), r(0.0, 0.4, 0.6, 0.0), (2, 0), 1.5, 0.8, 80.0),
            // Patrol platforms and air-jump items arrive here
            stage(11, 7.5, 16, 200.0, (6, 10), (180.0, 250.0), r(0.5, 0.2, 0.0, 0.3), (2, 3), 1.2, 0.8, 75.0),
            stage(12, 8.0, 18, 220.0, (5, 9), (200.0, 280.0), r(0.3, 0.3, 0.1, 0.3), (3, 4), 1.5, 0.8, 85.0),
            stage(13, 8.5, 18, 240.0, (4, 8), (220.0, 300.0), r(0.2, 0.3, 0.2, 0.3), (2, 5), 1.8, 0.8, 90.0),
            stage(14, 9.0, 20, 250.0, (4, 7), (240.0, 320.0), r(0.1, 0.3, 0.2, 0.4), (3, 6), 2.0, 0.8, 100.0),
            stage(15, 10.0, 22, 280.0, (4, 6), (260.0, 340.0), r(0.0, 0.3, 0.3, 0.4), (4, 8), 2.2, 0.8, 120.0),
        ];
        Self { stages }
    }
}

#[allow(clippy::too_many_arguments)]
fn stage(
    id: u32,
    total_height: f64,
    platform_count: u32,
    first_platform_gap: f64,
    (block_count_min, block_count_max): (u32, u32),
    (gap_min, gap_max): (f64, f64),
    ratios: PlatformRatios,
    (super_jump_count, air_jump_count): (u32, u32),
    patrol_speed: f64,
    water_speed: f64,
    base_time: f64,
) -> StageConfig {
    StageConfig {
        id,
        name: format!("Stage {id}"),
        total_height,
        platform_count,
        first_platform_gap,
        block_count_min,
        block_count_max,
        gap_min,
        gap_max,
        ratios,
        super_jump_count,
        air_jump_count,
        patrol_speed,
        water_speed,
        water_delay_ms: 8000,
        base_time,
    }
}
