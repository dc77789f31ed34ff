//! Procedural stage generation
//!
//! A stage is fully determined by its config and stage number. The draw order
//! is fixed: platforms, super-jump items, air-jump items, stars.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::Mulberry32;
use super::state::{
    Collectible, CollectibleKind, Goal, Platform, PlatformKind, Star, StarKind, Water,
};
use crate::consts::*;
use crate::stages::{PlatformRatios, StageConfig};

/// Everything generated for a stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageLayout {
    pub platforms: Vec<Platform>,
    pub super_jumps: Vec<Collectible>,
    pub air_jumps: Vec<Collectible>,
    pub goal: Goal,
    pub stars: Vec<Star>,
    pub water: Water,
}

/// Generate the layout for `stage` from its seeded stream
pub fn generate(config: &StageConfig, stage: u32) -> StageLayout {
    let mut rng = Mulberry32::for_stage(stage);

    let platforms = generate_platforms(config, &mut rng);
    let goal = generate_goal(&platforms);
    let super_jumps = generate_collectibles(
        CollectibleKind::SuperJump,
        config.super_jump_count,
        &platforms,
        &mut rng,
    );
    let air_jumps = generate_collectibles(
        CollectibleKind::AirJump,
        config.air_jump_count,
        &platforms,
        &mut rng,
    );
    let stars = generate_stars(config.total_height_px(), &mut rng);

    log::debug!(
        "Stage {} generated: {} platforms, {} super-jump, {} air-jump, {} stars",
        stage,
        platforms.len(),
        super_jumps.len(),
        air_jumps.len(),
        stars.len()
    );

    StageLayout {
        platforms,
        super_jumps,
        air_jumps,
        goal,
        stars,
        water: Water::new(config),
    }
}

/// Platform type before its per-type fields are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlatformType {
    Static,
    Slippery,
    Conveyor,
    Patrol,
}

/// Weighted type draw. Draws past the cumulative weight fall back to static.
fn pick_type(ratios: &PlatformRatios, rng: &mut Mulberry32) -> PlatformType {
    let roll = rng.next_f64();
    let mut cumulative = 0.0;
    for (weight, ty) in [
        (ratios.standard, PlatformType::Static),
        (ratios.slippery, PlatformType::Slippery),
        (ratios.conveyor, PlatformType::Conveyor),
        (ratios.patrol, PlatformType::Patrol),
    ] {
        cumulative += weight;
        if roll < cumulative {
            return ty;
        }
    }
    PlatformType::Static
}

/// Tiered width draw: a quarter of platforms are wide, a quarter medium, the
/// rest follow the stage's own range.
fn pick_block_count(config: &StageConfig, ty: PlatformType, rng: &mut Mulberry32) -> u32 {
    let tier = rng.next_f64();
    let mut blocks = if tier < 0.25 {
        rng.int(8, 12)
    } else if tier < 0.5 {
        rng.int(6, 10)
    } else {
        rng.int(config.block_count_min, config.block_count_max)
    };

    if ty == PlatformType::Slippery {
        blocks = blocks.max(5);
    }
    blocks.max(4)
}

fn random_direction(rng: &mut Mulberry32) -> f32 {
    if rng.next_f64() < 0.5 { 1.0 } else { -1.0 }
}

/// The full-width floor every stage starts on
pub fn ground_platform() -> Platform {
    Platform {
        pos: Vec2::new(0.0, GROUND_Y),
        width: PLAY_WIDTH,
        block_count: (PLAY_WIDTH / BLOCK_SIZE).ceil() as u32,
        kind: PlatformKind::Static,
    }
}

fn generate_platforms(config: &StageConfig, rng: &mut Mulberry32) -> Vec<Platform> {
    let mut platforms = Vec::with_capacity(config.platform_count as usize + 1);
    platforms.push(ground_platform());

    // Layout math runs in f64; only the stored positions are narrowed
    let play_width = PLAY_WIDTH as f64;
    let block = BLOCK_SIZE as f64;
    let mut y = GROUND_Y as f64 - config.first_platform_gap;
    let mut last_center = play_width / 2.0;

    for i in 0..config.platform_count {
        if i > 0 {
            y -= rng.range(config.gap_min, config.gap_max);
        }

        let ty = pick_type(&config.ratios, rng);
        let block_count = pick_block_count(config, ty, rng);
        let width = block_count as f64 * block;

        // Reachable from the previous platform's center, inside the play area
        let reach = MAX_HORIZONTAL_JUMP as f64;
        let min_x = (EDGE_MARGIN as f64).max(last_center - reach);
        let max_x = (play_width - width - EDGE_MARGIN as f64).min(last_center + reach);
        let x = (rng.range(min_x, max_x) / block).round() * block;

        let kind = match ty {
            PlatformType::Static => PlatformKind::Static,
            PlatformType::Slippery => PlatformKind::Slippery,
            PlatformType::Conveyor => PlatformKind::Conveyor {
                offset: 0.0,
                direction: random_direction(rng),
            },
            PlatformType::Patrol => PlatformKind::Patrol {
                initial_x: x as f32,
                direction: random_direction(rng),
                speed: config.patrol_speed as f32,
                range: PLAY_WIDTH,
            },
        };

        platforms.push(Platform {
            pos: Vec2::new(x as f32, y as f32),
            width: width as f32,
            block_count,
            kind,
        });
        last_center = x + width / 2.0;
    }

    platforms
}

/// Height reached by a jump launched with `charge_ratio`
pub fn jump_apex(charge_ratio: f32) -> f32 {
    let power = MIN_JUMP_POWER + (MAX_JUMP_POWER - MIN_JUMP_POWER) * charge_ratio;
    power * power / (2.0 * GRAVITY)
}

/// Goal sits above the highest platform, just inside an 80%-charge jump
fn generate_goal(platforms: &[Platform]) -> Goal {
    let highest = platforms
        .iter()
        .map(Platform::top)
        .fold(f32::INFINITY, f32::min);
    let offset = CHARACTER_HEIGHT / 2.0 + jump_apex(GOAL_CHARGE_RATIO) + GOAL_SIZE / 2.0;

    Goal {
        pos: Vec2::new(PLAY_WIDTH / 2.0 - GOAL_SIZE / 2.0, highest - offset),
        size: GOAL_SIZE,
    }
}

/// Spread `count` items over equal height bands of the floating platforms,
/// each placed near the platform closest to its band.
fn generate_collectibles(
    kind: CollectibleKind,
    count: u32,
    platforms: &[Platform],
    rng: &mut Mulberry32,
) -> Vec<Collectible> {
    let floating = platforms.get(1..).unwrap_or_default();
    if count == 0 || floating.len() < 2 {
        return Vec::new();
    }

    let lowest_y = floating[0].top() as f64;
    let highest_y = floating[floating.len() - 1].top() as f64;
    let band = (lowest_y - highest_y) / (count + 1) as f64;

    let (size, reach, left_limit, lift) = match kind {
        CollectibleKind::SuperJump => (SUPER_JUMP_SIZE, 50.0, 20.0, (100.0, 200.0)),
        CollectibleKind::AirJump => (AIR_JUMP_SIZE, 80.0, AIR_JUMP_SIZE as f64, (120.0, 200.0)),
    };
    let right_limit = (PLAY_WIDTH - size - 20.0) as f64;

    (0..count)
        .map(|i| {
            let target_y = highest_y + band * (i + 1) as f64;
            let anchor = nearest_platform(floating, target_y);

            let x = rng.range(
                left_limit.max(anchor.left() as f64 - reach),
                right_limit.min(anchor.right() as f64 + reach),
            );
            let y = anchor.top() as f64 - rng.range(lift.0, lift.1);
            let phase = (rng.next_f64() * std::f64::consts::TAU) as f32;

            Collectible {
                kind,
                pos: Vec2::new(x as f32, y as f32),
                size,
                collected: false,
                phase,
            }
        })
        .collect()
}

/// First platform with the smallest vertical distance to `target_y`
fn nearest_platform(platforms: &[Platform], target_y: f64) -> &Platform {
    let mut nearest = &platforms[0];
    let mut best = (nearest.top() as f64 - target_y).abs();
    for platform in platforms {
        let distance = (platform.top() as f64 - target_y).abs();
        if distance < best {
            best = distance;
            nearest = platform;
        }
    }
    nearest
}

fn generate_stars(total_height: f64, rng: &mut Mulberry32) -> Vec<Star> {
    let screen = SCREEN_HEIGHT as f64;
    let count = (total_height / screen * 30.0).floor() as usize;

    (0..count)
        .map(|_| {
            let kind = match (rng.next_f64() * 4.0) as u32 {
                0 => StarKind::Dot,
                1 => StarKind::Cross,
                2 => StarKind::Crescent,
                _ => StarKind::Sparkle,
            };
            let x = (rng.next_f64() * PLAY_WIDTH as f64) as f32;
            let y = -total_height + rng.range(0.0, total_height + screen);
            let size = match kind {
                StarKind::Crescent => 12.0,
                StarKind::Sparkle => 8.0,
                _ => rng.range(2.0, 4.0) as f32,
            };
            Star {
                pos: Vec2::new(x, y as f32),
                size,
                kind,
            }
        })
        .collect()
}
