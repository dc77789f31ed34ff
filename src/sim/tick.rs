//! Per-tick simulation
//!
//! `tick` reads a snapshot and produces the next one. Order is fixed:
//! input → charge/jump → air control → physics → platform motion → goal →
//! water → rising water → camera.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::physics;
use super::platform::advance_platforms;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Directional pad, each component in {-1, 0, 1}
    pub direction: IVec2,
    /// Charge button went down this tick
    pub charge_begin: bool,
    /// Charge button went up this tick
    pub charge_end: bool,
}

impl TickInput {
    pub fn direction(x: i32, y: i32) -> Self {
        Self {
            direction: IVec2::new(x.signum(), y.signum()),
            ..Default::default()
        }
    }

    pub fn begin() -> Self {
        Self {
            charge_begin: true,
            ..Default::default()
        }
    }

    pub fn release() -> Self {
        Self {
            charge_end: true,
            ..Default::default()
        }
    }
}

/// Result of one tick
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

impl TickOutcome {
    pub fn cleared(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::StageCleared { .. }))
    }

    pub fn life_lost(&self) -> Option<u8> {
        self.events.iter().find_map(|e| match e {
            GameEvent::LifeLost { lives_left } => Some(*lives_left),
            _ => None,
        })
    }
}

/// Advance the game by one tick of `dt` seconds (clamped to `MAX_DELTA`)
pub fn tick(state: &GameState, input: &TickInput, dt: f32) -> TickOutcome {
    let dt = dt.clamp(0.0, MAX_DELTA);
    let frame = dt * FRAME_RATE;
    let direction = input.direction.clamp(IVec2::NEG_ONE, IVec2::ONE);

    let mut next = state.clone();
    let mut events = Vec::new();
    next.clock += dt as f64;
    let now = next.clock;

    let on_slippery = next.character.grounded
        && next.standing_on().is_some_and(|p| p.is_slippery());

    // Charge and launch
    let character = &mut next.character;
    if input.charge_begin {
        character.begin_charge(now);
    }
    if !input.charge_end {
        character.hold_charge(now, direction, on_slippery, frame);
    }
    if input.charge_end {
        let airborne = !character.grounded;
        if character.release_charge(on_slippery) {
            log::debug!("Jump launched (air: {airborne})");
            events.push(GameEvent::Jumped { air: airborne });
        }
    }

    character.apply_air_control(direction, frame);

    physics::step(&mut next, &mut events);

    // Platform-local animation
    for item in &mut next.super_jumps {
        item.phase += SUPER_JUMP_SPIN;
    }
    advance_platforms(&mut next.platforms);

    // Goal
    if !next.character.is_dead() && physics::touches_goal(&next.character, &next.goal) {
        let clear_time = next.clock;
        let stage_score = next.scoring.stage_score(&next.config, next.stage, clear_time);
        next.score += stage_score;
        log::info!(
            "Stage {} cleared in {:.2}s for {} points (total {})",
            next.stage,
            clear_time,
            stage_score,
            next.score
        );
        events.push(GameEvent::StageCleared {
            stage_score,
            clear_time,
        });
        record_high_score(&mut next, &mut events);
        return TickOutcome {
            state: next,
            events,
        };
    }

    // Water
    if !next.character.is_dead() && physics::touches_water(&next.character, &next.water) {
        next.character.kill(now);
        next.lives = next.lives.saturating_sub(1);
        log::info!("Life lost on stage {} ({} left)", next.stage, next.lives);
        events.push(GameEvent::LifeLost {
            lives_left: next.lives,
        });
        if next.lives == 0 {
            record_high_score(&mut next, &mut events);
        }
    }

    if next.water.rising {
        next.water.y -= next.water.speed;
        next.water.wave_phase += WAVE_SPEED * FRAME_RATE;
    }

    let target = next.character.pos.y - SCREEN_HEIGHT * CAMERA_LEAD;
    next.camera.target_y = target;
    next.camera.y += (target - next.camera.y) * CAMERA_SMOOTHING;

    TickOutcome {
        state: next,
        events,
    }
}

fn record_high_score(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.score > state.high_score {
        state.high_score = state.score;
        state.high_score_updated = true;
        log::info!("New high score: {}", state.score);
        events.push(GameEvent::HighScoreUpdated { score: state.score });
    }
}
