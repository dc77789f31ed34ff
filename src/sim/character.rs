//! Character state machine: charging, launching and air control
//!
//! Idle → Charging on charge-begin, Charging → Jumping on release, → Idle on
//! landing (set by the physics step), → Dead on water contact.

use glam::{IVec2, Vec2};

use super::state::{Character, CharacterState};
use crate::consts::*;

/// Launch vector for a charge ratio and aim. `slide` is carried over from a
/// slippery platform.
pub fn launch_velocity(charge_ratio: f32, aim: IVec2, slide: f32) -> (Vec2, bool) {
    let angle = match aim.x.signum() {
        -1 => JUMP_ANGLE_LEFT,
        1 => JUMP_ANGLE_RIGHT,
        _ => JUMP_ANGLE_UP,
    };
    let power = MIN_JUMP_POWER + (MAX_JUMP_POWER - MIN_JUMP_POWER) * charge_ratio;
    let vel = Vec2::new(
        power * angle.cos() * HORIZONTAL_FACTOR + slide,
        -power * angle.sin(),
    );
    let facing_right = if slide != 0.0 { slide > 0.0 } else { aim.x >= 0 };
    (vel, facing_right)
}

impl Character {
    /// Start a charge. Ignored while dead or already charging.
    pub fn begin_charge(&mut self, now: f64) {
        if self.is_dead() || self.charge_start.is_some() {
            return;
        }
        self.charge_start = Some(now);
        self.charge_ratio = 0.0;
        self.state = CharacterState::Charging;
        if !self.grounded {
            // Freeze free air control for the rest of this airborne charge
            self.air_charge_locked_vx = Some(self.vel.x);
        }
    }

    /// Per-tick update while the charge button is held
    pub fn hold_charge(&mut self, now: f64, direction: IVec2, on_slippery: bool, frame: f32) {
        let Some(start) = self.charge_start else {
            return;
        };
        if self.is_dead() {
            return;
        }
        self.charge_ratio = ((now - start) / MAX_CHARGE_TIME).clamp(0.0, 1.0) as f32;

        if self.grounded && !on_slippery && direction != IVec2::ZERO {
            self.aim = direction;
        }
        if !self.grounded && direction.x != 0 {
            self.vel.x += direction.x as f32 * AIR_CONTROL_CHARGING * HORIZONTAL_FACTOR * frame;
        }
    }

    /// Release a charge. Returns true when a jump actually launched.
    ///
    /// Grounded releases always launch. Airborne releases launch only by
    /// spending a banked air jump; otherwise the charge is simply dropped.
    pub fn release_charge(&mut self, on_slippery: bool) -> bool {
        if self.charge_start.is_none() || self.is_dead() {
            return false;
        }

        let launched = if self.grounded {
            let slide = if on_slippery { self.vel.x } else { 0.0 };
            let (vel, facing_right) = launch_velocity(self.charge_ratio, self.aim, slide);
            self.vel = vel;
            self.facing_right = facing_right;
            self.state = CharacterState::Jumping;
            self.grounded = false;
            true
        } else {
            let launched = self.has_air_jump;
            if launched {
                let (vel, facing_right) = launch_velocity(self.charge_ratio, self.aim, 0.0);
                self.vel = vel;
                self.facing_right = facing_right;
                self.state = CharacterState::Jumping;
                self.has_air_jump = false;
            }
            self.air_charge_locked_vx = None;
            launched
        };

        self.charge_start = None;
        self.charge_ratio = 0.0;
        self.aim = IVec2::NEG_Y;
        launched
    }

    /// Free airborne steering and drag. Delta-scaled by `frame` (= dt * 60).
    pub fn apply_air_control(&mut self, direction: IVec2, frame: f32) {
        if self.grounded || self.is_dead() {
            return;
        }
        if self.air_charge_locked_vx.is_none() && direction.x != 0 {
            self.vel.x += direction.x as f32 * AIR_CONTROL * HORIZONTAL_FACTOR * frame;
        }
        self.vel.x *= AIR_FRICTION.powf(frame);
    }

    /// Water contact
    pub fn kill(&mut self, now: f64) {
        self.state = CharacterState::Dead;
        self.vel = Vec2::ZERO;
        self.dead_at = Some(now);
        self.charge_start = None;
        self.charge_ratio = 0.0;
    }
}
