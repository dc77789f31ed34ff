//! Character kinematics and collision resolution
//!
//! Gravity and position integrate per frame, not per second: velocities are
//! pixels per 60 Hz frame and each tick advances exactly one frame of them.
//! Only air control and air friction (see `character`) scale with delta time.
//! Changing either half changes every jump arc in the game.

use super::state::{
    Character, CharacterState, Collectible, GameEvent, GameState, Goal, Platform, PlatformKind,
    Water,
};
use crate::consts::*;

/// Add one frame of gravity, capped at terminal fall speed
pub fn apply_gravity(character: &mut Character) {
    if character.is_dead() {
        return;
    }
    character.vel.y = (character.vel.y + GRAVITY).min(MAX_FALL_SPEED);
}

pub fn integrate(character: &mut Character) {
    character.pos += character.vel;
}

/// Land on the first platform crossed from above this frame.
///
/// Runs only while falling. The previous bottom is reconstructed from the
/// current velocity; requiring the bottom to still be within one frame of the
/// platform's underside keeps fast falls from tunnelling through thin
/// platforms without snapping onto ones already passed.
pub fn resolve_landing(character: &mut Character, platforms: &[Platform]) -> Option<usize> {
    let vy = character.vel.y;
    if vy <= 0.0 {
        return None;
    }

    let bottom = character.bottom();
    let prev_bottom = bottom - vy;

    let index = platforms.iter().position(|platform| {
        let overlaps = character.right() > platform.left() + LANDING_INSET
            && character.left() < platform.right() - LANDING_INSET;
        overlaps
            && prev_bottom <= platform.top() + LANDING_TOLERANCE
            && bottom >= platform.top()
            && bottom < platform.bottom() + vy
    })?;

    let platform = &platforms[index];
    character.pos.y = platform.top() - CHARACTER_HEIGHT;
    character.vel.x = match platform.kind {
        PlatformKind::Slippery => character.vel.x.clamp(-MAX_SLIDE_SPEED, MAX_SLIDE_SPEED),
        _ => 0.0,
    };
    character.vel.y = 0.0;
    // A charge begun in the air carries over into a grounded charge
    if character.state != CharacterState::Charging {
        character.state = CharacterState::Idle;
    }
    character.grounded = true;
    character.air_charge_locked_vx = None;
    Some(index)
}

/// Slippery platforms have no friction at all; slide speed is set on landing
/// and kept until the character leaves the platform.
pub fn apply_slippery_friction(_character: &mut Character, _platform: Option<&Platform>) {}

fn leave_ground(character: &mut Character) {
    character.grounded = false;
    if character.state != CharacterState::Charging {
        character.state = CharacterState::Jumping;
    }
}

fn off_platform(character: &Character, platform: &Platform) -> bool {
    character.right() < platform.left() || character.left() > platform.right()
}

/// Become airborne after walking or sliding past a platform edge
pub fn check_fell_off(character: &mut Character, platform: Option<&Platform>) {
    let Some(platform) = platform else {
        return;
    };
    if character.grounded && off_platform(character, platform) {
        leave_ground(character);
    }
}

/// Belt carry while standing on a conveyor
pub fn apply_conveyor(character: &mut Character, platform: Option<&Platform>) {
    let Some(platform) = platform else {
        return;
    };
    if !character.grounded || !matches!(platform.kind, PlatformKind::Conveyor { .. }) {
        return;
    }
    character.pos.x += platform.carry();
    if off_platform(character, platform) {
        character.grounded = false;
        character.state = CharacterState::Jumping;
    }
}

/// Ride along with a patrol platform
pub fn apply_patrol(character: &mut Character, platform: Option<&Platform>) {
    let Some(platform) = platform else {
        return;
    };
    if character.grounded && matches!(platform.kind, PlatformKind::Patrol { .. }) {
        character.pos.x += platform.carry();
    }
}

pub fn clamp_horizontal_speed(character: &mut Character) {
    character.vel.x = character
        .vel
        .x
        .clamp(-MAX_HORIZONTAL_SPEED, MAX_HORIZONTAL_SPEED);
}

/// Leaving one side of the play area re-enters from the other; velocity is kept
pub fn wrap_horizontal(character: &mut Character) {
    if character.pos.x > PLAY_WIDTH {
        character.pos.x = -CHARACTER_WIDTH;
    } else if character.pos.x < -CHARACTER_WIDTH {
        character.pos.x = PLAY_WIDTH;
    }
}

/// Mark every overlapping item collected; returns the first newly collected
pub fn collect(character: &Character, items: &mut [Collectible]) -> Option<usize> {
    if character.is_dead() {
        return None;
    }
    let center = character.center();
    let mut first = None;
    for (i, item) in items.iter_mut().enumerate() {
        if item.collected {
            continue;
        }
        let reach = (CHARACTER_WIDTH / 2.0 + item.size / 2.0) * PICKUP_REACH;
        if center.distance(item.center()) < reach {
            item.collected = true;
            first.get_or_insert(i);
        }
    }
    first
}

/// Super-jump pickup: cancel any charge and launch straight up
pub fn super_jump(character: &mut Character) {
    character.vel.x = 0.0;
    character.vel.y = -SUPER_JUMP_VELOCITY;
    character.state = CharacterState::Jumping;
    character.grounded = false;
    character.charge_start = None;
    character.charge_ratio = 0.0;
}

pub fn touches_goal(character: &Character, goal: &Goal) -> bool {
    character.center().distance(goal.center()) < CHARACTER_WIDTH / 2.0 + goal.size / 2.0
}

pub fn touches_water(character: &Character, water: &Water) -> bool {
    character.bottom() >= water.y
}

/// One physics frame for the character in `state`, in fixed order:
/// gravity, integration, landing, edge checks, platform carry, speed clamp,
/// wrap, pickups.
pub fn step(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let character = &mut state.character;
    if character.is_dead() {
        return;
    }

    apply_gravity(character);
    integrate(character);

    if let Some(index) = resolve_landing(character, &state.platforms) {
        if state.current_platform != Some(index) {
            log::debug!("Landed on platform {index}");
            events.push(GameEvent::Landed { platform: index });
        }
        state.current_platform = Some(index);
    }
    if !character.grounded {
        state.current_platform = None;
    }

    let platform = state.current_platform.and_then(|i| state.platforms.get(i));
    apply_slippery_friction(character, platform);
    check_fell_off(character, platform);
    apply_conveyor(character, platform);
    apply_patrol(character, platform);
    clamp_horizontal_speed(character);
    wrap_horizontal(character);

    if collect(character, &mut state.super_jumps).is_some() {
        log::debug!("Super jump collected");
        super_jump(character);
        events.push(GameEvent::SuperJump);
    }
    if collect(character, &mut state.air_jumps).is_some() {
        log::debug!("Air jump banked");
        character.has_air_jump = true;
        events.push(GameEvent::AirJumpGained);
    }
}
