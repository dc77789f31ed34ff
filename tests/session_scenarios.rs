//! End-to-end scenarios driven through the public session and tick API

use glam::{IVec2, Vec2};

use tide_leap::consts::*;
use tide_leap::sim::platform::advance_platforms;
use tide_leap::sim::{
    CharacterState, GameEvent, GameState, Platform, PlatformKind, ScoringRules, TickInput,
    launch_velocity, tick,
};
use tide_leap::{HighScoreStore, MemoryStore, Screen, Session, StageTable};

const DT: f32 = 0.1;

fn session_at(stage: u32) -> Session {
    let mut session = Session::new(StageTable::builtin(), MemoryStore::new());
    session.start_at_stage(stage);
    session
}

fn place_on_goal(session: &mut Session) {
    let goal = session.state().goal.center();
    let character = &mut session.state_mut().character;
    character.pos = goal - Vec2::new(CHARACTER_WIDTH, CHARACTER_HEIGHT) / 2.0;
    character.grounded = false;
    character.state = CharacterState::Jumping;
}

#[test]
fn full_charge_launches_straight_up_at_max_power() {
    let mut session = session_at(1);
    session.update(&TickInput::begin(), DT);
    for _ in 0..12 {
        session.update(&TickInput::default(), DT);
    }
    assert_eq!(session.state().character.charge_ratio, 1.0);

    let events = session.update(&TickInput::release(), DT);
    assert!(events.contains(&GameEvent::Jumped { air: false }));

    let (expected, _) = launch_velocity(1.0, IVec2::NEG_Y, 0.0);
    assert!(expected.x.abs() < 1e-4);
    assert!((expected.y + MAX_JUMP_POWER).abs() < 1e-4);

    // The release tick also runs one physics frame
    let character = &session.state().character;
    assert_eq!(character.state, CharacterState::Jumping);
    assert!(character.vel.x.abs() < 1e-3);
    assert!((character.vel.y - (expected.y + GRAVITY)).abs() < 1e-3);
}

#[test]
fn airborne_release_without_air_jump_changes_nothing() {
    let table = StageTable::builtin();
    let mut state = GameState::new(table.get(1), 1, 0, START_LIVES, 0);
    state.character.grounded = false;
    state.character.state = CharacterState::Jumping;
    state.character.has_air_jump = false;
    state.character.pos.y -= 200.0;
    state.character.vel = Vec2::new(1.0, -6.0);
    state.current_platform = None;

    let inputs = [TickInput::begin(), TickInput::default(), TickInput::release()];
    let charged = inputs
        .iter()
        .fold(state.clone(), |s, input| tick(&s, input, 1.0 / 60.0).state);
    let idle = (0..inputs.len()).fold(state, |s, _| {
        tick(&s, &TickInput::default(), 1.0 / 60.0).state
    });

    let character = &charged.character;
    assert!(!character.grounded);
    assert_ne!(character.state, CharacterState::Jumping);
    assert!(character.charge_start.is_none());
    assert_eq!(character.charge_ratio, 0.0);
    assert_eq!(character.air_charge_locked_vx, None);
    assert_eq!(character.vel, idle.character.vel);
    assert_eq!(character.pos, idle.character.pos);
}

#[test]
fn drowning_on_last_life_ends_the_game() {
    let mut session = session_at(1);
    session.state_mut().lives = 1;
    session.state_mut().score = 500;
    let bottom = session.state().character.bottom();
    session.state_mut().water.y = bottom - 5.0;

    let mut events = Vec::new();
    for _ in 0..13 {
        events.extend(session.update(&TickInput::default(), DT));
    }

    assert_eq!(session.screen(), Screen::GameOver);
    let updates = events
        .iter()
        .filter(|e| matches!(e, GameEvent::HighScoreUpdated { .. }))
        .count();
    assert_eq!(updates, 1);
    assert!(events.contains(&GameEvent::LifeLost { lives_left: 0 }));
    assert_eq!(session.store().load_high_score(), 500);
    assert_eq!(session.state().high_score, 500);
}

#[test]
fn drowning_below_high_score_does_not_save() {
    let mut session = Session::new(StageTable::builtin(), MemoryStore::with_score(10_000));
    session.start_game();
    session.state_mut().lives = 1;
    session.state_mut().score = 500;
    let bottom = session.state().character.bottom();
    session.state_mut().water.y = bottom;

    let mut events = Vec::new();
    for _ in 0..13 {
        events.extend(session.update(&TickInput::default(), DT));
    }
    assert_eq!(session.screen(), Screen::GameOver);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, GameEvent::HighScoreUpdated { .. }))
    );
    assert_eq!(session.store().load_high_score(), 10_000);
}

#[test]
fn patrol_platform_bounces_off_right_edge() {
    let table = StageTable::builtin();
    let mut state = GameState::new(table.get(6), 6, 0, START_LIVES, 0);
    let width = 6.0 * BLOCK_SIZE;
    state.platforms[1] = Platform {
        pos: Vec2::new(PLAY_WIDTH - width - 1.0, state.platforms[1].pos.y),
        width,
        block_count: 6,
        kind: PlatformKind::Patrol {
            initial_x: PLAY_WIDTH - width - 1.0,
            direction: 1.0,
            speed: DEFAULT_PATROL_SPEED,
            range: PLAY_WIDTH - width,
        },
    };

    let next = tick(&state, &TickInput::default(), 1.0 / 60.0).state;
    let platform = &next.platforms[1];
    assert_eq!(platform.right(), PLAY_WIDTH);
    assert!(matches!(
        platform.kind,
        PlatformKind::Patrol { direction, .. } if direction == -1.0
    ));

    let mut platforms = next.platforms.clone();
    for _ in 0..200 {
        advance_platforms(&mut platforms);
        assert!(platforms[1].right() <= PLAY_WIDTH);
        assert!(platforms[1].left() >= 0.0);
    }
}

#[test]
fn clear_score_matches_formula() {
    let mut session = session_at(3);
    for _ in 0..30 {
        session.update(&TickInput::default(), DT);
    }
    place_on_goal(&mut session);
    let events = session.update(&TickInput::default(), DT);

    let (stage_score, clear_time) = events
        .iter()
        .find_map(|e| match e {
            GameEvent::StageCleared {
                stage_score,
                clear_time,
            } => Some((*stage_score, *clear_time)),
            _ => None,
        })
        .expect("stage should clear");

    let table = StageTable::builtin();
    let expected = ScoringRules::default().stage_score(table.get(3), 3, clear_time);
    assert_eq!(stage_score, expected);
    assert_eq!(session.state().score, expected);
    assert_eq!(session.screen(), Screen::Cleared);
    assert!((clear_time - 3.1).abs() < 1e-3);
}

#[test]
fn identical_inputs_give_identical_sessions() {
    let inputs: Vec<TickInput> = (0..600)
        .map(|i| match i % 40 {
            0 => TickInput {
                direction: IVec2::new(1, -1),
                charge_begin: true,
                charge_end: false,
            },
            1..=24 => TickInput::direction(1, -1),
            25 => TickInput::release(),
            30..=38 => TickInput::direction(-1, 0),
            _ => TickInput::default(),
        })
        .collect();

    let mut a = session_at(8);
    let mut b = session_at(8);
    for input in &inputs {
        let ea = a.update(input, 1.0 / 60.0);
        let eb = b.update(input, 1.0 / 60.0);
        assert_eq!(ea, eb);
    }
    assert_eq!(a.state(), b.state());
    assert_eq!(a.screen(), b.screen());
}

#[test]
fn campaign_carries_score_between_stages() {
    let mut session = session_at(1);
    let mut total = 0;
    for stage in 1..=3 {
        assert_eq!(session.state().stage, stage);
        place_on_goal(&mut session);
        session.update(&TickInput::default(), DT);
        assert_eq!(session.screen(), Screen::Cleared);
        assert!(session.state().score > total);
        total = session.state().score;
        session.next_stage();
    }
    assert_eq!(session.state().stage, 4);
    assert_eq!(session.state().score, total);
    assert_eq!(session.state().lives, START_LIVES);
}
