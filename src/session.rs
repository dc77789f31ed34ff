//! Session controller
//!
//! Owns the screen flow, the stage table, the high score store and the two
//! one-shot timers (water delay, post-death delay). `update` drives the
//! simulation one tick at a time while playing.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::highscore::{HighScoreStore, MemoryStore};
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::stages::StageTable;

/// Current screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Title,
    Playing,
    Paused,
    Cleared,
    GameOver,
}

/// Single-shot countdown advanced by the session's tick delta
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    pub remaining: f32,
}

impl Timer {
    pub fn after(secs: f32) -> Self {
        Self {
            remaining: secs.max(0.0),
        }
    }

    /// Returns true once the timer has expired
    pub fn advance(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        self.remaining <= 0.0
    }
}

/// What happens when the post-death timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathOutcome {
    Respawn,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingDeath {
    pub timer: Timer,
    pub outcome: DeathOutcome,
}

impl PendingDeath {
    fn for_lives(lives: u8) -> Self {
        Self {
            timer: Timer::after(DEATH_DELAY),
            outcome: if lives == 0 {
                DeathOutcome::GameOver
            } else {
                DeathOutcome::Respawn
            },
        }
    }
}

/// A play session from title screen to game over
pub struct Session<S: HighScoreStore = MemoryStore> {
    table: StageTable,
    store: S,
    screen: Screen,
    state: GameState,
    water_timer: Option<Timer>,
    pending_death: Option<PendingDeath>,
}

impl<S: HighScoreStore> Session<S> {
    pub fn new(table: StageTable, store: S) -> Self {
        let high_score = store.load_high_score();
        let state = GameState::new(table.get(1), 1, 0, START_LIVES, high_score);
        Self {
            table,
            store,
            screen: Screen::Title,
            state,
            water_timer: None,
            pending_death: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for tooling and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn table(&self) -> &StageTable {
        &self.table
    }

    pub fn water_timer_armed(&self) -> bool {
        self.water_timer.is_some()
    }

    pub fn death_timer_armed(&self) -> bool {
        self.pending_death.is_some()
    }

    /// Title or game over → stage 1 with a fresh score and lives
    pub fn start_game(&mut self) {
        if matches!(self.screen, Screen::Title | Screen::GameOver) {
            self.begin_stage(1, 0, START_LIVES);
        }
    }

    /// Jump straight into a stage with a fresh score and lives
    pub fn start_at_stage(&mut self, stage: u32) {
        let stage = stage.clamp(1, self.table.len());
        self.begin_stage(stage, 0, START_LIVES);
    }

    pub fn pause(&mut self) {
        if self.screen != Screen::Playing {
            return;
        }
        self.screen = Screen::Paused;
        self.cancel_timers();
        log::info!("Paused on stage {}", self.state.stage);
    }

    pub fn resume(&mut self) {
        if self.screen != Screen::Paused {
            return;
        }
        self.screen = Screen::Playing;
        if self.state.character.is_dead() {
            self.pending_death = Some(PendingDeath::for_lives(self.state.lives));
        } else if !self.state.water.rising {
            self.arm_water_timer();
        }
        log::info!("Resumed stage {}", self.state.stage);
    }

    /// Abandon the paused run and start over from stage 1
    pub fn restart(&mut self) {
        if self.screen == Screen::Paused {
            self.begin_stage(1, 0, START_LIVES);
        }
    }

    /// Cleared → the following stage, or a fresh run once the table is exhausted
    pub fn next_stage(&mut self) {
        if self.screen != Screen::Cleared {
            return;
        }
        let stage = self.state.stage;
        if self.table.is_last(stage) {
            log::info!("All {} stages cleared, starting over", self.table.len());
            self.begin_stage(1, 0, START_LIVES);
        } else {
            self.begin_stage(stage + 1, self.state.score, self.state.lives);
        }
    }

    /// Abandon the current run; the title shows a fresh stage 1
    pub fn return_to_title(&mut self) {
        self.cancel_timers();
        let high_score = self.store.load_high_score().max(self.state.high_score);
        self.state = GameState::new(self.table.get(1), 1, 0, START_LIVES, high_score);
        self.screen = Screen::Title;
    }

    /// Advance one frame. Does nothing unless playing.
    pub fn update(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        if self.screen != Screen::Playing {
            return Vec::new();
        }
        let dt = dt.clamp(0.0, MAX_DELTA);

        if self.water_timer.as_mut().is_some_and(|t| t.advance(dt)) {
            self.water_timer = None;
            self.state.water.rising = true;
            log::debug!("Water started rising on stage {}", self.state.stage);
        }

        let mut fired = None;
        if let Some(pending) = self.pending_death.as_mut() {
            if pending.timer.advance(dt) {
                fired = Some(pending.outcome);
            }
        }
        if let Some(outcome) = fired {
            self.pending_death = None;
            match outcome {
                DeathOutcome::Respawn => {
                    log::debug!("Respawning on stage {}", self.state.stage);
                    self.state.respawn();
                    self.arm_water_timer();
                }
                DeathOutcome::GameOver => {
                    self.state.high_score = self.state.high_score.max(self.state.score);
                    self.screen = Screen::GameOver;
                    log::info!(
                        "Game over on stage {} with {} points",
                        self.state.stage,
                        self.state.score
                    );
                    return Vec::new();
                }
            }
        }

        let outcome = tick(&self.state, input, dt);
        self.state = outcome.state;

        for event in &outcome.events {
            match *event {
                GameEvent::StageCleared { .. } => {
                    self.water_timer = None;
                    self.screen = Screen::Cleared;
                }
                GameEvent::HighScoreUpdated { score } => {
                    self.store.save_high_score(score);
                }
                GameEvent::LifeLost { lives_left } => {
                    self.water_timer = None;
                    self.pending_death = Some(PendingDeath::for_lives(lives_left));
                }
                _ => {}
            }
        }

        outcome.events
    }

    fn begin_stage(&mut self, stage: u32, score: u64, lives: u8) {
        let high_score = self.store.load_high_score().max(self.state.high_score);
        self.state = GameState::new(self.table.get(stage), stage, score, lives, high_score);
        self.screen = Screen::Playing;
        self.pending_death = None;
        self.arm_water_timer();
        log::info!(
            "Stage {} ({}) started: score {}, lives {}",
            stage,
            self.state.config.name,
            score,
            lives
        );
    }

    fn arm_water_timer(&mut self) {
        self.water_timer = Some(Timer::after(self.state.config.water_delay_secs()));
    }

    fn cancel_timers(&mut self) {
        self.water_timer = None;
        self.pending_death = None;
    }
}

impl Default for Session<MemoryStore> {
    fn default() -> Self {
        Self::new(StageTable::builtin(), MemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.1;

    fn playing(stage: u32) -> Session {
        let mut session = Session::default();
        session.start_at_stage(stage);
        session
    }

    fn drown(session: &mut Session) {
        let bottom = session.state().character.bottom();
        session.state_mut().water.y = bottom - 1.0;
    }

    #[test]
    fn test_new_session_is_on_title() {
        let mut session = Session::default();
        assert_eq!(session.screen(), Screen::Title);
        assert!(session.update(&TickInput::default(), DT).is_empty());
        assert!(!session.water_timer_armed());
    }

    #[test]
    fn test_start_game_arms_water_timer() {
        let mut session = Session::default();
        session.start_game();
        assert_eq!(session.screen(), Screen::Playing);
        assert_eq!(session.state().stage, 1);
        assert_eq!(session.state().lives, START_LIVES);
        assert!(session.water_timer_armed());
    }

    #[test]
    fn test_water_starts_rising_after_delay() {
        let mut session = playing(1);
        let delay = session.state().config.water_delay_secs();
        let ticks = (delay / DT).round() as usize;
        for _ in 0..ticks - 5 {
            session.update(&TickInput::default(), DT);
        }
        assert!(!session.state().water.rising);
        for _ in 0..10 {
            session.update(&TickInput::default(), DT);
        }
        assert!(session.state().water.rising);
        assert!(!session.water_timer_armed());
    }

    #[test]
    fn test_pause_cancels_and_resume_rearms() {
        let mut session = playing(1);
        session.pause();
        assert_eq!(session.screen(), Screen::Paused);
        assert!(!session.water_timer_armed());

        let before = session.state().clone();
        session.update(&TickInput::begin(), DT);
        assert_eq!(session.state(), &before);

        session.resume();
        assert_eq!(session.screen(), Screen::Playing);
        assert!(session.water_timer_armed());
    }

    #[test]
    fn test_resume_skips_water_timer_when_rising() {
        let mut session = playing(1);
        session.state_mut().water.rising = true;
        session.pause();
        session.resume();
        assert!(!session.water_timer_armed());
    }

    #[test]
    fn test_death_then_respawn() {
        let mut session = playing(2);
        drown(&mut session);
        let events = session.update(&TickInput::default(), DT);
        assert!(events.contains(&GameEvent::LifeLost { lives_left: 2 }));
        assert!(session.death_timer_armed());
        assert!(!session.water_timer_armed());

        for _ in 0..12 {
            session.update(&TickInput::default(), DT);
        }
        assert!(!session.state().character.is_dead());
        assert_eq!(session.state().lives, 2);
        assert!(session.water_timer_armed());
        assert!(!session.state().water.rising);
        assert_eq!(session.screen(), Screen::Playing);
    }

    #[test]
    fn test_resume_while_dead_rearms_death_timer() {
        let mut session = playing(1);
        drown(&mut session);
        session.update(&TickInput::default(), DT);
        session.pause();
        assert!(!session.death_timer_armed());
        session.resume();
        assert!(session.death_timer_armed());
        assert!(!session.water_timer_armed());
    }

    #[test]
    fn test_last_life_leads_to_game_over() {
        let mut session = playing(1);
        session.state_mut().lives = 1;
        drown(&mut session);
        session.update(&TickInput::default(), DT);
        for _ in 0..12 {
            session.update(&TickInput::default(), DT);
        }
        assert_eq!(session.screen(), Screen::GameOver);

        session.start_game();
        assert_eq!(session.screen(), Screen::Playing);
        assert_eq!(session.state().lives, START_LIVES);
        assert_eq!(session.state().score, 0);
    }

    #[test]
    fn test_clear_then_next_stage_keeps_score() {
        let mut session = playing(1);
        let goal = session.state().goal.center();
        let character = &mut session.state_mut().character;
        character.pos = goal - glam::Vec2::new(CHARACTER_WIDTH, CHARACTER_HEIGHT) / 2.0;
        character.grounded = false;

        session.update(&TickInput::default(), DT);
        assert_eq!(session.screen(), Screen::Cleared);
        assert!(!session.water_timer_armed());
        let score = session.state().score;
        assert!(score > 0);
        assert_eq!(session.store().load_high_score(), score);

        session.next_stage();
        assert_eq!(session.screen(), Screen::Playing);
        assert_eq!(session.state().stage, 2);
        assert_eq!(session.state().score, score);
        assert_eq!(session.state().clock, 0.0);
    }

    #[test]
    fn test_next_stage_wraps_after_last() {
        let mut session = Session::default();
        let last = session.table().len();
        session.start_at_stage(last);
        session.state_mut().score = 5000;
        let goal = session.state().goal.center();
        session.state_mut().character.pos =
            goal - glam::Vec2::new(CHARACTER_WIDTH, CHARACTER_HEIGHT) / 2.0;
        session.state_mut().character.grounded = false;
        session.update(&TickInput::default(), DT);
        assert_eq!(session.screen(), Screen::Cleared);

        session.next_stage();
        assert_eq!(session.state().stage, 1);
        assert_eq!(session.state().score, 0);
        assert_eq!(session.state().lives, START_LIVES);
    }

    #[test]
    fn test_restart_from_pause() {
        let mut session = playing(5);
        session.pause();
        session.restart();
        assert_eq!(session.screen(), Screen::Playing);
        assert_eq!(session.state().stage, 1);
        assert!(session.water_timer_armed());
    }

    #[test]
    fn test_return_to_title_cancels_timers() {
        let mut session = playing(1);
        drown(&mut session);
        session.update(&TickInput::default(), DT);
        session.return_to_title();
        assert_eq!(session.screen(), Screen::Title);
        assert!(!session.water_timer_armed());
        assert!(!session.death_timer_armed());
    }

    #[test]
    fn test_return_to_title_resets_the_run() {
        let mut session = Session::new(StageTable::builtin(), MemoryStore::with_score(777));
        session.start_at_stage(7);
        session.state_mut().score = 300;
        drown(&mut session);
        session.update(&TickInput::default(), DT);
        assert!(session.state().character.is_dead());

        session.return_to_title();
        let fresh = GameState::new(session.table().get(1), 1, 0, START_LIVES, 777);
        assert_eq!(session.state(), &fresh);

        // Nothing moves on the title screen
        session.update(&TickInput::begin(), DT);
        assert_eq!(session.state(), &fresh);
    }

    #[test]
    fn test_start_at_stage_clamps() {
        let mut session = Session::default();
        session.start_at_stage(999);
        assert_eq!(session.state().stage, session.table().len());
        session.start_at_stage(0);
        assert_eq!(session.state().stage, 1);
    }

    #[test]
    fn test_timer() {
        let mut timer = Timer::after(0.25);
        assert!(!timer.advance(0.1));
        assert!(!timer.advance(0.1));
        assert!(timer.advance(0.1));
    }
}
