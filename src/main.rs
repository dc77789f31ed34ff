//! Tide Leap headless driver
//!
//! Runs a session at a fixed 60 Hz step with a simple autopilot and logs the
//! outcome. Renderers and real input live outside this crate.
//!
//! Usage: `tide-leap [--stage N] [--seconds S] [--scores PATH]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on wasm
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use glam::IVec2;

    use tide_leap::sim::{CharacterState, GameEvent, GameState, TickInput, jump_apex};
    use tide_leap::{HighScoreStore, JsonFileStore, MemoryStore, Screen, Session, StageTable};

    const STEP: f32 = 1.0 / 60.0;

    /// Headless Tide Leap run with an autopilot
    #[derive(Parser, Debug)]
    #[command(version, about)]
    struct Cli {
        /// Stage to start on (clamped to the stage table)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        stage: u32,

        /// Simulated seconds to run
        #[arg(long, default_value_t = 300.0)]
        seconds: f32,

        /// JSON file holding the high score (in-memory when omitted)
        #[arg(long, value_name = "PATH")]
        scores: Option<PathBuf>,
    }

    /// Charges toward the nearest platform above and steers in the air
    #[derive(Default)]
    struct Autopilot {
        hold_ticks: Option<u32>,
        aim_x: i32,
        target_x: Option<f32>,
    }

    impl Autopilot {
        fn next_input(&mut self, state: &GameState) -> TickInput {
            let character = &state.character;
            if character.is_dead() {
                *self = Self::default();
                return TickInput::default();
            }

            if let Some(left) = self.hold_ticks {
                if left == 0 {
                    self.hold_ticks = None;
                    return TickInput::release();
                }
                self.hold_ticks = Some(left - 1);
                return TickInput::direction(self.aim_x, -1);
            }

            if character.grounded && character.state == CharacterState::Idle {
                let (target_x, target_top) = state
                    .platforms
                    .iter()
                    .filter(|p| p.top() < character.bottom() - 1.0)
                    .max_by(|a, b| a.top().total_cmp(&b.top()))
                    .map(|p| (p.left() + p.width / 2.0, p.top()))
                    .unwrap_or((state.goal.center().x, state.goal.center().y));

                let rise = character.bottom() - target_top + 24.0;
                let ratio = (0..=20)
                    .map(|step| step as f32 * 0.05)
                    .find(|&r| jump_apex(r) >= rise)
                    .unwrap_or(1.0);
                let dx = target_x - character.center().x;

                self.aim_x = if dx.abs() > 20.0 { dx.signum() as i32 } else { 0 };
                self.target_x = Some(target_x);
                self.hold_ticks = Some((ratio * 60.0).ceil() as u32);
                return TickInput {
                    direction: IVec2::new(self.aim_x, -1),
                    charge_begin: true,
                    charge_end: false,
                };
            }

            match self.target_x {
                Some(x) if character.vel.y > 0.0 && (x - character.center().x).abs() > 10.0 => {
                    TickInput::direction((x - character.center().x).signum() as i32, 0)
                }
                _ => TickInput::default(),
            }
        }
    }

    pub fn run() {
        env_logger::init();
        let cli = Cli::parse();
        log::info!("Tide Leap (headless) starting...");

        let store: Box<dyn HighScoreStore> = match &cli.scores {
            Some(path) => Box::new(JsonFileStore::open(path)),
            None => Box::new(MemoryStore::new()),
        };
        let mut session = Session::new(StageTable::builtin(), store);
        session.start_at_stage(cli.stage);

        let mut autopilot = Autopilot::default();
        let mut jumps = 0u32;
        let mut clears = 0u32;
        let frames = (cli.seconds.max(0.0) / STEP) as u32;

        for _ in 0..frames {
            let input = autopilot.next_input(session.state());
            for event in session.update(&input, STEP) {
                match event {
                    GameEvent::Jumped { .. } => jumps += 1,
                    GameEvent::StageCleared { .. } => clears += 1,
                    _ => {}
                }
            }

            match session.screen() {
                Screen::Cleared => {
                    session.next_stage();
                    autopilot = Autopilot::default();
                }
                Screen::GameOver => break,
                _ => {}
            }
        }

        let state = session.state();
        println!(
            "stage {} | score {} | high score {} | lives {} | jumps {} | clears {} | {:?}",
            state.stage,
            state.score,
            state.high_score,
            state.lives,
            jumps,
            clears,
            session.screen()
        );
    }

}
