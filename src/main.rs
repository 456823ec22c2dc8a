//! Sumo Brawl headless demo
//!
//! Plays a session on autopilot through the same fixed-timestep loop a
//! windowed host would use, logging events as they happen.
//!
//! Usage: `sumo-brawl [tuning.json] [seed]` (set `RUST_LOG=info` or `debug`)

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use sumo_brawl::audio::{AudioManager, LogSink};
    use sumo_brawl::consts::*;
    use sumo_brawl::sim::{GameEvent, GameState, TickInput, tick};
    use sumo_brawl::{HighScores, Tuning};

    /// Uneven frame times, as a real display loop would see
    const FRAME_TIMES: [f32; 4] = [1.0 / 60.0, 1.0 / 48.0, 1.0 / 75.0, 1.0 / 60.0];
    /// Give up after five simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 5;
    /// Seed used when none is given
    const DEFAULT_SEED: u64 = 0x5EED;

    struct Demo {
        state: GameState,
        input: TickInput,
        accumulator: f32,
        audio: AudioManager<LogSink>,
        board: HighScores,
        rank: Option<usize>,
    }

    impl Demo {
        fn new(state: GameState) -> Self {
            Self {
                state,
                input: TickInput {
                    idle_mode: true,
                    ..Default::default()
                },
                accumulator: 0.0,
                audio: AudioManager::new(LogSink),
                board: HighScores::new(),
                rank: None,
            }
        }

        /// Run simulation ticks for one frame
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                let events = self.state.drain_events();
                self.audio.play_events(&events);
                let level = self.state.world.level;
                if let Some(rank) = self.board.record_game_over(&events, level, 0.0) {
                    self.rank = Some(rank);
                }
                for event in &events {
                    report(event);
                }
            }
        }
    }

    fn report(event: &GameEvent) {
        match event {
            GameEvent::Cue(_) => {}
            GameEvent::EnemyEliminated { id, combo, bonus } => {
                log::info!("Enemy {} off the edge: x{combo} combo, +{bonus}", id.0)
            }
            GameEvent::EnemyCaught { id } => log::info!("Enemy {} saved itself", id.0),
            GameEvent::PlayerRespawned { lives } => log::info!("Respawned, {lives} lives left"),
            GameEvent::LevelUp { level } => log::info!("Level {level}"),
            GameEvent::Tutorial(stage) => log::info!("Tutorial stage {stage:?}"),
            GameEvent::LivesExhausted => log::info!("Out of lives"),
            GameEvent::GameOver { score } => log::info!("Game over with {score} points"),
        }
    }

    fn load_tuning(path: Option<String>) -> Tuning {
        let Some(path) = path else {
            return Tuning::default();
        };
        match Tuning::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("{e}; falling back to default tuning");
                Tuning::default()
            }
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Sumo Brawl (headless demo) starting...");

        let mut args = std::env::args().skip(1);
        let tuning = load_tuning(args.next());
        let seed = args
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SEED);

        let state = match GameState::with_tutorial(tuning, seed) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Cannot start session: {e}");
                return;
            }
        };

        let mut demo = Demo::new(state);
        let mut frames = 0;
        while !demo.state.world.game_over && frames < MAX_FRAMES {
            demo.update(FRAME_TIMES[frames as usize % FRAME_TIMES.len()]);
            frames += 1;
        }

        let hud = demo.state.hud();

        println!("seed:   {seed}");
        println!("time:   {:.1}s ({} ticks)", demo.state.world.time, demo.state.world.time_ticks);
        println!("level:  {}", hud.level);
        println!("score:  {}", hud.score);
        println!("lives:  {}", hud.lives);
        match demo.rank {
            Some(rank) => println!("rank:   #{rank}"),
            None => println!("rank:   -"),
        }
        match demo.board.to_json() {
            Ok(json) => println!("board:  {json}"),
            Err(e) => log::warn!("Could not export high scores: {e}"),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a web host; there is no standalone wasm binary
}
