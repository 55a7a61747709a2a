//! Drift Arena headless runner
//!
//! Drives the simulation with a scripted pilot at a fixed timestep and logs
//! what happens. Usage: `drift-arena [settings.json] [seconds]`.

#[cfg(not(target_arch = "wasm32"))]
use drift_arena::SimResult;

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use drift_arena::consts::*;
    use drift_arena::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use drift_arena::{Settings, SimResult};

    /// Wall-clock frame length the runner pretends to render at
    const FRAME_DT: f32 = 1.0 / 30.0;

    pub struct Runner {
        state: GameState,
        accumulator: f32,
        input: TickInput,
        asteroids_shot: u32,
        asteroids_destroyed: u32,
        spawns_skipped: u32,
    }

    impl Runner {
        pub fn new(settings: Settings) -> SimResult<Self> {
            Ok(Self {
                state: GameState::new(settings)?,
                accumulator: 0.0,
                input: TickInput::default(),
                asteroids_shot: 0,
                asteroids_destroyed: 0,
                spawns_skipped: 0,
            })
        }

        /// Aim at the nearest vulnerable asteroid, fire, and drift sideways
        fn pilot(&mut self) {
            let ship = self.state.player.position;
            let nearest = self
                .state
                .vulnerable_asteroids()
                .min_by(|a, b| {
                    let da = a.body.position.distance_squared(ship);
                    let db = b.body.position.distance_squared(ship);
                    da.total_cmp(&db)
                })
                .map(|a| a.body.position);

            self.input.aim_target = nearest;
            self.input.shoot = nearest.is_some();
            self.input.strafe = if (self.state.time_ticks / 180) % 2 == 0 { 0.5 } else { -0.5 };
        }

        fn frame(&mut self) -> SimResult<()> {
            self.accumulator += FRAME_DT;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.pilot();
                tick(&mut self.state, &self.input, SIM_DT)?;
                self.accumulator -= SIM_DT;
                substeps += 1;

                for event in &self.state.events {
                    match event {
                        GameEvent::AsteroidShot { .. } => self.asteroids_shot += 1,
                        GameEvent::AsteroidDestroyed { .. } => self.asteroids_destroyed += 1,
                        GameEvent::SpawnSkipped { .. } => self.spawns_skipped += 1,
                        _ => {}
                    }
                }
            }
            Ok(())
        }

        pub fn run(&mut self, seconds: f32) -> SimResult<()> {
            let mut next_report = 1.0;

            while self.state.elapsed < seconds && self.state.phase == GamePhase::Playing {
                self.frame()?;

                if self.state.elapsed >= next_report {
                    next_report += 1.0;
                    log::info!(
                        "t={:5.1}s asteroids={:3} shots={:2} spawn_rate={:.2}/s speed x{:.2}",
                        self.state.elapsed,
                        self.state.live_asteroid_count(),
                        self.state.shots.len(),
                        self.state
                            .settings
                            .spawn
                            .rate_growth
                            .evaluate(self.state.elapsed)?,
                        self.state.speed_multiplier()?,
                    );
                }
            }

            match self.state.phase {
                GamePhase::GameOver => log::info!("Ship destroyed after {:.2}s", self.state.elapsed),
                _ => log::info!("Survived {:.2}s", self.state.elapsed),
            }
            log::info!(
                "Asteroids shot: {}, destroyed in collisions: {}, spawns skipped: {}, ticks: {}",
                self.asteroids_shot,
                self.asteroids_destroyed,
                self.spawns_skipped,
                self.state.time_ticks
            );
            Ok(())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> SimResult<()> {
    use drift_arena::{Settings, SimError};

    env_logger::init();
    log::info!("Drift Arena (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let seconds = match args.next() {
        Some(raw) => raw
            .parse::<f32>()
            .map_err(|e| SimError::Config(format!("invalid duration {:?}: {}", raw, e)))?,
        None => 60.0,
    };

    log::info!("Game initialized with seed: {}", settings.seed);
    headless::Runner::new(settings)?.run(seconds)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is the only wasm deliverable
}
