//! Kiss Cam entry point
//!
//! The browser build is driven from JS through `platform::web::WebGame`.
//! Natively this binary plays seeded rounds headless with the autopilot and
//! prints a JSON summary.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::fs;
    use std::path::PathBuf;

    use clap::Parser;
    use kiss_cam::persistence::{FileStorage, MemoryStorage, Storage};
    use kiss_cam::sim::{GameEvent, GamePhase, GameSession, TickInput, tick};
    use kiss_cam::{DeviceProfile, HighScore, Tuning};
    use serde::Serialize;

    #[derive(Parser, Debug)]
    #[command(author, version, about = "Play Kiss Cam rounds headless with the autopilot")]
    struct Cli {
        /// Session seed
        #[arg(long, default_value_t = 1)]
        seed: u64,
        /// Rounds to play
        #[arg(long, default_value_t = 5)]
        rounds: u32,
        /// Give up on a round after this many simulated seconds
        #[arg(long, default_value_t = 180.0)]
        max_seconds: f64,
        /// Simulation rate (ticks per simulated second)
        #[arg(long, default_value_t = 60)]
        hz: u32,
        /// Device profile setting light speed (desktop or mobile)
        #[arg(long, default_value = "desktop")]
        device: String,
        /// JSON file overriding gameplay tuning
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Directory for the persisted high score
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Write the summary here instead of stdout
        #[arg(long)]
        summary_out: Option<PathBuf>,
    }

    #[derive(Debug, Clone, Serialize)]
    struct RoundSummary {
        round: u32,
        score: u64,
        #[serde(rename = "bustedBy")]
        busted_by: Option<u8>,
        #[serde(rename = "durationSecs")]
        duration_secs: f64,
        flashes: u32,
        misses: u32,
        #[serde(rename = "newHighScore")]
        new_high_score: bool,
    }

    #[derive(Debug, Clone, Serialize)]
    struct RunSummary {
        seed: u64,
        device: &'static str,
        #[serde(rename = "bestScore")]
        best_score: u64,
        #[serde(rename = "highScore")]
        high_score: u64,
        rounds: Vec<RoundSummary>,
    }

    fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning, String> {
        let Some(path) = path else {
            return Ok(Tuning::default());
        };
        let json = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        Tuning::from_json(&json).map_err(|e| format!("bad tuning in {}: {}", path.display(), e))
    }

    fn play_round(session: &mut GameSession, round: u32, dt: f32, max_ticks: u64) -> RoundSummary {
        tick(
            session,
            &TickInput {
                start: true,
                ..Default::default()
            },
            dt,
        );
        let demo = TickInput {
            autopilot: true,
            ..Default::default()
        };

        let mut summary = RoundSummary {
            round,
            score: 0,
            busted_by: None,
            duration_secs: 0.0,
            flashes: 0,
            misses: 0,
            new_high_score: false,
        };
        for _ in 0..max_ticks {
            tick(session, &demo, dt);
            for event in session.drain_events() {
                match event {
                    GameEvent::FlashFired { .. } => summary.flashes += 1,
                    GameEvent::FlashMissed { .. } => summary.misses += 1,
                    GameEvent::Busted { id, .. } => summary.busted_by = Some(id),
                    GameEvent::NewHighScore { .. } => summary.new_high_score = true,
                    _ => {}
                }
            }
            if session.phase == GamePhase::GameOver {
                break;
            }
        }

        summary.score = session.score.score;
        summary.duration_secs = session.round_elapsed();
        log::info!(
            "Round {} finished: {} points in {:.1}s ({} flashes)",
            round,
            summary.score,
            summary.duration_secs,
            summary.flashes
        );

        // Back to the title screen for the next round
        if session.phase == GamePhase::GameOver {
            tick(
                session,
                &TickInput {
                    retry: true,
                    ..Default::default()
                },
                dt,
            );
        } else {
            session.reset();
        }
        session.drain_events();
        summary
    }

    pub fn run() -> i32 {
        let cli = Cli::parse();

        let tuning = match load_tuning(cli.tuning.as_ref()) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                return 2;
            }
        };
        let Some(device) = DeviceProfile::from_str(&cli.device) else {
            log::error!("unknown device {:?}, expected desktop or mobile", cli.device);
            return 2;
        };

        let mut storage: Box<dyn Storage> = match &cli.data_dir {
            Some(dir) => Box::new(FileStorage::new(dir)),
            None => Box::new(MemoryStorage::new()),
        };
        let mut high_score = HighScore::load(&*storage);

        let hz = cli.hz.max(1);
        let dt = 1.0 / hz as f32;
        let max_ticks = (cli.max_seconds.max(0.0) * hz as f64).ceil() as u64;

        let mut session = GameSession::with_config(cli.seed, tuning, device, high_score.best);
        let rounds: Vec<RoundSummary> = (1..=cli.rounds)
            .map(|round| play_round(&mut session, round, dt, max_ticks))
            .collect();

        if high_score.record(session.high_score) {
            high_score.save(&mut *storage);
        }

        let summary = RunSummary {
            seed: cli.seed,
            device: device.as_str(),
            best_score: rounds.iter().map(|r| r.score).max().unwrap_or(0),
            high_score: high_score.best,
            rounds,
        };
        let json = match serde_json::to_string_pretty(&summary) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to encode summary: {}", e);
                return 1;
            }
        };
        match &cli.summary_out {
            Some(path) => {
                if let Err(e) = fs::write(path, json) {
                    log::error!("Failed to write {}: {}", path.display(), e);
                    return 1;
                }
                log::info!("Summary written to {}", path.display());
            }
            None => println!("{json}"),
        }
        0
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Kiss Cam (headless) starting...");
    std::process::exit(headless::run());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_start, this is just to satisfy the compiler
}
