//! Game session and core simulation types
//!
//! Everything the simulation mutates lives in one owned [`GameSession`];
//! there is no ambient global state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::flash::FlashArbiter;
use super::score::ScoreTracker;
use super::spotlight::{SpotlightAgent, TargetContext, agent_specs};
use crate::settings::DeviceProfile;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start command
    Start,
    /// Lights are searching
    Playing,
    /// A picture is being taken; verdict pending
    Flashing,
    /// Short breather after a missed flash
    Cooldown,
    /// Caught on camera
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "start",
            GamePhase::Playing => "playing",
            GamePhase::Flashing => "flashing",
            GamePhase::Cooldown => "cooldown",
            GamePhase::GameOver => "gameover",
        }
    }
}

/// Things the outside world may want to react to (audio, storage, UI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    SpotlightActivated { id: u8 },
    FlashFired { id: u8 },
    FlashMissed { id: u8 },
    CooldownEnded,
    Busted { id: u8, score: u64 },
    NewHighScore { score: u64 },
    Reset,
}

/// The couple
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub pos: Vec2,
}

/// When the current round began (session time)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundClock {
    pub started_at: f64,
}

/// Whether the couple is on the Kiss Cam, and the pose frozen when framing
/// began
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framing {
    pub on_camera: bool,
    pub frozen_embrace: bool,
}

impl Framing {
    /// Update from this tick's range check. The pose freezes on the tick the
    /// couple enters range and thaws when they leave it.
    pub fn update(&mut self, in_range: bool, embracing: bool) {
        if in_range && !self.on_camera {
            self.on_camera = true;
            self.frozen_embrace = embracing;
        } else if !in_range {
            self.on_camera = false;
            self.frozen_embrace = false;
        }
    }

    /// The pose the camera sees
    pub fn displayed_embrace(&self, live: bool) -> bool {
        if self.on_camera {
            self.frozen_embrace
        } else {
            live
        }
    }
}

/// Complete game session (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Rounds begun so far; mixed into the seed at every reset
    pub rounds_started: u32,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub arena: Arena,
    /// Spotlight speed for this device (pixels/second)
    pub light_speed: f32,
    pub phase: GamePhase,
    /// Session time (seconds), advanced by every simulated tick
    pub clock: f64,
    pub round: RoundClock,
    pub subject: Subject,
    /// Spotlights in id order
    pub agents: Vec<SpotlightAgent>,
    pub flash: FlashArbiter,
    pub framing: Framing,
    pub score: ScoreTracker,
    pub high_score: u64,
    /// Whether the round that just ended set a new best
    pub beat_high_score: bool,
    /// Held input as last sampled (not updated while framed)
    pub embrace_live: bool,
    pub cooldown_started: f64,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameSession {
    /// New session with default tuning on a desktop
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), DeviceProfile::Desktop, 0)
    }

    pub fn with_config(seed: u64, tuning: Tuning, device: DeviceProfile, high_score: u64) -> Self {
        let agents = agent_specs(&tuning)
            .iter()
            .map(SpotlightAgent::new)
            .collect();
        let arena = Arena::default();
        let mut session = Self {
            seed,
            rounds_started: 0,
            rng: Pcg32::seed_from_u64(seed),
            light_speed: device.light_speed(&tuning),
            tuning,
            subject: Subject {
                pos: arena.safe_subject_position(),
            },
            arena,
            phase: GamePhase::Start,
            clock: 0.0,
            round: RoundClock::default(),
            agents,
            flash: FlashArbiter::new(),
            framing: Framing::default(),
            score: ScoreTracker::new(),
            high_score,
            beat_high_score: false,
            embrace_live: false,
            cooldown_started: 0.0,
            events: Vec::new(),
        };
        session.reset();
        session.events.clear();
        session
    }

    /// Back to the title screen: new couple spot, lights home, flags cleared
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed.wrapping_add(self.rounds_started as u64));
        self.subject.pos = self
            .arena
            .random_subject_position(&mut self.rng, self.tuning.max_placement_attempts);
        for agent in &mut self.agents {
            agent.reset();
        }
        self.flash = FlashArbiter::new();
        self.framing = Framing::default();
        self.score.reset();
        self.beat_high_score = false;
        self.embrace_live = false;
        self.cooldown_started = 0.0;
        self.round.started_at = self.clock;
        self.phase = GamePhase::Start;
        self.events.push(GameEvent::Reset);
        log::info!(
            "Round reset, couple at ({:.0}, {:.0})",
            self.subject.pos.x,
            self.subject.pos.y
        );
    }

    /// Start command: begin searching
    pub fn start_round(&mut self) {
        if self.phase != GamePhase::Start {
            return;
        }
        self.rounds_started += 1;
        self.round.started_at = self.clock;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::RoundStarted);
        log::info!("Round {} started (seed {})", self.rounds_started, self.seed);
        self.activate_due_agents();
    }

    /// Seconds since the round began
    pub fn round_elapsed(&self) -> f64 {
        self.clock - self.round.started_at
    }

    /// Current difficulty multiplier
    pub fn difficulty(&self) -> f32 {
        self.tuning.difficulty_at(self.round_elapsed())
    }

    /// Switch on every light whose activation time has come
    pub fn activate_due_agents(&mut self) {
        let elapsed = self.round_elapsed();
        for index in 0..self.agents.len() {
            if self.agents[index].is_due(elapsed) {
                self.agents[index].active = true;
                let id = self.agents[index].id;
                self.events.push(GameEvent::SpotlightActivated { id });
                log::info!("Light {} switched on at {:.1}s", id, elapsed);
                self.pick_target_for(index);
            }
        }
    }

    /// Run target selection for light `index`
    pub fn pick_target_for(&mut self, index: usize) {
        let difficulty = self.difficulty();
        let ctx = TargetContext {
            arena: &self.arena,
            tuning: &self.tuning,
            subject: self.subject.pos,
            difficulty,
        };
        self.agents[index].pick_new_target(&ctx, &mut self.rng);
    }

    /// Index of a light by id
    pub fn agent_index(&self, id: u8) -> Option<usize> {
        self.agents.iter().position(|a| a.id == id)
    }

    /// Pose the camera sees right now
    pub fn displayed_embrace(&self) -> bool {
        self.framing.displayed_embrace(self.embrace_live)
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
