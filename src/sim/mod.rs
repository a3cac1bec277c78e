//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Session clock only (advanced by tick deltas, never wall time)
//! - Seeded RNG only
//! - Stable iteration order (lights by id)
//! - No rendering or platform dependencies

pub mod arena;
pub mod autopilot;
pub mod flash;
pub mod pattern;
pub mod score;
pub mod spotlight;
pub mod state;
pub mod tick;

pub use arena::{Arena, RestrictedArea};
pub use flash::{Candidate, FlashArbiter, FlashVerdict, candidate_for, nearest_active};
pub use pattern::Pattern;
pub use score::ScoreTracker;
pub use spotlight::{
    AgentSpec, SpotlightAgent, StepOutcome, TargetContext, TargetIntent, agent_specs,
};
pub use state::{Framing, GameEvent, GamePhase, GameSession, RoundClock, Subject};
pub use tick::{TickInput, tick};
