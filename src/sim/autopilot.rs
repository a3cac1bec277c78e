//! Demo autopilot
//!
//! Plays the attract mode and the headless simulator: keep embracing while
//! every light is comfortably far away, let go as soon as one closes in.

use super::flash::nearest_active;
use super::state::GameSession;

/// Distance beyond the detection radius at which the autopilot lets go
pub const CAUTION_MARGIN: f32 = 60.0;

/// Whether the autopilot holds the embrace this tick
pub fn wants_embrace(state: &GameSession) -> bool {
    let caution = state.tuning.detection_radius + CAUTION_MARGIN;
    match nearest_active(&state.agents, state.subject.pos) {
        Some((_, distance)) => distance > caution,
        None => true,
    }
}
