//! Per-frame view of the session
//!
//! Everything a front end needs to draw one frame, derived read-only from
//! the simulation. Serializes to JSON for the browser.

use glam::Vec2;
use serde::Serialize;

use crate::consts::{LIGHT_RADIUS, SUBJECT_SIZE, VIEW_SIZE};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameSession, nearest_active};

/// Pose drawn for the couple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pose {
    Hugging,
    Talking,
}

/// One lit spotlight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LightView {
    pub id: u8,
    pub pos: Vec2,
    pub radius: f32,
}

/// Crop of the arena shown on the Kiss Cam monitor
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preview {
    /// Top-left corner of the crop, whole pixels
    pub origin: Vec2,
    pub size: f32,
    /// The couple is on camera
    pub live: bool,
}

impl Preview {
    fn centered_on(center: Vec2, live: bool) -> Self {
        Self {
            origin: (center - Vec2::splat(VIEW_SIZE / 2.0)).round(),
            size: VIEW_SIZE,
            live,
        }
    }
}

/// Shown once the couple is caught
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameOverSummary {
    pub score: u64,
    pub high_score: u64,
    pub new_high_score: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub subject: Vec2,
    /// Side of the couple sprite, centred on `subject`
    pub subject_size: f32,
    pub pose: Pose,
    pub lights: Vec<LightView>,
    /// White overlay strength, zero outside a flash
    pub flash_alpha: f32,
    pub preview: Option<Preview>,
    pub game_over: Option<GameOverSummary>,
}

impl FrameView {
    pub fn capture(state: &GameSession, settings: &Settings) -> Self {
        let pose = if state.displayed_embrace() {
            Pose::Hugging
        } else {
            Pose::Talking
        };

        let lights = state
            .agents
            .iter()
            .filter(|a| a.active)
            .map(|a| LightView {
                id: a.id,
                pos: a.pos,
                radius: LIGHT_RADIUS,
            })
            .collect();

        let flash_alpha = if state.phase == GamePhase::Flashing {
            settings.effective_flash_alpha(state.flash.alpha)
        } else {
            0.0
        };

        // The monitor follows the nearest light, and locks onto the couple
        // once they are framed
        let live = state.framing.on_camera;
        let preview = if live {
            Some(Preview::centered_on(state.subject.pos, true))
        } else {
            nearest_active(&state.agents, state.subject.pos)
                .map(|(i, _)| Preview::centered_on(state.agents[i].pos, false))
        };

        let game_over = (state.phase == GamePhase::GameOver).then(|| GameOverSummary {
            score: state.score.score,
            high_score: state.high_score,
            new_high_score: state.beat_high_score,
        });

        Self {
            phase: state.phase,
            score: state.score.score,
            high_score: state.high_score,
            subject: state.subject.pos,
            subject_size: SUBJECT_SIZE,
            pose,
            lights,
            flash_alpha,
            preview,
            game_over,
        }
    }
}
