//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here so a balance pass
//! never has to touch simulation code. Partial JSON files are accepted; any
//! missing field keeps its default.

use serde::{Deserialize, Serialize};

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Detection ===
    /// Distance under which a spotlight frames the couple (pixels)
    pub detection_radius: f32,
    /// Distance under which a spotlight counts as having reached its target
    pub arrival_epsilon: f32,

    // === Flash ===
    /// Verdict window after a flash fires (seconds)
    pub flash_duration: f64,
    /// Starting alpha of the flash overlay
    pub flash_intensity: f32,
    /// Minimum spacing between flashes (seconds)
    pub min_flash_interval: f64,
    /// Pause after a missed flash before play resumes (seconds)
    pub cooldown_duration: f64,

    // === Score ===
    /// Points per second while embracing
    pub score_increase_rate: f32,
    /// Points per second lost while not embracing
    pub score_decrease_rate: f32,

    // === Spotlights ===
    /// Light speed on desktop (pixels/second)
    pub light_speed_desktop: f32,
    /// Light speed on touch devices (pixels/second)
    pub light_speed_mobile: f32,
    /// Round time at which each spotlight switches on (seconds, index = id - 1)
    pub activation_times: [f64; 5],

    // === Targeting ===
    /// Base chance of pursuing the couple
    pub pursue_base_chance: f32,
    /// Extra pursue chance per unit of difficulty
    pub pursue_chance_per_difficulty: f32,
    /// Minimum distance a retreating light keeps from the couple
    pub retreat_min_distance: f32,
    /// Attempts for every rejection-sampling loop before falling back
    pub max_placement_attempts: u32,

    // === Difficulty ===
    /// Seconds of round time per +1.0 of difficulty
    pub difficulty_ramp_secs: f32,
    /// Difficulty cap
    pub max_difficulty: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            detection_radius: 35.0,
            arrival_epsilon: 5.0,

            flash_duration: 0.3,
            flash_intensity: 0.4,
            min_flash_interval: 2.0,
            cooldown_duration: 0.8,

            score_increase_rate: 1000.0,
            score_decrease_rate: 300.0,

            light_speed_desktop: 280.0,
            light_speed_mobile: 330.0,
            activation_times: [0.0, 10.0, 30.0, 50.0, 70.0],

            pursue_base_chance: 0.4,
            pursue_chance_per_difficulty: 0.2,
            retreat_min_distance: 200.0,
            max_placement_attempts: 20,

            difficulty_ramp_secs: 30.0,
            max_difficulty: 3.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON, keeping defaults for absent fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Difficulty multiplier for a given round time, in `[1, max_difficulty]`
    pub fn difficulty_at(&self, elapsed_secs: f64) -> f32 {
        let elapsed = elapsed_secs.max(0.0) as f32;
        (1.0 + elapsed / self.difficulty_ramp_secs).min(self.max_difficulty)
    }

    /// Chance that a light goes after the couple instead of roaming
    pub fn pursue_chance(&self, difficulty: f32) -> f32 {
        self.pursue_base_chance + difficulty * self.pursue_chance_per_difficulty
    }

    /// Pacing hint handed to animation/UI when a light picks a target
    pub fn path_duration(&self, difficulty: f32) -> f32 {
        (1.0 - difficulty * 0.2).max(0.3)
    }
}
