//! Kiss Cam - dodge the roaming spotlights while holding the embrace
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spotlights, flash arbitration, game phases)
//! - `ui`: Per-frame view handed to whatever draws the scene
//! - `platform`: Browser/native platform abstraction (frame clock, input merge)
//! - `persistence`: High score storage
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::HighScore;
pub use settings::{DeviceProfile, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference simulation timestep (display-synchronized, ~60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta the simulation accepts (stalled tab, debugger)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions (internal canvas resolution)
    pub const ARENA_WIDTH: f32 = 900.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Kiss Cam monitor drawn into the background
    pub const MONITOR_X: f32 = 300.0;
    pub const MONITOR_Y: f32 = 30.0;
    pub const MONITOR_W: f32 = 290.0;
    pub const MONITOR_H: f32 = 206.0;
    /// Keep-out margin around the monitor
    pub const MONITOR_BUFFER: f32 = 40.0;

    /// Cameraman figure (keep-out region)
    pub const CAMERAMAN_X: f32 = 600.0;
    pub const CAMERAMAN_Y: f32 = 300.0;
    pub const CAMERAMAN_W: f32 = 200.0;
    pub const CAMERAMAN_H: f32 = 300.0;

    /// Couple sprite size
    pub const SUBJECT_SIZE: f32 = 56.0;
    /// Drawn radius of a spotlight
    pub const LIGHT_RADIUS: f32 = 70.0;
    /// Side of the square cropped into the live preview
    pub const VIEW_SIZE: f32 = 50.0;

    /// Number of spotlights in the scene
    pub const SPOTLIGHT_COUNT: usize = 5;
}

/// Move `from` toward `to` by at most `max_step` without overshooting.
///
/// Returns the new position and whether the target was reached.
/// A zero-length gap counts as already arrived (no normalization).
#[inline]
pub fn step_toward(from: Vec2, to: Vec2, max_step: f32) -> (Vec2, bool) {
    let delta = to - from;
    let dist = delta.length();
    if dist > max_step {
        (from + delta / dist * max_step, false)
    } else {
        (to, true)
    }
}

/// Corner of the quadrant diagonally opposite `p` within the arena
#[inline]
pub fn opposite_corner(p: Vec2, inset: f32) -> Vec2 {
    use consts::{ARENA_HEIGHT, ARENA_WIDTH};
    Vec2::new(
        if p.x > ARENA_WIDTH / 2.0 {
            inset
        } else {
            ARENA_WIDTH - inset
        },
        if p.y > ARENA_HEIGHT / 2.0 {
            inset
        } else {
            ARENA_HEIGHT - inset
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_toward_never_overshoots() {
        let (pos, arrived) = step_toward(Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0);
        assert!(!arrived);
        assert!((pos.x - 4.0).abs() < 0.0001);

        let (pos, arrived) = step_toward(Vec2::ZERO, Vec2::new(3.0, 4.0), 6.0);
        assert!(arrived);
        assert_eq!(pos, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_step_toward_zero_distance() {
        let p = Vec2::new(12.0, 34.0);
        let (pos, arrived) = step_toward(p, p, 0.0);
        assert!(arrived);
        assert!(pos.is_finite());
        assert_eq!(pos, p);
    }

    #[test]
    fn test_opposite_corner() {
        let c = opposite_corner(Vec2::new(700.0, 100.0), 100.0);
        assert_eq!(c, Vec2::new(100.0, 500.0));
        let c = opposite_corner(Vec2::new(200.0, 450.0), 100.0);
        assert_eq!(c, Vec2::new(800.0, 100.0));
    }
}
