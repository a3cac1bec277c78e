//! Movement patterns a spotlight follows on its way to the couple
//!
//! A pattern is turned into a finite queue of waypoints up front; the light
//! then consumes it front-to-back.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a spotlight travels toward its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Pattern {
    /// Straight line to the couple
    #[default]
    Direct,
    /// Weaves across the straight line, tightening as it closes in
    Zigzag,
}

impl Pattern {
    pub const ALL: [Pattern; 2] = [Pattern::Direct, Pattern::Zigzag];

    /// Pick a pattern uniformly
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Build the waypoint queue from `from` to `subject`.
    ///
    /// The last waypoint is always exactly `subject`.
    pub fn generate<R: Rng>(self, from: Vec2, subject: Vec2, rng: &mut R) -> VecDeque<Vec2> {
        match self {
            Pattern::Direct => direct_path(subject),
            Pattern::Zigzag => {
                let zigs = rng.random_range(3..=5);
                zigzag_path(from, subject, zigs)
            }
        }
    }
}

/// Single waypoint on the couple
pub fn direct_path(subject: Vec2) -> VecDeque<Vec2> {
    VecDeque::from([subject])
}

/// `zigs + 1` weave points followed by the couple itself.
///
/// Point `i` sits `distance * i/zigs` along the line and
/// `distance/3 * (1 - i/zigs)` off it, alternating sides by parity of `i`.
pub fn zigzag_path(from: Vec2, subject: Vec2, zigs: u32) -> VecDeque<Vec2> {
    let delta = subject - from;
    let distance = delta.length();
    let zig_width = distance / 3.0;
    let angle = delta.y.atan2(delta.x);
    let forward_dir = Vec2::new(angle.cos(), angle.sin());
    let perp_dir = forward_dir.perp();

    let zigs = zigs.max(1);
    let mut points = VecDeque::with_capacity(zigs as usize + 2);
    for i in 0..=zigs {
        let progress = i as f32 / zigs as f32;
        let forward = distance * progress;
        let sign = if i % 2 == 1 { 1.0 } else { -1.0 };
        let side = sign * zig_width * (1.0 - progress);
        points.push_back(from + forward_dir * forward + perp_dir * side);
    }
    points.push_back(subject);
    points
}
