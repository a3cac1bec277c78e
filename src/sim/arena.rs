//! Arena geometry: keep-out rectangles and random placement
//!
//! Neither the couple nor a spotlight target may ever resolve inside the
//! monitor or the cameraman. Every sampler here is bounded and ends in a
//! deterministic fallback, so placement can never spin forever.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::opposite_corner;

/// Inset of the roaming box from the left/right edges
pub const ROAM_INSET_X: f32 = 60.0;
/// Inset of the roaming box from the top/bottom edges
pub const ROAM_INSET_Y: f32 = 80.0;
/// Inset of the retreat fallback corner
pub const RETREAT_CORNER_INSET: f32 = 100.0;

/// Axis-aligned keep-out rectangle (edges inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestrictedArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RestrictedArea {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Monitor plus its buffer
    pub const fn monitor() -> Self {
        Self::new(
            MONITOR_X - MONITOR_BUFFER,
            MONITOR_Y - MONITOR_BUFFER,
            MONITOR_W + MONITOR_BUFFER * 2.0,
            MONITOR_H + MONITOR_BUFFER * 2.0,
        )
    }

    pub const fn cameraman() -> Self {
        Self::new(CAMERAMAN_X, CAMERAMAN_Y, CAMERAMAN_W, CAMERAMAN_H)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// The playfield and its keep-out regions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub restricted: [RestrictedArea; 2],
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            restricted: [RestrictedArea::monitor(), RestrictedArea::cameraman()],
        }
    }
}

impl Arena {
    /// True if the point falls in any keep-out rectangle
    pub fn is_in_restricted_area(&self, p: Vec2) -> bool {
        self.restricted.iter().any(|area| area.contains(p))
    }

    /// Fixed spot used when sampling for the couple keeps failing
    pub fn safe_subject_position(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height - 200.0)
    }

    /// Random whole-pixel position for the couple, away from the edges and
    /// outside every keep-out rectangle.
    pub fn random_subject_position<R: Rng>(&self, rng: &mut R, max_attempts: u32) -> Vec2 {
        for _ in 0..max_attempts {
            let p = Vec2::new(
                (100.0 + rng.random::<f32>() * (self.width - 200.0)).floor(),
                (200.0 + rng.random::<f32>() * (self.height - 300.0)).floor(),
            );
            if !self.is_in_restricted_area(p) {
                return p;
            }
        }
        log::warn!("Couple placement fell back to the safe spot");
        self.safe_subject_position()
    }

    /// Uniform point in the roaming box (may be restricted; callers check)
    pub fn random_roam_point<R: Rng>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            ROAM_INSET_X + rng.random::<f32>() * (self.width - ROAM_INSET_X * 2.0),
            ROAM_INSET_Y + rng.random::<f32>() * (self.height - ROAM_INSET_Y * 2.0),
        )
    }

    /// Random roam point outside every keep-out rectangle.
    ///
    /// Falls back to the legal corner farthest from `avoid`.
    pub fn random_open_point<R: Rng>(&self, rng: &mut R, avoid: Vec2, max_attempts: u32) -> Vec2 {
        for _ in 0..max_attempts {
            let p = self.random_roam_point(rng);
            if !self.is_in_restricted_area(p) {
                return p;
            }
        }
        self.retreat_fallback(avoid)
    }

    /// Roam point at least `min_distance` from `subject`, outside every
    /// keep-out rectangle. Falls back to the corner diagonally opposite.
    pub fn retreat_point<R: Rng>(
        &self,
        rng: &mut R,
        subject: Vec2,
        min_distance: f32,
        max_attempts: u32,
    ) -> Vec2 {
        for _ in 0..max_attempts {
            let p = self.random_roam_point(rng);
            if !self.is_in_restricted_area(p) && p.distance(subject) >= min_distance {
                return p;
            }
        }
        self.retreat_fallback(subject)
    }

    /// Corner of the quadrant opposite `subject`. When that corner sits in a
    /// keep-out rectangle, the farthest legal corner is used instead.
    pub fn retreat_fallback(&self, subject: Vec2) -> Vec2 {
        let preferred = opposite_corner(subject, RETREAT_CORNER_INSET);
        if !self.is_in_restricted_area(preferred) {
            return preferred;
        }
        let inset = RETREAT_CORNER_INSET;
        let corners = [
            Vec2::new(inset, inset),
            Vec2::new(self.width - inset, inset),
            Vec2::new(inset, self.height - inset),
            Vec2::new(self.width - inset, self.height - inset),
        ];
        corners
            .into_iter()
            .filter(|c| !self.is_in_restricted_area(*c))
            .max_by(|a, b| {
                a.distance(subject)
                    .partial_cmp(&b.distance(subject))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(preferred)
    }
}
