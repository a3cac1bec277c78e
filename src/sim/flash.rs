//! Flash arbitration
//!
//! Several lights can reach the couple in the same stretch of play; only one
//! of them may take the picture. The arbiter holds the global lock, enforces
//! spacing between flashes and delivers the verdict once the flash window
//! closes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::spotlight::SpotlightAgent;
use crate::tuning::Tuning;

/// Outcome of a finished flash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashVerdict {
    /// Couple caught embracing in frame
    Hit,
    /// Light drifted off or the couple was not embracing
    Miss,
}

/// A light asking to fire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub agent_id: u8,
    pub distance: f32,
    /// No active light is strictly closer to the couple
    pub closest: bool,
    pub already_flashed: bool,
}

/// Global flash state (one per session)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlashArbiter {
    /// Lock: at most one flash system-wide
    pub in_progress: bool,
    /// Light that took the current (or last) picture
    pub triggering_agent: Option<u8>,
    /// Session time the current flash fired
    pub started_at: f64,
    /// Overlay intensity, fades to zero across the flash window
    pub alpha: f32,
    /// Session time the previous flash was resolved
    pub last_flash_end: Option<f64>,
}

impl FlashArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spacing since the previous flash has elapsed
    pub fn spacing_elapsed(&self, now: f64, tuning: &Tuning) -> bool {
        self.last_flash_end
            .is_none_or(|end| now - end >= tuning.min_flash_interval)
    }

    /// Whether a candidate may fire right now
    pub fn permits(&self, candidate: &Candidate, now: f64, tuning: &Tuning) -> bool {
        candidate.closest
            && candidate.distance < tuning.detection_radius
            && !self.in_progress
            && self.spacing_elapsed(now, tuning)
            && !candidate.already_flashed
    }

    /// Acquire the lock for a candidate. Non-blocking: a refused light just
    /// keeps roaming.
    pub fn try_fire(&mut self, candidate: &Candidate, now: f64, tuning: &Tuning) -> bool {
        if !self.permits(candidate, now, tuning) {
            return false;
        }
        self.in_progress = true;
        self.triggering_agent = Some(candidate.agent_id);
        self.started_at = now;
        self.alpha = tuning.flash_intensity;
        log::info!(
            "Light {} flashes at {:.1}px",
            candidate.agent_id,
            candidate.distance
        );
        true
    }

    /// Linear fade of the overlay across the flash window
    pub fn fade(&mut self, now: f64, tuning: &Tuning) {
        let t = ((now - self.started_at) / tuning.flash_duration).clamp(0.0, 1.0) as f32;
        self.alpha = tuning.flash_intensity * (1.0 - t);
    }

    /// The flash window has closed and a verdict is owed
    pub fn verdict_due(&self, now: f64, tuning: &Tuning) -> bool {
        self.in_progress && now - self.started_at >= tuning.flash_duration
    }

    /// Judge the flash. A miss releases the lock; a hit keeps it held until
    /// the session resets.
    pub fn resolve(
        &mut self,
        distance: f32,
        embracing: bool,
        now: f64,
        tuning: &Tuning,
    ) -> FlashVerdict {
        self.alpha = 0.0;
        self.last_flash_end = Some(now);
        if distance < tuning.detection_radius && embracing {
            FlashVerdict::Hit
        } else {
            self.in_progress = false;
            FlashVerdict::Miss
        }
    }

    /// Drop the lock (cooldown exit)
    pub fn release(&mut self) {
        self.in_progress = false;
        self.alpha = 0.0;
    }
}

/// Index and distance of the active light nearest the couple. Ties go to the
/// lowest id.
pub fn nearest_active(agents: &[SpotlightAgent], subject: Vec2) -> Option<(usize, f32)> {
    agents
        .iter()
        .enumerate()
        .filter(|(_, a)| a.active)
        .map(|(i, a)| (i, a.pos.distance(subject)))
        .fold(None, |best, (i, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((i, d)),
        })
}

/// Build the candidacy for light `index`: its distance and whether it is at
/// least as close as every other active light.
pub fn candidate_for(agents: &[SpotlightAgent], index: usize, subject: Vec2) -> Candidate {
    let agent = &agents[index];
    let distance = agent.distance_to(subject);
    let min_distance = agents
        .iter()
        .map(|a| a.distance_to(subject))
        .fold(f32::INFINITY, f32::min);
    Candidate {
        agent_id: agent.id,
        distance,
        closest: agent.active && distance <= min_distance,
        already_flashed: agent.has_flashed_this_round,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spotlight::agent_specs;

    fn lights_at(positions: &[Option<Vec2>]) -> Vec<SpotlightAgent> {
        let specs = agent_specs(&Tuning::default());
        specs
            .iter()
            .zip(positions)
            .map(|(spec, pos)| {
                let mut a = SpotlightAgent::new(spec);
                if let Some(p) = pos {
                    a.active = true;
                    a.pos = *p;
                }
                a
            })
            .collect()
    }

    fn candidate(distance: f32) -> Candidate {
        Candidate {
            agent_id: 1,
            distance,
            closest: true,
            already_flashed: false,
        }
    }

    #[test]
    fn test_fire_acquires_lock() {
        let tuning = Tuning::default();
        let mut arbiter = FlashArbiter::new();
        assert!(arbiter.try_fire(&candidate(30.0), 5.0, &tuning));
        assert!(arbiter.in_progress);
        assert_eq!(arbiter.triggering_agent, Some(1));
        assert_eq!(arbiter.alpha, 0.4);

        // Lock held: second light refused
        let other = Candidate {
            agent_id: 2,
            ..candidate(10.0)
        };
        assert!(!arbiter.try_fire(&other, 5.0, &tuning));
        assert_eq!(arbiter.triggering_agent, Some(1));
    }

    #[test]
    fn test_refusals() {
        let tuning = Tuning::default();
        let arbiter = FlashArbiter::new();
        // Out of range
        assert!(!arbiter.permits(&candidate(35.0), 0.0, &tuning));
        // Not the closest
        let far = Candidate {
            closest: false,
            ..candidate(10.0)
        };
        assert!(!arbiter.permits(&far, 0.0, &tuning));
        // Already flashed this round
        let latched = Candidate {
            already_flashed: true,
            ..candidate(10.0)
        };
        assert!(!arbiter.permits(&latched, 0.0, &tuning));
    }

    #[test]
    fn test_spacing_between_flashes() {
        let tuning = Tuning::default();
        let mut arbiter = FlashArbiter::new();
        assert!(arbiter.try_fire(&candidate(10.0), 1.0, &tuning));
        assert_eq!(arbiter.resolve(10.0, false, 1.3, &tuning), FlashVerdict::Miss);
        assert!(!arbiter.in_progress);

        assert!(!arbiter.try_fire(&candidate(10.0), 3.2, &tuning));
        assert!(arbiter.try_fire(&candidate(10.0), 3.4, &tuning));
    }

    #[test]
    fn test_fade_is_linear() {
        let tuning = Tuning::default();
        let mut arbiter = FlashArbiter::new();
        arbiter.try_fire(&candidate(10.0), 0.0, &tuning);
        arbiter.fade(0.15, &tuning);
        assert!((arbiter.alpha - 0.2).abs() < 0.0001);
        arbiter.fade(0.5, &tuning);
        assert_eq!(arbiter.alpha, 0.0);
        assert!(arbiter.verdict_due(0.3, &tuning));
        assert!(!arbiter.verdict_due(0.29, &tuning));
    }

    #[test]
    fn test_verdicts() {
        let tuning = Tuning::default();
        let mut arbiter = FlashArbiter::new();
        arbiter.try_fire(&candidate(30.0), 0.0, &tuning);
        assert_eq!(arbiter.resolve(30.0, true, 0.3, &tuning), FlashVerdict::Hit);
        // Lock stays held on a hit
        assert!(arbiter.in_progress);

        let mut arbiter = FlashArbiter::new();
        arbiter.try_fire(&candidate(30.0), 0.0, &tuning);
        assert_eq!(arbiter.resolve(40.0, true, 0.3, &tuning), FlashVerdict::Miss);
        assert!(!arbiter.in_progress);
    }

    #[test]
    fn test_nearest_ignores_inactive_and_breaks_ties_low() {
        let subject = Vec2::new(450.0, 400.0);
        let agents = lights_at(&[
            Some(Vec2::new(450.0, 430.0)),
            Some(Vec2::new(420.0, 400.0)),
            None,
            None,
            None,
        ]);
        // Both at 30px: light 1 wins
        let (idx, d) = nearest_active(&agents, subject).unwrap();
        assert_eq!(idx, 0);
        assert!((d - 30.0).abs() < 0.001);

        assert!(candidate_for(&agents, 0, subject).closest);
        // A tie still counts as closest for the second light
        assert!(candidate_for(&agents, 1, subject).closest);

        let none = lights_at(&[None, None, None, None, None]);
        assert!(nearest_active(&none, subject).is_none());
    }

    #[test]
    fn test_inactive_light_is_never_closest() {
        let subject = Vec2::new(450.0, 400.0);
        let mut agents = lights_at(&[Some(Vec2::new(450.0, 300.0)), None, None, None, None]);
        // Switched-off light parked right on the couple
        agents[1].pos = subject;
        assert!(candidate_for(&agents, 0, subject).closest);
        assert!(!candidate_for(&agents, 1, subject).closest);
    }
}
