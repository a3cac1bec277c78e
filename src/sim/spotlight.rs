//! Spotlight agents
//!
//! All five lights share one type, parameterized by id, activation time and
//! home position. Each light walks its waypoint queue at constant speed and,
//! on reaching the end, hands control back to the session for a flash
//! candidacy check and a fresh target.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::pattern::Pattern;
use crate::consts::*;
use crate::step_toward;
use crate::tuning::Tuning;

/// Static description of one spotlight slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub id: u8,
    /// Round time at which the light switches on (seconds)
    pub activation_time: f64,
    /// Where the light sits when the round resets
    pub home: Vec2,
}

/// The five spotlight slots, in id order
pub fn agent_specs(tuning: &Tuning) -> [AgentSpec; SPOTLIGHT_COUNT] {
    let homes = [
        Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0),
        Vec2::new(ARENA_WIDTH / 3.0, ARENA_HEIGHT / 3.0),
        Vec2::new(ARENA_WIDTH / 4.0, ARENA_HEIGHT / 4.0),
        Vec2::new(ARENA_WIDTH * 0.75, ARENA_HEIGHT * 0.25),
        Vec2::new(ARENA_WIDTH * 0.6, ARENA_HEIGHT * 0.8),
    ];
    std::array::from_fn(|i| AgentSpec {
        id: i as u8 + 1,
        // The first light is always on
        activation_time: if i == 0 {
            0.0
        } else {
            tuning.activation_times[i]
        },
        home: homes[i],
    })
}

/// Why a light is heading where it is heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetIntent {
    /// No target picked yet (resting at home)
    #[default]
    Hold,
    /// Wandering to a random spot
    Roam,
    /// Following a pattern toward the couple
    Pursue,
    /// Backing off after checking the couple
    Retreat,
}

/// Result of advancing a light for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Light is switched off
    Idle,
    /// Still travelling toward the current waypoint
    Moving,
    /// Reached a waypoint and retargeted the next one
    NextWaypoint,
    /// Snapped onto the final waypoint this tick; checks happen next tick
    Snapped,
    /// Sitting on the final waypoint: run candidacy, then pick a new target
    Arrived,
}

/// Everything target selection needs to know about the world
#[derive(Debug, Clone, Copy)]
pub struct TargetContext<'a> {
    pub arena: &'a Arena,
    pub tuning: &'a Tuning,
    pub subject: Vec2,
    pub difficulty: f32,
}

/// One search light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotlightAgent {
    pub id: u8,
    pub activation_time: f64,
    pub home: Vec2,
    /// Inactive lights never move, render or take part in arbitration
    pub active: bool,
    pub pos: Vec2,
    /// Current waypoint
    pub target: Vec2,
    pub pattern: Pattern,
    /// Remaining waypoints, head is `target`
    pub path: VecDeque<Vec2>,
    pub intent: TargetIntent,
    /// Latched when this light fires; cleared when cooldown ends
    pub has_flashed_this_round: bool,
    /// Set once the light has checked on the couple; forces the next target
    /// selection to retreat
    pub retreat_pending: bool,
    /// Time spent on the current path (seconds)
    pub path_timer: f32,
    /// Pacing hint for animation/UI (seconds)
    pub path_duration: f32,
}

impl SpotlightAgent {
    pub fn new(spec: &AgentSpec) -> Self {
        Self {
            id: spec.id,
            activation_time: spec.activation_time,
            home: spec.home,
            active: false,
            pos: spec.home,
            target: spec.home,
            pattern: Pattern::Direct,
            path: VecDeque::new(),
            intent: TargetIntent::Hold,
            has_flashed_this_round: false,
            retreat_pending: false,
            path_timer: 0.0,
            path_duration: 0.0,
        }
    }

    /// Back to the home position, switched off, all flags cleared
    pub fn reset(&mut self) {
        let spec = AgentSpec {
            id: self.id,
            activation_time: self.activation_time,
            home: self.home,
        };
        *self = Self::new(&spec);
    }

    /// Whether the light is due to switch on at this round time
    pub fn is_due(&self, round_elapsed: f64) -> bool {
        !self.active && round_elapsed >= self.activation_time
    }

    /// Distance to the couple, `INFINITY` while switched off
    pub fn distance_to(&self, subject: Vec2) -> f32 {
        if self.active {
            self.pos.distance(subject)
        } else {
            f32::INFINITY
        }
    }

    /// Advance toward the current waypoint at constant speed.
    ///
    /// Never overshoots: when the remaining gap fits in this tick's travel
    /// the light snaps onto the waypoint.
    pub fn advance(&mut self, dt: f32, speed: f32, arrival_epsilon: f32) -> StepOutcome {
        if !self.active {
            return StepOutcome::Idle;
        }

        self.path_timer += dt;
        let gap = self.pos.distance(self.target);
        let (pos, reached) = step_toward(self.pos, self.target, speed * dt);
        self.pos = pos;

        if !reached {
            return StepOutcome::Moving;
        }

        if self.path.len() > 1 {
            self.path.pop_front();
            if let Some(&next) = self.path.front() {
                self.target = next;
            }
            // Heading for the couple itself now
            self.retreat_pending = self.path.len() <= 1;
            StepOutcome::NextWaypoint
        } else if gap < arrival_epsilon {
            StepOutcome::Arrived
        } else {
            StepOutcome::Snapped
        }
    }

    /// Choose the next target: retreat after checking on the couple,
    /// otherwise pursue or roam depending on difficulty.
    pub fn pick_new_target<R: Rng>(&mut self, ctx: &TargetContext, rng: &mut R) {
        if self.retreat_pending {
            self.retreat(ctx, rng);
        } else {
            let attempts = ctx.tuning.max_placement_attempts;
            let mut placed = false;
            for _ in 0..attempts.max(1) {
                self.pursue_or_roam(ctx, rng);
                // Every waypoint, not just the head, must stay in the open
                if !self
                    .path
                    .iter()
                    .any(|p| ctx.arena.is_in_restricted_area(*p))
                {
                    placed = true;
                    break;
                }
            }
            if !placed {
                log::warn!("Light {} could not find an open target, roaming", self.id);
                let p = ctx.arena.random_open_point(rng, ctx.subject, attempts);
                self.go_direct(p, TargetIntent::Roam);
                self.retreat_pending = false;
            }
        }

        self.path_timer = 0.0;
        self.path_duration = ctx.tuning.path_duration(ctx.difficulty);
        log::debug!(
            "Light {} -> {:?} ({:.0}, {:.0})",
            self.id,
            self.intent,
            self.target.x,
            self.target.y
        );
    }

    fn retreat<R: Rng>(&mut self, ctx: &TargetContext, rng: &mut R) {
        let p = ctx.arena.retreat_point(
            rng,
            ctx.subject,
            ctx.tuning.retreat_min_distance,
            ctx.tuning.max_placement_attempts,
        );
        self.retreat_pending = false;
        self.go_direct(p, TargetIntent::Retreat);
    }

    fn pursue_or_roam<R: Rng>(&mut self, ctx: &TargetContext, rng: &mut R) {
        let chance = ctx.tuning.pursue_chance(ctx.difficulty);
        if rng.random::<f32>() < chance {
            let pattern = Pattern::random(rng);
            let path = pattern.generate(self.pos, ctx.subject, rng);
            self.pattern = pattern;
            self.target = path.front().copied().unwrap_or(ctx.subject);
            self.retreat_pending = path.len() <= 1;
            self.path = path;
            self.intent = TargetIntent::Pursue;
        } else {
            let p = ctx.arena.random_roam_point(rng);
            self.go_direct(p, TargetIntent::Roam);
        }
    }

    fn go_direct(&mut self, p: Vec2, intent: TargetIntent) {
        self.pattern = Pattern::Direct;
        self.target = p;
        self.path = VecDeque::from([p]);
        self.intent = intent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn active_agent(pos: Vec2) -> SpotlightAgent {
        let specs = agent_specs(&Tuning::default());
        let mut agent = SpotlightAgent::new(&specs[0]);
        agent.active = true;
        agent.pos = pos;
        agent.target = pos;
        agent
    }

    #[test]
    fn test_agent_specs() {
        let specs = agent_specs(&Tuning::default());
        let ids: Vec<u8> = specs.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        let times: Vec<f64> = specs.iter().map(|s| s.activation_time).collect();
        assert_eq!(times, vec![0.0, 10.0, 30.0, 50.0, 70.0]);
        assert_eq!(specs[0].home, Vec2::new(450.0, 300.0));
        assert_eq!(specs[4].home, Vec2::new(540.0, 480.0));
    }

    #[test]
    fn test_inactive_agent_never_moves() {
        let specs = agent_specs(&Tuning::default());
        let mut agent = SpotlightAgent::new(&specs[1]);
        agent.target = Vec2::new(0.0, 0.0);
        let before = agent.pos;
        assert_eq!(agent.advance(0.1, 280.0, 5.0), StepOutcome::Idle);
        assert_eq!(agent.pos, before);
        assert_eq!(agent.distance_to(Vec2::ZERO), f32::INFINITY);
    }

    #[test]
    fn test_constant_speed_movement() {
        let mut agent = active_agent(Vec2::new(100.0, 100.0));
        agent.target = Vec2::new(400.0, 100.0);
        agent.path = VecDeque::from([agent.target]);

        assert_eq!(agent.advance(0.1, 280.0, 5.0), StepOutcome::Moving);
        assert!((agent.pos.x - 128.0).abs() < 0.001);
        assert_eq!(agent.pos.y, 100.0);
    }

    #[test]
    fn test_snap_then_arrive() {
        let mut agent = active_agent(Vec2::new(100.0, 100.0));
        agent.target = Vec2::new(120.0, 100.0);
        agent.path = VecDeque::from([agent.target]);

        // 20 px gap fits in 28 px of travel but is over the 5 px epsilon
        assert_eq!(agent.advance(0.1, 280.0, 5.0), StepOutcome::Snapped);
        assert_eq!(agent.pos, agent.target);
        // Next tick it is sitting on the target
        assert_eq!(agent.advance(0.1, 280.0, 5.0), StepOutcome::Arrived);
    }

    #[test]
    fn test_waypoints_consumed_front_to_back() {
        let mut agent = active_agent(Vec2::new(0.0, 0.0));
        let a = Vec2::new(2.0, 0.0);
        let b = Vec2::new(4.0, 0.0);
        let c = Vec2::new(6.0, 0.0);
        agent.pattern = Pattern::Zigzag;
        agent.path = VecDeque::from([a, b, c]);
        agent.target = a;

        assert_eq!(agent.advance(0.1, 280.0, 5.0), StepOutcome::NextWaypoint);
        assert_eq!(agent.target, b);
        assert!(!agent.retreat_pending);

        assert_eq!(agent.advance(0.1, 280.0, 5.0), StepOutcome::NextWaypoint);
        assert_eq!(agent.target, c);
        // Last leg is the couple itself
        assert!(agent.retreat_pending);

        assert_eq!(agent.advance(0.1, 280.0, 5.0), StepOutcome::Arrived);
    }

    #[test]
    fn test_retreat_target_keeps_distance() {
        let arena = Arena::default();
        let tuning = Tuning::default();
        let subject = Vec2::new(450.0, 400.0);
        let ctx = TargetContext {
            arena: &arena,
            tuning: &tuning,
            subject,
            difficulty: 1.0,
        };
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..100 {
            let mut agent = active_agent(subject);
            agent.retreat_pending = true;
            agent.pick_new_target(&ctx, &mut rng);
            assert_eq!(agent.intent, TargetIntent::Retreat);
            assert_eq!(agent.pattern, Pattern::Direct);
            assert!(!agent.retreat_pending);
            assert!(agent.target.distance(subject) >= 200.0);
            assert!(!arena.is_in_restricted_area(agent.target));
        }
    }

    #[test]
    fn test_max_difficulty_always_pursues() {
        let arena = Arena::default();
        let tuning = Tuning::default();
        let subject = Vec2::new(200.0, 450.0);
        let ctx = TargetContext {
            arena: &arena,
            tuning: &tuning,
            subject,
            difficulty: 3.0,
        };
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..50 {
            let mut agent = active_agent(Vec2::new(150.0, 150.0));
            agent.pick_new_target(&ctx, &mut rng);
            assert_eq!(agent.intent, TargetIntent::Pursue);
            assert_eq!(*agent.path.back().unwrap(), subject);
            assert_eq!(agent.target, *agent.path.front().unwrap());
            // Direct pursuit goes straight for the check
            assert_eq!(agent.retreat_pending, agent.path.len() == 1);
            assert!((agent.path_duration - 0.4).abs() < 0.0001);
        }
    }

    #[test]
    fn test_targets_never_restricted() {
        let arena = Arena::default();
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2024);
        for i in 0..300 {
            let subject = arena.random_subject_position(&mut rng, 20);
            let ctx = TargetContext {
                arena: &arena,
                tuning: &tuning,
                subject,
                difficulty: 1.0 + (i % 3) as f32,
            };
            let mut agent = active_agent(arena.random_roam_point(&mut rng));
            agent.retreat_pending = i % 4 == 0;
            agent.pick_new_target(&ctx, &mut rng);
            assert!(!arena.is_in_restricted_area(agent.target));
            assert!(agent.path.iter().all(|p| !arena.is_in_restricted_area(*p)));
        }
    }

    #[test]
    fn test_reset_restores_home() {
        let mut agent = active_agent(Vec2::new(10.0, 10.0));
        agent.has_flashed_this_round = true;
        agent.retreat_pending = true;
        agent.reset();
        assert!(!agent.active);
        assert_eq!(agent.pos, agent.home);
        assert_eq!(agent.target, agent.home);
        assert!(!agent.has_flashed_this_round);
        assert!(!agent.retreat_pending);
        assert!(agent.path.is_empty());
    }
}
