//! Per-frame simulation tick
//!
//! Fixed pipeline, single-threaded: commands, held input and score,
//! spotlights in id order, activations, framing, then flash/cooldown
//! transitions.

use super::autopilot;
use super::flash::{FlashVerdict, candidate_for, nearest_active};
use super::spotlight::StepOutcome;
use super::state::{GameEvent, GamePhase, GameSession};
use crate::consts::MAX_FRAME_DT;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Embrace key held (Space)
    pub embrace_key: bool,
    /// On-screen hug button held (touch or mouse)
    pub embrace_button: bool,
    /// Start command (title screen)
    pub start: bool,
    /// Retry command (game over screen)
    pub retry: bool,
    /// Demo mode - the autopilot decides when to embrace
    pub autopilot: bool,
}

impl TickInput {
    /// Keyboard and button merged into one held flag
    pub fn embrace_held(&self) -> bool {
        self.embrace_key || self.embrace_button
    }
}

/// Advance the session by one frame of `dt` seconds.
///
/// `dt` is clamped to `[0, MAX_FRAME_DT]`; non-finite deltas count as zero.
pub fn tick(state: &mut GameSession, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };

    match state.phase {
        GamePhase::Start if input.start => state.start_round(),
        GamePhase::GameOver if input.retry => {
            state.reset();
            return;
        }
        _ => {}
    }

    // Title and game over screens run no simulation
    if matches!(state.phase, GamePhase::Start | GamePhase::GameOver) {
        return;
    }

    state.clock += dt as f64;

    // Held input is only sampled while off camera
    if !state.framing.on_camera {
        state.embrace_live = if input.autopilot {
            autopilot::wants_embrace(state)
        } else {
            input.embrace_held()
        };
    }

    if state.phase == GamePhase::Playing && !state.framing.on_camera {
        let embracing = state.embrace_live;
        state.score.accrue(embracing, dt, &state.tuning);
    }

    update_spotlights(state, dt);
    state.activate_due_agents();
    update_framing(state);

    match state.phase {
        GamePhase::Flashing => update_flash(state),
        GamePhase::Cooldown => update_cooldown(state),
        _ => {}
    }
}

/// Move every light in id order. A flash stops the remaining lights for the
/// rest of the tick, so two lights can never fire in the same tick.
fn update_spotlights(state: &mut GameSession, dt: f32) {
    let speed = state.light_speed;
    let epsilon = state.tuning.arrival_epsilon;

    for index in 0..state.agents.len() {
        if state.phase != GamePhase::Playing {
            break;
        }
        if state.agents[index].advance(dt, speed, epsilon) == StepOutcome::Arrived {
            run_candidacy(state, index);
            state.pick_target_for(index);
        }
    }
}

/// Light `index` sits on its final waypoint: see whether it takes the picture
fn run_candidacy(state: &mut GameSession, index: usize) {
    let candidate = candidate_for(&state.agents, index, state.subject.pos);
    if state.flash.try_fire(&candidate, state.clock, &state.tuning) {
        let agent = &mut state.agents[index];
        agent.has_flashed_this_round = true;
        agent.retreat_pending = true;
        state.phase = GamePhase::Flashing;
        state.events.push(GameEvent::FlashFired { id: agent.id });
    }
}

/// Is any active light framing the couple
fn update_framing(state: &mut GameSession) {
    let radius = state.tuning.detection_radius;
    let in_range = nearest_active(&state.agents, state.subject.pos)
        .map(|(_, d)| d < radius)
        .unwrap_or(false);
    let embracing = state.embrace_live;
    state.framing.update(in_range, embracing);
}

fn update_flash(state: &mut GameSession) {
    let now = state.clock;
    state.flash.fade(now, &state.tuning);
    if !state.flash.verdict_due(now, &state.tuning) {
        return;
    }

    let Some(id) = state.flash.triggering_agent else {
        // Lock without an owner: nothing to judge
        log::warn!("Flash without a triggering light, resuming");
        state.flash.release();
        state.phase = GamePhase::Playing;
        return;
    };
    let distance = state
        .agent_index(id)
        .map(|i| state.agents[i].pos.distance(state.subject.pos))
        .unwrap_or(f32::INFINITY);
    let embracing = state.displayed_embrace();

    match state
        .flash
        .resolve(distance, embracing, now, &state.tuning)
    {
        FlashVerdict::Hit => end_game(state, id),
        FlashVerdict::Miss => {
            log::info!("Light {} missed, cooling down", id);
            state.phase = GamePhase::Cooldown;
            state.cooldown_started = now;
            state.events.push(GameEvent::FlashMissed { id });
        }
    }
}

fn update_cooldown(state: &mut GameSession) {
    if state.clock - state.cooldown_started < state.tuning.cooldown_duration {
        return;
    }

    state.phase = GamePhase::Playing;
    state.flash.release();
    let trigger = state.flash.triggering_agent;
    for agent in &mut state.agents {
        agent.has_flashed_this_round = false;
        // The light that took the picture backs off before searching again
        agent.retreat_pending = Some(agent.id) == trigger;
    }
    for index in 0..state.agents.len() {
        if state.agents[index].active {
            state.pick_target_for(index);
        }
    }
    state.events.push(GameEvent::CooldownEnded);
}

fn end_game(state: &mut GameSession, id: u8) {
    let score = state.score.score;
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::Busted { id, score });
    log::info!("Busted by light {} with {} points", id, score);

    if score > state.high_score {
        state.high_score = score;
        state.beat_high_score = true;
        state.events.push(GameEvent::NewHighScore { score });
        log::info!("New high score: {}", score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::spotlight::TargetIntent;
    use glam::Vec2;
    use std::collections::VecDeque;

    /// Session in play with light 1 parked 30px below the couple
    fn framed_session(seed: u64) -> GameSession {
        let mut state = GameSession::new(seed);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.phase, GamePhase::Playing);

        state.subject.pos = Vec2::new(450.0, 400.0);
        let light = &mut state.agents[0];
        light.pos = Vec2::new(450.0, 430.0);
        light.target = light.pos;
        light.path = VecDeque::from([light.pos]);
        light.retreat_pending = true;
        state
    }

    fn run_until<F: Fn(&GameSession) -> bool>(
        state: &mut GameSession,
        input: &TickInput,
        max_ticks: usize,
        done: F,
    ) -> bool {
        for _ in 0..max_ticks {
            tick(state, input, SIM_DT);
            if done(state) {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_tick_start_to_playing() {
        let mut state = GameSession::new(12345);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Start);
        // Title screen runs no simulation
        assert_eq!(state.clock, 0.0);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.agents[0].active);
    }

    #[test]
    fn test_flash_miss_enters_cooldown() {
        let mut state = framed_session(1);
        let released = TickInput::default();

        tick(&mut state, &released, SIM_DT);
        assert_eq!(state.phase, GamePhase::Flashing);
        assert_eq!(state.flash.triggering_agent, Some(1));
        assert!(state.agents[0].has_flashed_this_round);
        assert!(state.framing.on_camera);
        assert!(!state.framing.frozen_embrace);

        // Grabbing the embrace mid-flash is too late to matter either way
        let held = TickInput {
            embrace_key: true,
            ..Default::default()
        };
        assert!(run_until(&mut state, &held, 60, |s| s.phase != GamePhase::Flashing));
        assert_eq!(state.phase, GamePhase::Cooldown);
        assert!(!state.flash.in_progress);
        assert!(state.agents[0].has_flashed_this_round);
        assert!(state.events.contains(&GameEvent::FlashMissed { id: 1 }));
    }

    #[test]
    fn test_flash_hit_is_game_over() {
        let mut state = framed_session(2);
        state.score.score = 5000;
        state.high_score = 1200;
        let held = TickInput {
            embrace_button: true,
            ..Default::default()
        };

        tick(&mut state, &held, SIM_DT);
        assert_eq!(state.phase, GamePhase::Flashing);
        assert!(state.framing.frozen_embrace);

        // Letting go after the pose froze does not save them
        let released = TickInput::default();
        assert!(run_until(&mut state, &released, 60, |s| s.phase != GamePhase::Flashing));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.high_score, state.score.score);
        assert!(state.beat_high_score);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Busted { id: 1, .. }))
        );
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::NewHighScore { .. }))
        );
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let mut state = framed_session(3);
        state.score.score = 10;
        state.high_score = 90_000;
        let held = TickInput {
            embrace_key: true,
            ..Default::default()
        };
        assert!(run_until(&mut state, &held, 60, |s| s.phase == GamePhase::GameOver));
        assert_eq!(state.high_score, 90_000);
        assert!(!state.beat_high_score);
        assert!(
            !state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::NewHighScore { .. }))
        );
    }

    #[test]
    fn test_tied_arrival_lowest_id_fires() {
        let mut state = framed_session(10);
        state.drain_events();
        // Light 2 parked on its last waypoint, also 30px from the couple
        let light = &mut state.agents[1];
        light.active = true;
        light.pos = Vec2::new(420.0, 400.0);
        light.target = light.pos;
        light.path = VecDeque::from([light.pos]);
        light.retreat_pending = true;

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.events, vec![GameEvent::FlashFired { id: 1 }]);
        assert_eq!(state.phase, GamePhase::Flashing);
        assert_eq!(state.flash.triggering_agent, Some(1));
        assert!(state.agents[0].has_flashed_this_round);
        assert!(!state.agents[1].has_flashed_this_round);
        // Light 2 stood still for the rest of the tick
        assert_eq!(state.agents[1].pos, Vec2::new(420.0, 400.0));
    }

    #[test]
    fn test_retreat_after_cooldown() {
        let mut state = framed_session(4);
        let released = TickInput::default();
        assert!(run_until(&mut state, &released, 200, |s| s.phase == GamePhase::Cooldown));
        assert!(run_until(&mut state, &released, 200, |s| s.phase == GamePhase::Playing));

        let light = &state.agents[0];
        assert_eq!(light.intent, TargetIntent::Retreat);
        assert!(light.target.distance(state.subject.pos) >= 200.0);
        assert!(!light.has_flashed_this_round);
        assert!(!state.flash.in_progress);
        assert!(state.events.contains(&GameEvent::CooldownEnded));
    }

    #[test]
    fn test_score_frozen_while_framed() {
        let mut state = framed_session(5);
        state.score.score = 400;
        // Keep the flash from firing so framing alone is tested
        state.agents[0].has_flashed_this_round = true;
        let held = TickInput {
            embrace_key: true,
            ..Default::default()
        };
        tick(&mut state, &held, SIM_DT);
        // First tick scores (framing is measured after the lights move)
        assert!(state.framing.on_camera);
        let frozen = state.score.score;
        tick(&mut state, &held, SIM_DT);
        assert_eq!(state.score.score, frozen);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_retry_resets_to_title() {
        let mut state = framed_session(6);
        let held = TickInput {
            embrace_key: true,
            ..Default::default()
        };
        assert!(run_until(&mut state, &held, 60, |s| s.phase == GamePhase::GameOver));

        // Game over ignores everything but retry
        tick(&mut state, &held, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);

        let retry = TickInput {
            retry: true,
            ..Default::default()
        };
        tick(&mut state, &retry, SIM_DT);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score.score, 0);
        assert!(!state.flash.in_progress);
        assert!(state.agents.iter().all(|a| !a.active));
    }

    #[test]
    fn test_lights_switch_on_over_time() {
        let mut state = GameSession::new(8);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            SIM_DT,
        );
        // Keep every light latched so no flash interrupts the clock
        let input = TickInput::default();
        let mut ticks = 0;
        while state.round_elapsed() < 71.0 && ticks < 10_000 {
            for a in &mut state.agents {
                a.has_flashed_this_round = true;
            }
            tick(&mut state, &input, 0.1);
            ticks += 1;
            let active = state.agents.iter().filter(|a| a.active).count();
            let expected = [0.0, 10.0, 30.0, 50.0, 70.0]
                .iter()
                .filter(|t| state.round_elapsed() >= **t)
                .count();
            assert_eq!(active, expected, "at {:.1}s", state.round_elapsed());
        }
        assert!(state.agents.iter().all(|a| a.active));
    }

    #[test]
    fn test_huge_dt_is_clamped() {
        let mut state = framed_session(9);
        state.agents[0].has_flashed_this_round = true;
        state.agents[0].target = Vec2::new(100.0, 100.0);
        state.agents[0].path = VecDeque::from([Vec2::new(100.0, 100.0)]);
        let before = state.agents[0].pos;
        let clock = state.clock;
        tick(&mut state, &TickInput::default(), 30.0);
        let moved = state.agents[0].pos.distance(before);
        assert!(moved <= state.light_speed * MAX_FRAME_DT + 0.01);
        assert!((state.clock - clock - MAX_FRAME_DT as f64).abs() < 1e-6);

        tick(&mut state, &TickInput::default(), f32::NAN);
        tick(&mut state, &TickInput::default(), -1.0);
        assert!(state.agents[0].pos.is_finite());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameSession::new(99999);
        let mut state2 = GameSession::new(99999);
        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state1, &start, SIM_DT);
        tick(&mut state2, &start, SIM_DT);

        let demo = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut state1, &demo, SIM_DT);
            tick(&mut state2, &demo, SIM_DT);
        }

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.agents, state2.agents);
        assert_eq!(state1.flash, state2.flash);
    }
}
