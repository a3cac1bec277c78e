//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (animation frame timestamps to clamped deltas)
//! - Input events (keyboard and hug button merged into one held flag)
//! - The browser facade (`web`, wasm only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::MAX_FRAME_DT;
use crate::sim::{GamePhase, TickInput};

/// Turns animation-frame timestamps (milliseconds) into tick deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous frame. The first frame yields zero, and a
    /// stalled tab or clock going backwards never produces a huge or
    /// negative step.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        dt.clamp(0.0, MAX_FRAME_DT)
    }

    /// Forget the previous timestamp (tab hidden, game reset)
    pub fn restart(&mut self) {
        self.last_ms = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Enter,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Self {
        match code {
            "Space" => Key::Space,
            "Enter" | "NumpadEnter" => Key::Enter,
            _ => Key::Other,
        }
    }
}

/// Raw input from the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    HugPress,
    HugRelease,
    StartClicked,
    RetryClicked,
}

/// Accumulates input between frames
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    key_held: bool,
    button_held: bool,
    start: bool,
    retry: bool,
    /// Let the autopilot play
    pub autopilot: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event. `phase` decides what Space and Enter mean.
    pub fn handle(&mut self, event: InputEvent, phase: GamePhase) {
        match event {
            InputEvent::KeyDown(Key::Space) if phase == GamePhase::Start => self.start = true,
            InputEvent::KeyDown(Key::Space) => self.key_held = true,
            InputEvent::KeyUp(Key::Space) => self.key_held = false,
            InputEvent::KeyDown(Key::Enter) if phase == GamePhase::GameOver => self.retry = true,
            InputEvent::HugPress => self.button_held = true,
            InputEvent::HugRelease => self.button_held = false,
            InputEvent::StartClicked => self.start = true,
            InputEvent::RetryClicked => self.retry = true,
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => {}
        }
    }

    /// Input for the next tick. Start and retry fire once.
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            embrace_key: self.key_held,
            embrace_button: self.button_held,
            start: self.start,
            retry: self.retry,
            autopilot: self.autopilot,
        };
        self.start = false;
        self.retry = false;
        input
    }

    /// Drop every held input (after a reset)
    pub fn release_all(&mut self) {
        self.key_held = false;
        self.button_held = false;
    }
}
