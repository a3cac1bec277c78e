//! Browser facade
//!
//! The page owns the canvas, DOM buttons and `requestAnimationFrame`; it
//! forwards input here and draws whatever `frame` returns.

use wasm_bindgen::prelude::*;

use super::{FrameClock, InputEvent, InputLatch, Key};
use crate::audio::{self, AudioManager};
use crate::highscores::HighScore;
use crate::persistence::LocalStorage;
use crate::settings::{DeviceProfile, Settings};
use crate::sim::{GameEvent, GameSession, tick};
use crate::tuning::Tuning;
use crate::ui::FrameView;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {e}").into());
    }
    log::info!("Kiss Cam starting...");
}

fn detect_device() -> DeviceProfile {
    let Some(navigator) = web_sys::window().map(|w| w.navigator()) else {
        return DeviceProfile::Desktop;
    };
    let user_agent = navigator.user_agent().unwrap_or_default();
    let touch_points = navigator.max_touch_points().max(0) as u32;
    DeviceProfile::detect(&user_agent, touch_points)
}

#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
    input: InputLatch,
    clock: FrameClock,
    settings: Settings,
    high_score: HighScore,
    storage: LocalStorage,
    audio: AudioManager,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> WebGame {
        let storage = LocalStorage::new();
        let settings = Settings::load(&storage);
        let high_score = HighScore::load(&storage);
        let device = settings.device_or(detect_device());
        log::info!("Device profile: {}", device.as_str());

        let session = GameSession::with_config(
            seed as u64,
            Tuning::default(),
            device,
            high_score.best,
        );
        let audio = AudioManager::new(&settings);
        WebGame {
            session,
            input: InputLatch::new(),
            clock: FrameClock::new(),
            settings,
            high_score,
            storage,
            audio,
        }
    }

    /// Advance one animation frame and return the view as JSON
    pub fn frame(&mut self, timestamp_ms: f64) -> String {
        let dt = self.clock.delta(timestamp_ms);
        let input = self.input.take_tick_input();
        tick(&mut self.session, &input, dt);

        let events = self.session.drain_events();
        audio::play_events(&self.audio, &events);
        for event in &events {
            match event {
                GameEvent::NewHighScore { score } => {
                    if self.high_score.record(*score) {
                        self.high_score.save(&mut self.storage);
                    }
                }
                GameEvent::Reset => self.input.release_all(),
                _ => {}
            }
        }

        self.view_json()
    }

    /// Current view without advancing
    pub fn view_json(&self) -> String {
        let view = FrameView::capture(&self.session, &self.settings);
        match serde_json::to_string(&view) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode frame view: {}", e);
                String::from("{}")
            }
        }
    }

    pub fn key_down(&mut self, code: &str) {
        self.audio.resume();
        self.input
            .handle(InputEvent::KeyDown(Key::from_code(code)), self.session.phase);
    }

    pub fn key_up(&mut self, code: &str) {
        self.input
            .handle(InputEvent::KeyUp(Key::from_code(code)), self.session.phase);
    }

    pub fn hug_press(&mut self) {
        self.audio.resume();
        self.input.handle(InputEvent::HugPress, self.session.phase);
    }

    pub fn hug_release(&mut self) {
        self.input.handle(InputEvent::HugRelease, self.session.phase);
    }

    pub fn start_clicked(&mut self) {
        self.audio.resume();
        self.input.handle(InputEvent::StartClicked, self.session.phase);
    }

    pub fn retry_clicked(&mut self) {
        self.input.handle(InputEvent::RetryClicked, self.session.phase);
    }

    /// Tab hidden or shown: do not count the time away
    pub fn visibility_changed(&mut self) {
        self.clock.restart();
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.audio.apply_settings(&self.settings);
        self.settings.save(&mut self.storage);
    }

    pub fn set_reduced_motion(&mut self, on: bool) {
        self.settings.reduced_motion = on;
        self.settings.save(&mut self.storage);
    }

    pub fn high_score(&self) -> f64 {
        self.high_score.best as f64
    }
}
