//! Sound cues
//!
//! Procedurally generated with the Web Audio API in the browser - no
//! external files needed. Native builds only log the cue.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Camera shutter when a light takes the picture
    Shutter,
    /// Caught on the Kiss Cam
    GameEnd,
    /// New high score
    HighScore,
}

impl AudioCue {
    /// Loudness relative to the effective volume
    pub fn level(&self) -> f32 {
        match self {
            AudioCue::Shutter => 0.4,
            AudioCue::GameEnd => 0.7,
            AudioCue::HighScore => 0.5,
        }
    }
}

/// Cue to play for a simulation event, if any
pub fn cue_for(event: &GameEvent) -> Option<AudioCue> {
    match event {
        GameEvent::FlashFired { .. } => Some(AudioCue::Shutter),
        GameEvent::Busted { .. } => Some(AudioCue::GameEnd),
        GameEvent::NewHighScore { .. } => Some(AudioCue::HighScore),
        _ => None,
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(not(target_arch = "wasm32"))]
pub use native::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::AudioCue;
    use crate::settings::Settings;
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn play(&self, cue: AudioCue) {
            let vol = self.volume * cue.level();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                AudioCue::Shutter => self.play_shutter(ctx, vol),
                AudioCue::GameEnd => self.play_game_end(ctx, vol),
                AudioCue::HighScore => self.play_high_score(ctx, vol),
            }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Shutter - two sharp clicks
        fn play_shutter(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [2400.0, 1800.0].iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) else {
                    continue;
                };
                let t = ctx.current_time() + i as f64 * 0.06;
                gain.gain().set_value_at_time(vol, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.001, t + 0.04)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.05).ok();
            }
        }

        /// Game end - descending "aww"
        fn play_game_end(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [523.0, 440.0, 349.0, 262.0].iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) else {
                    continue;
                };
                let t = ctx.current_time() + i as f64 * 0.2;
                gain.gain().set_value_at_time(vol, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }

        /// High score - rising arpeggio
        fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [523.0, 659.0, 784.0, 1047.0].iter().enumerate() {
                let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle)
                else {
                    continue;
                };
                let t = ctx.current_time() + 0.8 + i as f64 * 0.08;
                gain.gain().set_value_at_time(vol, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::AudioCue;
    use crate::settings::Settings;

    /// Silent stand-in for headless runs
    #[derive(Debug, Default)]
    pub struct AudioManager {
        volume: f32,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            Self {
                volume: settings.effective_volume(),
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        pub fn resume(&self) {}

        pub fn play(&self, cue: AudioCue) {
            log::debug!("Sound cue {:?} at {:.2}", cue, self.volume * cue.level());
        }
    }
}

/// Play the cues for a batch of events
pub fn play_events(audio: &AudioManager, events: &[GameEvent]) {
    for cue in events.iter().filter_map(cue_for) {
        audio.play(cue);
    }
}
