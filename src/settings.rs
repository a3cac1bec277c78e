//! Game settings and preferences
//!
//! Persisted separately from the high score.

use serde::{Deserialize, Serialize};

use crate::persistence::Storage;
use crate::tuning::Tuning;

/// Substrings that mark a phone or tablet browser
const MOBILE_AGENTS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Device class, which sets how fast the lights sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeviceProfile {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceProfile::Desktop => "Desktop",
            DeviceProfile::Mobile => "Mobile",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "desktop" => Some(DeviceProfile::Desktop),
            "mobile" | "touch" => Some(DeviceProfile::Mobile),
            _ => None,
        }
    }

    /// Classify from the browser user agent and touch point count
    pub fn detect(user_agent: &str, max_touch_points: u32) -> Self {
        let ua = user_agent.to_lowercase();
        if max_touch_points > 1 || MOBILE_AGENTS.iter().any(|m| ua.contains(m)) {
            DeviceProfile::Mobile
        } else {
            DeviceProfile::Desktop
        }
    }

    /// Spotlight speed (pixels/second)
    pub fn light_speed(&self, tuning: &Tuning) -> f32 {
        match self {
            DeviceProfile::Desktop => tuning.light_speed_desktop,
            DeviceProfile::Mobile => tuning.light_speed_mobile,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Device class; `None` means detect at startup
    pub device: Option<DeviceProfile>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (dims the camera flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            device: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "kisscam-settings";

    /// Flash overlay strength under reduced motion
    const REDUCED_FLASH_SCALE: f32 = 0.25;

    /// Device profile, falling back to `detected` when unset
    pub fn device_or(&self, detected: DeviceProfile) -> DeviceProfile {
        self.device.unwrap_or(detected)
    }

    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Flash overlay alpha (respects reduced_motion)
    pub fn effective_flash_alpha(&self, alpha: f32) -> f32 {
        if self.reduced_motion {
            alpha * Self::REDUCED_FLASH_SCALE
        } else {
            alpha
        }
    }

    /// Load settings, falling back to defaults on a missing or bad entry
    pub fn load(storage: &dyn Storage) -> Self {
        let Some(json) = storage.get(Self::STORAGE_KEY) else {
            log::info!("Using default settings");
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode settings: {}", e);
                return;
            }
        };
        match storage.set(Self::STORAGE_KEY, &json) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}
