//! Game settings and preferences
//!
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_RACE_DISTANCE_M, MAX_LANES};
use crate::sim::{Participant, StrokeStyle};

/// Race distances offered in the menu (meters)
pub const RACE_DISTANCES: [f64; 3] = [25.0, 50.0, 100.0];

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Stroke for the next race
    pub stroke: StrokeStyle,
    /// Race length (meters)
    pub race_distance_m: f64,
    /// AI opponents in the pool
    pub opponents: usize,
    /// Name pre-filled on the high score entry
    pub player_name: String,
    /// Fixed seed for repeatable races (random per race when None)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stroke: StrokeStyle::Freestyle,
            race_distance_m: DEFAULT_RACE_DISTANCE_M,
            opponents: 3,
            player_name: String::new(),
            seed: None,
        }
    }
}

impl Settings {
    /// Clamp values loaded from storage into playable ranges
    pub fn sanitized(mut self) -> Self {
        self.opponents = self.opponents.min(MAX_LANES - 1);
        if !RACE_DISTANCES.contains(&self.race_distance_m) {
            self.race_distance_m = DEFAULT_RACE_DISTANCE_M;
        }
        self
    }

    /// Lane in the middle of the pool the player swims in
    pub fn human_lane(&self) -> usize {
        (self.opponents.min(MAX_LANES - 1) + 1) / 2
    }

    /// Lane list for `start_race`: everyone swims the same stroke
    pub fn participants(&self) -> Vec<Participant> {
        let lanes = self.opponents.min(MAX_LANES - 1) + 1;
        let human = self.human_lane();
        (0..lanes)
            .map(|lane| {
                if lane == human {
                    Participant::human(self.stroke)
                } else {
                    Participant::ai(self.stroke)
                }
            })
            .collect()
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "swim_race_settings";

    /// Parse stored JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
