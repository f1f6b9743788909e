//! JavaScript bindings
//!
//! The browser host owns scenes, menus and drawing. It creates a `WebRace`
//! when the race scene opens, forwards key/tap events, calls `tick` from its
//! update hook and reads snapshots back as JSON.

use wasm_bindgen::prelude::*;

use crate::highscores::{HighScoreBook, ScoreTable};
use crate::settings::Settings;
use crate::sim::{self, DiveOutcome, InputOutcome, RaceState, Side, StrokeStyle};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Swim Race core loaded");
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Serialization failed: {}", e);
        String::from("null")
    })
}

/// A race driven by the JS scene
#[wasm_bindgen]
pub struct WebRace {
    race: RaceState,
}

#[wasm_bindgen]
impl WebRace {
    /// Build a race from the stored settings
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WebRace, JsError> {
        let settings = Settings::load();
        let seed = settings
            .seed
            .unwrap_or_else(|| js_sys::Date::now().to_bits());
        let race = sim::start_race(&settings.participants(), settings.race_distance_m, seed)?;
        Ok(WebRace { race })
    }

    pub fn tick(&mut self, now_ms: f64, delta_ms: f64) {
        sim::tick(&mut self.race, now_ms, delta_ms);
    }

    /// Returns the judged dive as JSON, or null if the dive was ignored
    pub fn dive(&mut self, now_ms: f64) -> String {
        match sim::register_dive(&mut self.race, now_ms) {
            DiveOutcome::Accepted(attempt) => to_json(&attempt),
            DiveOutcome::Ignored => String::from("null"),
        }
    }

    /// `left` selects the side pressed. Returns the judgment as JSON, or null if ignored.
    pub fn input(&mut self, now_ms: f64, left: bool) -> String {
        let side = if left { Side::Left } else { Side::Right };
        match sim::register_input(&mut self.race, now_ms, side) {
            outcome @ InputOutcome::Judged { .. } => to_json(&outcome),
            InputOutcome::Ignored => String::from("null"),
        }
    }

    pub fn force_finish(&mut self, now_ms: f64) {
        sim::force_finish(&mut self.race, now_ms);
    }

    pub fn snapshot_json(&self) -> String {
        to_json(&self.race.snapshot())
    }

    /// Events since the last call
    pub fn events_json(&mut self) -> String {
        to_json(&self.race.drain_events())
    }

    /// Sealed results, or null while the race is running
    pub fn finish_order_json(&self) -> String {
        match self.race.finish_order() {
            Some(order) => to_json(&order),
            None => String::from("null"),
        }
    }

    pub fn human_lane(&self) -> Option<u32> {
        self.race.human_lane().map(|lane| lane as u32)
    }
}

/// Whether a time makes the stored top 10 for the stroke (menu order index)
#[wasm_bindgen]
pub fn score_qualifies(stroke: u8, time_s: f64) -> bool {
    let Some(style) = StrokeStyle::from_index(stroke) else {
        return false;
    };
    HighScoreBook::load().is_qualifying(style, time_s)
}

/// Record a time and persist the book; returns the rank (0 if not recorded)
#[wasm_bindgen]
pub fn record_score(stroke: u8, time_s: f64, name: &str, place: u32) -> u32 {
    let Some(style) = StrokeStyle::from_index(stroke) else {
        return 0;
    };
    let mut book = HighScoreBook::load();
    match book.record(style, time_s, name, place as usize) {
        Some(rank) => {
            book.save();
            rank as u32
        }
        None => 0,
    }
}

/// Stored times for a stroke as JSON
#[wasm_bindgen]
pub fn high_scores_json(stroke: u8) -> String {
    let Some(style) = StrokeStyle::from_index(stroke) else {
        return String::from("[]");
    };
    to_json(&HighScoreBook::load().entries(style))
}
