//! Swim Race - a browser swim-race mini-game
//!
//! Core modules:
//! - `sim`: Deterministic race simulation (dive timing, cadence, swimmers, race director)
//! - `highscores`: Per-stroke top-10 time tables
//! - `settings`: Player preferences
//! - `web`: JavaScript bindings for the browser host (wasm32 only)

pub mod highscores;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{HighScoreBook, ScoreTable};
pub use settings::Settings;

/// Race tuning constants
pub mod consts {
    /// Host frame rate the native runner drives the simulation at
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;

    /// Countdown steps shown before the start signal (3, 2, 1)
    pub const COUNTDOWN_STEPS: u8 = 3;
    /// Duration of each countdown step
    pub const COUNTDOWN_STEP_MS: f64 = 1000.0;
    /// Pause between the last count and the start signal
    pub const GO_DELAY_MS: f64 = 300.0;
    /// Dive window after the start signal. Also the upper bound of the "normal" dive tier.
    pub const DIVE_WINDOW_MS: f64 = 1000.0;
    /// Hard ceiling on race duration, measured from the start signal
    pub const RACE_TIME_LIMIT_MS: f64 = 60_000.0;

    /// Default race length (meters)
    pub const DEFAULT_RACE_DISTANCE_M: f64 = 50.0;

    /// Momentum ceiling
    pub const MOMENTUM_CAP: f64 = 6.5;
    /// Momentum seeded by a human dive before the dive multiplier
    pub const DIVE_BASE_MOMENTUM: f64 = 6.0;
    /// Linear momentum decay (per second)
    pub const MOMENTUM_DECAY_PER_S: f64 = 4.0;
    /// Momentum gained by a correct alternating input
    pub const STROKE_MOMENTUM_GAIN: f64 = 1.5;
    /// Rhythm bonus when the gap since the previous input is in the sweet spot
    pub const RHYTHM_BONUS: f64 = 0.5;
    pub const RHYTHM_WINDOW_MIN_MS: f64 = 250.0;
    pub const RHYTHM_WINDOW_MAX_MS: f64 = 700.0;
    /// Penalty when the gap since the previous input is too long
    pub const SLOW_STROKE_PENALTY: f64 = 1.0;
    pub const SLOW_STROKE_GAP_MS: f64 = 1000.0;
    /// Momentum lost on a wrong-side input
    pub const WRONG_INPUT_MOMENTUM_LOSS: f64 = 8.0;
    /// Speed multiplier while a penalty window is open
    pub const PENALTY_MULTIPLIER: f64 = 0.7;
    pub const PENALTY_DURATION_MS: f64 = 2000.0;

    /// Dive bonus decay toward 1.0 (per second)
    pub const DIVE_BONUS_DECAY_PER_S: f64 = 0.02;
    /// Faster decay used when the dive earned a bonus
    pub const DIVE_BONUS_DECAY_BOOSTED_PER_S: f64 = 0.025;

    /// Cadence frequency window
    pub const CADENCE_WINDOW_MS: f64 = 2000.0;
    /// Input rate at which the frequency multiplier saturates (inputs/sec)
    pub const CADENCE_MAX_RATE: f64 = 10.0;
    pub const CADENCE_MAX_BONUS: f64 = 0.1;
    /// Number of recent inputs used for the pace measure
    pub const RECENT_INPUTS: usize = 5;
    /// Target pace (inputs/sec)
    pub const TARGET_CADENCE: f64 = 2.0;
    pub const PACE_MAX_BONUS: f64 = 0.2;
    pub const PACE_MIN_MULTIPLIER: f64 = 0.5;

    /// AI cruising speed before skill and stroke (m/s)
    pub const AI_BASE_SPEED: f64 = 5.5;
    pub const AI_SKILL_MIN: f64 = 0.85;
    pub const AI_SKILL_MAX: f64 = 1.10;
    /// AI reaction to the start signal (ms), always inside the dive window
    pub const AI_REACTION_MIN_MS: f64 = 120.0;
    pub const AI_REACTION_MAX_MS: f64 = 450.0;
    /// Distance an AI dive covers (meters)
    pub const AI_DIVE_DISTANCE_M: f64 = 1.5;

    /// Maximum lanes in the pool
    pub const MAX_LANES: usize = 8;
}
