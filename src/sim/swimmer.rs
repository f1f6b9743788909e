//! Per-swimmer propulsion model
//!
//! A swimmer goes through: idle on the block -> dive -> alternating-input
//! propulsion with decaying momentum -> finished. Instantaneous speed is the
//! product of momentum and a stack of multipliers:
//!
//! `speed = momentum * frequency * pace * dive_bonus * penalty * stroke`
//!
//! AI swimmers skip all of that and cruise (see [`AiController`]).

use serde::{Deserialize, Serialize};

use super::ai::AiController;
use super::cadence::InputCadenceTracker;
use super::dive::DiveAttempt;
use super::stroke::StrokeStyle;
use super::tick::frame_delta;
use crate::consts::*;

/// Which of the two alternating inputs was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Result of a dive request at the race level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DiveOutcome {
    Accepted(DiveAttempt),
    /// Outside the dive window, already dived, or no human in the race
    Ignored,
}

/// Result of a stroke input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputOutcome {
    Judged { correct: bool, momentum_delta: f64 },
    /// Before the dive, after the finish, or not an interactive swimmer
    Ignored,
}

/// Speed components from the most recent tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedBreakdown {
    pub momentum: f64,
    pub frequency: f64,
    pub pace: f64,
    pub dive_bonus: f64,
    pub penalty: f64,
    pub stroke: f64,
    /// Meters per second
    pub speed: f64,
}

impl Default for SpeedBreakdown {
    fn default() -> Self {
        Self {
            momentum: 0.0,
            frequency: 1.0,
            pace: 1.0,
            dive_bonus: 1.0,
            penalty: 1.0,
            stroke: 1.0,
            speed: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwimmerState {
    /// Lane index
    pub(crate) id: usize,
    pub(crate) style: StrokeStyle,
    pub(crate) distance_m: f64,
    pub(crate) momentum: f64,
    pub(crate) has_started: bool,
    pub(crate) expected_input: Side,
    pub(crate) dive_bonus_multiplier: f64,
    dive_bonus_decay_per_s: f64,
    pub(crate) penalty_multiplier: f64,
    penalty_remaining_ms: f64,
    cadence: InputCadenceTracker,
    /// Pace multiplier, recomputed on every input
    pace_multiplier: f64,
    pub(crate) correct_inputs: u32,
    pub(crate) incorrect_inputs: u32,
    pub(crate) total_inputs: u32,
    last_input_ms: Option<f64>,
    pub(crate) finished: bool,
    pub(crate) finish_instant_ms: Option<f64>,
    /// The judged dive, if this swimmer dove on input or was forced
    pub(crate) dive: Option<DiveAttempt>,
    /// Present for AI swimmers only
    pub(crate) ai: Option<AiController>,
    last_speed: SpeedBreakdown,
}

impl SwimmerState {
    fn new(id: usize, style: StrokeStyle, ai: Option<AiController>) -> Self {
        Self {
            id,
            style,
            distance_m: 0.0,
            momentum: 0.0,
            has_started: false,
            expected_input: Side::Left,
            dive_bonus_multiplier: 1.0,
            dive_bonus_decay_per_s: DIVE_BONUS_DECAY_PER_S,
            penalty_multiplier: 1.0,
            penalty_remaining_ms: 0.0,
            cadence: InputCadenceTracker::new(),
            pace_multiplier: 1.0,
            correct_inputs: 0,
            incorrect_inputs: 0,
            total_inputs: 0,
            last_input_ms: None,
            finished: false,
            finish_instant_ms: None,
            dive: None,
            ai,
            last_speed: SpeedBreakdown {
                stroke: style.speed_multiplier(),
                ..Default::default()
            },
        }
    }

    /// A human-controlled swimmer
    pub fn interactive(id: usize, style: StrokeStyle) -> Self {
        Self::new(id, style, None)
    }

    /// An AI-controlled swimmer
    pub fn computer(id: usize, style: StrokeStyle, ai: AiController) -> Self {
        Self::new(id, style, Some(ai))
    }

    /// Lane index
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn expected_input(&self) -> Side {
        self.expected_input
    }

    pub fn dive_bonus_multiplier(&self) -> f64 {
        self.dive_bonus_multiplier
    }

    pub fn penalty_multiplier(&self) -> f64 {
        self.penalty_multiplier
    }

    pub fn correct_inputs(&self) -> u32 {
        self.correct_inputs
    }

    pub fn incorrect_inputs(&self) -> u32 {
        self.incorrect_inputs
    }

    pub fn total_inputs(&self) -> u32 {
        self.total_inputs
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn finish_instant_ms(&self) -> Option<f64> {
        self.finish_instant_ms
    }

    /// The judged dive, if any
    pub fn dive_attempt(&self) -> Option<DiveAttempt> {
        self.dive
    }

    pub fn ai(&self) -> Option<&AiController> {
        self.ai.as_ref()
    }

    pub fn is_interactive(&self) -> bool {
        self.ai.is_none()
    }

    /// Correct / total, 1.0 before any input
    pub fn accuracy(&self) -> f64 {
        if self.total_inputs == 0 {
            1.0
        } else {
            self.correct_inputs as f64 / self.total_inputs as f64
        }
    }

    pub fn penalty_active(&self) -> bool {
        self.penalty_remaining_ms > 0.0
    }

    pub fn speed(&self) -> SpeedBreakdown {
        self.last_speed
    }

    /// Leave the block. Returns false if already started.
    ///
    /// Interactive swimmers seed momentum from the dive multiplier; AI swimmers
    /// get a fixed distance credit instead.
    pub fn dive(&mut self, attempt: Option<DiveAttempt>) -> bool {
        if self.has_started {
            return false;
        }
        self.has_started = true;
        self.dive = attempt;

        if let Some(ai) = &self.ai {
            log::debug!("Lane {} AI dives (skill {:.2})", self.id, ai.skill);
            self.distance_m += AI_DIVE_DISTANCE_M;
            return true;
        }

        let multiplier = attempt.map(|a| a.multiplier).unwrap_or(1.0);
        self.momentum = (DIVE_BASE_MOMENTUM * multiplier).min(MOMENTUM_CAP);
        self.dive_bonus_multiplier = multiplier;
        self.dive_bonus_decay_per_s = if multiplier > 1.0 {
            DIVE_BONUS_DECAY_BOOSTED_PER_S
        } else {
            DIVE_BONUS_DECAY_PER_S
        };
        true
    }

    /// Judge a stroke input
    pub fn register_input(&mut self, now_ms: f64, side: Side) -> InputOutcome {
        if !self.has_started || self.finished || !self.is_interactive() {
            return InputOutcome::Ignored;
        }

        self.total_inputs += 1;
        self.cadence.record(now_ms);
        self.pace_multiplier = self.cadence.pace_multiplier();

        let gap_ms = self.last_input_ms.map(|last| now_ms - last);
        self.last_input_ms = Some(now_ms);
        let before = self.momentum;

        if side == self.expected_input {
            self.correct_inputs += 1;
            let mut gain = STROKE_MOMENTUM_GAIN;
            if let Some(gap) = gap_ms {
                if (RHYTHM_WINDOW_MIN_MS..=RHYTHM_WINDOW_MAX_MS).contains(&gap) {
                    gain += RHYTHM_BONUS;
                } else if gap > SLOW_STROKE_GAP_MS {
                    gain -= SLOW_STROKE_PENALTY;
                }
            }
            self.momentum = (self.momentum + gain).clamp(0.0, MOMENTUM_CAP);
            self.expected_input = self.expected_input.other();

            InputOutcome::Judged {
                correct: true,
                momentum_delta: self.momentum - before,
            }
        } else {
            self.incorrect_inputs += 1;
            self.momentum = (self.momentum - WRONG_INPUT_MOMENTUM_LOSS).max(0.0);
            // Restart, never stack
            self.penalty_multiplier = PENALTY_MULTIPLIER;
            self.penalty_remaining_ms = PENALTY_DURATION_MS;

            InputOutcome::Judged {
                correct: false,
                momentum_delta: self.momentum - before,
            }
        }
    }

    /// Advance one step. Returns true on the tick the swimmer crosses the finish.
    ///
    /// A negative or non-finite `delta_ms` is treated as 0.
    pub fn tick(&mut self, now_ms: f64, delta_ms: f64, race_distance_m: f64) -> bool {
        if self.finished {
            return false;
        }
        let delta_ms = frame_delta(delta_ms);
        let dt = delta_ms / 1000.0;
        let stroke = self.style.speed_multiplier();

        if !self.has_started {
            self.last_speed = SpeedBreakdown {
                stroke,
                ..Default::default()
            };
            return false;
        }

        self.last_speed = match &self.ai {
            Some(ai) => SpeedBreakdown {
                stroke,
                speed: ai.speed(stroke),
                ..Default::default()
            },
            None => {
                self.momentum = (self.momentum - MOMENTUM_DECAY_PER_S * dt).max(0.0);
                self.dive_bonus_multiplier =
                    (self.dive_bonus_multiplier - self.dive_bonus_decay_per_s * dt).max(1.0);

                if self.penalty_remaining_ms > 0.0 {
                    self.penalty_remaining_ms -= delta_ms;
                    if self.penalty_remaining_ms <= 0.0 {
                        self.penalty_remaining_ms = 0.0;
                        self.penalty_multiplier = 1.0;
                    }
                }

                let frequency = self.cadence.frequency_multiplier(now_ms);
                let speed = self.momentum
                    * frequency
                    * self.pace_multiplier
                    * self.dive_bonus_multiplier
                    * self.penalty_multiplier
                    * stroke;

                SpeedBreakdown {
                    momentum: self.momentum,
                    frequency,
                    pace: self.pace_multiplier,
                    dive_bonus: self.dive_bonus_multiplier,
                    penalty: self.penalty_multiplier,
                    stroke,
                    speed,
                }
            }
        };

        self.distance_m += self.last_speed.speed * dt;

        if self.distance_m >= race_distance_m {
            self.finished = true;
            self.finish_instant_ms = Some(now_ms);
            log::debug!("Lane {} touches the wall at {:.0}ms", self.id, now_ms);
            return true;
        }
        false
    }
}
