//! Input cadence tracking
//!
//! Two independent signals built from input timestamps:
//! - frequency: how many inputs landed in the trailing window
//! - pace: mean interval across the last few inputs vs. a target cadence
//!
//! Both are fed by every input, correct or not.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputCadenceTracker {
    /// Timestamps inside the frequency window (oldest first)
    window: VecDeque<f64>,
    /// Most recent timestamps for the pace measure (oldest first)
    recent: VecDeque<f64>,
}

impl InputCadenceTracker {
    pub fn new() -> Self {
        Self {
            window: VecDeque::new(),
            recent: VecDeque::with_capacity(RECENT_INPUTS),
        }
    }

    /// Record an input at `now_ms`
    pub fn record(&mut self, now_ms: f64) {
        self.window.push_back(now_ms);
        self.prune(now_ms);

        self.recent.push_back(now_ms);
        while self.recent.len() > RECENT_INPUTS {
            self.recent.pop_front();
        }
    }

    fn prune(&mut self, now_ms: f64) {
        let cutoff = now_ms - CADENCE_WINDOW_MS;
        while self.window.front().is_some_and(|&t| t < cutoff) {
            self.window.pop_front();
        }
    }

    /// Inputs currently inside the frequency window
    pub fn inputs_in_window(&self) -> usize {
        self.window.len()
    }

    /// Activity-density multiplier in [1.0, 1.1], pruning the window to `now_ms`
    pub fn frequency_multiplier(&mut self, now_ms: f64) -> f64 {
        self.prune(now_ms);
        let rate = self.window.len() as f64 / (CADENCE_WINDOW_MS / 1000.0);
        let ratio = (rate / CADENCE_MAX_RATE).min(1.0);
        1.0 + ratio.sqrt() * CADENCE_MAX_BONUS
    }

    /// Pace multiplier in [0.5, 1.2]; neutral until two inputs are buffered
    pub fn pace_multiplier(&self) -> f64 {
        let (Some(&oldest), Some(&newest)) = (self.recent.front(), self.recent.back()) else {
            return 1.0;
        };
        if self.recent.len() < 2 {
            return 1.0;
        }

        let mean_interval_ms = (newest - oldest) / (self.recent.len() - 1) as f64;
        if mean_interval_ms <= 0.0 {
            return 1.0 + PACE_MAX_BONUS;
        }

        let clicks_per_sec = 1000.0 / mean_interval_ms;
        let rate_ratio = clicks_per_sec / TARGET_CADENCE;

        if rate_ratio >= 1.0 {
            // Logarithmic: tripling the target pace earns the full bonus
            let bonus = rate_ratio.ln() / 3.0f64.ln();
            (1.0 + bonus * PACE_MAX_BONUS).clamp(1.0, 1.0 + PACE_MAX_BONUS)
        } else {
            (PACE_MIN_MULTIPLIER + rate_ratio * 0.5).max(PACE_MIN_MULTIPLIER)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_tracker_is_neutral() {
        let mut tracker = InputCadenceTracker::new();
        assert!(approx(tracker.frequency_multiplier(0.0), 1.0));
        assert!(approx(tracker.pace_multiplier(), 1.0));
    }

    #[test]
    fn test_single_input_pace_is_neutral() {
        let mut tracker = InputCadenceTracker::new();
        tracker.record(100.0);
        assert!(approx(tracker.pace_multiplier(), 1.0));
    }

    #[test]
    fn test_frequency_multiplier_curve() {
        let mut tracker = InputCadenceTracker::new();
        // 5 inputs in 2s -> 2.5/s -> ratio 0.25 -> sqrt 0.5 -> 1.05
        for i in 0..5 {
            tracker.record(i as f64 * 400.0);
        }
        assert!(approx(tracker.frequency_multiplier(1600.0), 1.05));
    }

    #[test]
    fn test_frequency_multiplier_saturates() {
        let mut tracker = InputCadenceTracker::new();
        for i in 0..40 {
            tracker.record(i as f64 * 40.0);
        }
        assert!(approx(tracker.frequency_multiplier(1560.0), 1.1));
    }

    #[test]
    fn test_frequency_window_prunes_old_inputs() {
        let mut tracker = InputCadenceTracker::new();
        tracker.record(0.0);
        tracker.record(100.0);
        assert_eq!(tracker.inputs_in_window(), 2);
        assert!(approx(tracker.frequency_multiplier(5000.0), 1.0));
        assert_eq!(tracker.inputs_in_window(), 0);
    }

    #[test]
    fn test_pace_at_target_is_neutral() {
        let mut tracker = InputCadenceTracker::new();
        tracker.record(0.0);
        tracker.record(500.0);
        assert!(approx(tracker.pace_multiplier(), 1.0));
    }

    #[test]
    fn test_pace_bonus_is_logarithmic_and_capped() {
        let mut tracker = InputCadenceTracker::new();
        // 6/s = 3x target -> full bonus
        tracker.record(0.0);
        tracker.record(1000.0 / 6.0);
        assert!(approx(tracker.pace_multiplier(), 1.2));

        let mut fast = InputCadenceTracker::new();
        fast.record(0.0);
        fast.record(10.0);
        assert!(approx(fast.pace_multiplier(), 1.2));
    }

    #[test]
    fn test_pace_penalty_is_linear_with_floor() {
        let mut tracker = InputCadenceTracker::new();
        // 1/s -> ratio 0.5 -> 0.75
        tracker.record(0.0);
        tracker.record(1000.0);
        assert!(approx(tracker.pace_multiplier(), 0.75));

        let mut slow = InputCadenceTracker::new();
        slow.record(0.0);
        slow.record(60_000.0);
        assert!(slow.pace_multiplier() >= 0.5);
        assert!(slow.pace_multiplier() < 0.51);
    }

    #[test]
    fn test_pace_uses_last_five_inputs_only() {
        let mut tracker = InputCadenceTracker::new();
        // A long stall followed by five quick inputs
        tracker.record(0.0);
        for i in 0..5 {
            tracker.record(10_000.0 + i as f64 * 250.0);
        }
        // 4/s -> ratio 2 -> 1 + ln2/ln3 * 0.2
        let expected = 1.0 + (2.0f64.ln() / 3.0f64.ln()) * 0.2;
        assert!(approx(tracker.pace_multiplier(), expected));
    }

    #[test]
    fn test_simultaneous_inputs_saturate() {
        let mut tracker = InputCadenceTracker::new();
        tracker.record(300.0);
        tracker.record(300.0);
        assert!(approx(tracker.pace_multiplier(), 1.2));
    }
}
