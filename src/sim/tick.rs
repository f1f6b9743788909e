//! Per-frame race advancement
//!
//! The host calls `tick` once per frame with its clock and frame delta, and
//! forwards the human's dive and stroke inputs between ticks. All timers are
//! counters decremented here, so a race replays identically from the same
//! sequence of calls.

use super::dive::{DiveAttempt, evaluate_dive};
use super::state::{RaceEvent, RacePhase, RaceState};
use super::swimmer::{DiveOutcome, InputOutcome, Side};
use crate::consts::*;

/// Advance the race by one frame. A negative or non-finite delta counts as 0.
pub fn tick(race: &mut RaceState, now_ms: f64, delta_ms: f64) {
    if race.phase == RacePhase::Finished {
        return;
    }
    let delta_ms = frame_delta(delta_ms);
    race.now_ms = now_ms;

    match race.phase {
        RacePhase::Countdown => advance_countdown(race, now_ms, delta_ms),

        RacePhase::DiveWindow | RacePhase::Racing => {
            race.time_limit_remaining_ms -= delta_ms;
            if race.time_limit_remaining_ms <= 0.0 {
                race.force_finish_at(now_ms);
                return;
            }

            if race.phase == RacePhase::DiveWindow {
                dive_ready_opponents(race, now_ms);
            }

            advance_swimmers(race, now_ms, delta_ms);

            if race.phase == RacePhase::DiveWindow {
                race.dive_window_remaining_ms -= delta_ms;
                if race.dive_window_remaining_ms <= 0.0 {
                    close_dive_window(race);
                }
            }
        }

        RacePhase::Finished => {}
    }
}

/// Human dive. Judged against the start signal; at most once per race.
pub fn register_dive(race: &mut RaceState, now_ms: f64) -> DiveOutcome {
    if race.phase != RacePhase::DiveWindow {
        return DiveOutcome::Ignored;
    }
    let Some(start) = race.start_instant_ms() else {
        return DiveOutcome::Ignored;
    };
    let attempt = evaluate_dive(now_ms - start);

    let Some(lane) = race.human_lane() else {
        return DiveOutcome::Ignored;
    };
    let dove = race
        .human_mut()
        .map(|swimmer| swimmer.dive(Some(attempt)))
        .unwrap_or(false);
    if !dove {
        return DiveOutcome::Ignored;
    }

    log::debug!(
        "Dive judged {:?} ({:.0}ms, x{:.1})",
        attempt.tier,
        attempt.elapsed_ms,
        attempt.multiplier
    );
    race.push_event(RaceEvent::DiveJudged { lane, attempt });
    DiveOutcome::Accepted(attempt)
}

/// Human stroke input
pub fn register_input(race: &mut RaceState, now_ms: f64, side: Side) -> InputOutcome {
    if race.phase == RacePhase::Finished {
        return InputOutcome::Ignored;
    }
    race.human_mut()
        .map(|swimmer| swimmer.register_input(now_ms, side))
        .unwrap_or(InputOutcome::Ignored)
}

/// End the race now, ranking unfinished swimmers by distance. No-op once finished.
pub fn force_finish(race: &mut RaceState, now_ms: f64) {
    race.force_finish_at(now_ms);
}

/// Frame delta the timers can trust
pub(crate) fn frame_delta(delta_ms: f64) -> f64 {
    if delta_ms.is_finite() {
        delta_ms.max(0.0)
    } else {
        0.0
    }
}

fn advance_countdown(race: &mut RaceState, now_ms: f64, delta_ms: f64) {
    race.step_remaining_ms -= delta_ms;

    while race.phase == RacePhase::Countdown && race.step_remaining_ms <= 0.0 {
        match race.countdown_step {
            0 => race.begin_dive_window(now_ms),
            1 => {
                race.countdown_step = 0;
                race.step_remaining_ms += GO_DELAY_MS;
            }
            _ => {
                race.countdown_step -= 1;
                race.step_remaining_ms += COUNTDOWN_STEP_MS;
                let step = race.countdown_step;
                race.push_event(RaceEvent::Countdown(step));
            }
        }
    }
}

fn dive_ready_opponents(race: &mut RaceState, now_ms: f64) {
    let Some(start) = race.start_instant_ms() else {
        return;
    };
    let elapsed = now_ms - start;
    for swimmer in race.swimmers.iter_mut() {
        if let Some(ai) = swimmer.ai {
            if !swimmer.has_started && ai.ready_to_dive(elapsed) {
                swimmer.dive(None);
            }
        }
    }
}

/// Window over: whoever is still on the block goes in now
fn close_dive_window(race: &mut RaceState) {
    if let Some(lane) = race.human_lane() {
        let forced = DiveAttempt::forced_late();
        let dove = race
            .human_mut()
            .map(|swimmer| swimmer.dive(Some(forced)))
            .unwrap_or(false);
        if dove {
            log::debug!("Lane {} never dove, forcing a late start", lane);
            race.push_event(RaceEvent::DiveJudged {
                lane,
                attempt: forced,
            });
        }
    }
    for swimmer in race.swimmers.iter_mut() {
        if !swimmer.has_started {
            swimmer.dive(None);
        }
    }
    if race.phase == RacePhase::DiveWindow {
        race.phase = RacePhase::Racing;
    }
}

/// Move every swimmer once, in lane order, placing finishers as they touch
fn advance_swimmers(race: &mut RaceState, now_ms: f64, delta_ms: f64) {
    let distance = race.race_distance_m;
    let finished: Vec<(usize, f64)> = race
        .swimmers
        .iter_mut()
        .filter_map(|swimmer| {
            swimmer
                .tick(now_ms, delta_ms, distance)
                .then(|| (swimmer.id, swimmer.finish_instant_ms.unwrap_or(now_ms)))
        })
        .collect();

    for (lane, instant) in finished {
        race.record_finish(lane, instant, false);
    }
    race.seal_if_complete();
}
