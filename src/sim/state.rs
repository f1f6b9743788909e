//! Race state and finish bookkeeping
//!
//! Everything the race director owns lives here. Per-tick advancement and
//! input entry points are in `tick.rs`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ai::AiController;
use super::dive::DiveAttempt;
use super::stroke::StrokeStyle;
use super::swimmer::{Side, SpeedBreakdown, SwimmerState};
use crate::consts::*;

/// Race state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    /// 3, 2, 1 and the pause before the start signal
    Countdown,
    /// Start signal given, human may dive
    DiveWindow,
    Racing,
    /// Results sealed
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantKind {
    Human,
    Ai,
}

/// One lane at race setup; lane number is its position in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub kind: ParticipantKind,
    pub style: StrokeStyle,
}

impl Participant {
    pub fn human(style: StrokeStyle) -> Self {
        Self {
            kind: ParticipantKind::Human,
            style,
        }
    }

    pub fn ai(style: StrokeStyle) -> Self {
        Self {
            kind: ParticipantKind::Ai,
            style,
        }
    }
}

/// A placed swimmer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinishEntry {
    /// Lane index
    pub participant_id: usize,
    /// Seconds since the start signal
    pub time_s: f64,
    /// 1-based
    pub place: usize,
    /// Placed by the time limit rather than by touching the wall
    pub forced: bool,
}

/// Notifications for the presentation layer, drained each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RaceEvent {
    /// Countdown number shown (3, 2, 1)
    Countdown(u8),
    /// Start signal
    Start { at_ms: f64 },
    DiveJudged { lane: usize, attempt: DiveAttempt },
    SwimmerFinished(FinishEntry),
    /// Emitted once, with the sealed finish order
    RaceFinished(Vec<FinishEntry>),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RaceSetupError {
    #[error("a race needs at least one participant")]
    NoParticipants,
    #[error("{0} participants do not fit in {max} lanes", max = MAX_LANES)]
    TooManyLanes(usize),
    #[error("only one human swimmer is supported, got {0}")]
    MultipleHumans(usize),
    #[error("race distance must be a positive number of meters, got {0}")]
    InvalidDistance(f64),
}

/// Read-only view of one swimmer for the HUD
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwimmerSnapshot {
    pub id: usize,
    pub interactive: bool,
    pub style: StrokeStyle,
    pub distance_m: f64,
    /// Fraction of the race distance covered, 0..=1
    pub progress: f64,
    pub speed: SpeedBreakdown,
    pub accuracy: f64,
    pub correct_inputs: u32,
    pub incorrect_inputs: u32,
    pub total_inputs: u32,
    pub expected_input: Side,
    pub penalty_active: bool,
    pub has_started: bool,
    pub finished: bool,
    pub place: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub phase: RacePhase,
    /// Number currently shown during the countdown
    pub countdown: Option<u8>,
    /// Seconds since the start signal (0 before it)
    pub race_time_s: f64,
    pub race_distance_m: f64,
    pub swimmers: Vec<SwimmerSnapshot>,
}

/// A single race, from countdown to sealed results
///
/// Only the director mutates a race; hosts read it through accessors.
///
/// ```compile_fail
/// use swim_race::sim::{Participant, RacePhase, StrokeStyle, start_race};
///
/// let mut race = start_race(&[Participant::human(StrokeStyle::Freestyle)], 50.0, 1).unwrap();
/// race.phase = RacePhase::Finished;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaceState {
    pub(crate) seed: u64,
    pub(crate) phase: RacePhase,
    pub(crate) race_distance_m: f64,
    /// Indexed by lane
    pub(crate) swimmers: Vec<SwimmerState>,
    human_lane: Option<usize>,
    start_instant_ms: Option<f64>,
    finish_order: Vec<FinishEntry>,
    /// Host time of the latest tick
    pub(crate) now_ms: f64,
    pub(crate) countdown_step: u8,
    pub(crate) step_remaining_ms: f64,
    pub(crate) dive_window_remaining_ms: f64,
    pub(crate) time_limit_remaining_ms: f64,
    #[serde(skip)]
    events: Vec<RaceEvent>,
}

/// Set up a race. AI opponents are rolled from `seed`.
pub fn start_race(
    participants: &[Participant],
    race_distance_m: f64,
    seed: u64,
) -> Result<RaceState, RaceSetupError> {
    if participants.is_empty() {
        return Err(RaceSetupError::NoParticipants);
    }
    if participants.len() > MAX_LANES {
        return Err(RaceSetupError::TooManyLanes(participants.len()));
    }
    let humans = participants
        .iter()
        .filter(|p| p.kind == ParticipantKind::Human)
        .count();
    if humans > 1 {
        return Err(RaceSetupError::MultipleHumans(humans));
    }
    if !race_distance_m.is_finite() || race_distance_m <= 0.0 {
        return Err(RaceSetupError::InvalidDistance(race_distance_m));
    }

    let mut rng = Pcg32::seed_from_u64(seed);
    let swimmers = participants
        .iter()
        .enumerate()
        .map(|(lane, p)| match p.kind {
            ParticipantKind::Human => SwimmerState::interactive(lane, p.style),
            ParticipantKind::Ai => {
                SwimmerState::computer(lane, p.style, AiController::roll(&mut rng))
            }
        })
        .collect();

    let human_lane = participants
        .iter()
        .position(|p| p.kind == ParticipantKind::Human);

    log::info!(
        "Race set up: {} lanes, {}m, human lane {:?}, seed {}",
        participants.len(),
        race_distance_m,
        human_lane,
        seed
    );

    Ok(RaceState {
        seed,
        phase: RacePhase::Countdown,
        race_distance_m,
        swimmers,
        human_lane,
        start_instant_ms: None,
        finish_order: Vec::with_capacity(participants.len()),
        now_ms: 0.0,
        countdown_step: COUNTDOWN_STEPS,
        step_remaining_ms: COUNTDOWN_STEP_MS,
        dive_window_remaining_ms: DIVE_WINDOW_MS,
        time_limit_remaining_ms: RACE_TIME_LIMIT_MS,
        events: vec![RaceEvent::Countdown(COUNTDOWN_STEPS)],
    })
}

impl RaceState {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn race_distance_m(&self) -> f64 {
        self.race_distance_m
    }

    /// Indexed by lane
    pub fn swimmers(&self) -> &[SwimmerState] {
        &self.swimmers
    }

    pub fn human_lane(&self) -> Option<usize> {
        self.human_lane
    }

    pub fn human(&self) -> Option<&SwimmerState> {
        self.human_lane.and_then(|lane| self.swimmers.get(lane))
    }

    pub(crate) fn human_mut(&mut self) -> Option<&mut SwimmerState> {
        self.human_lane.and_then(|lane| self.swimmers.get_mut(lane))
    }

    pub fn start_instant_ms(&self) -> Option<f64> {
        self.start_instant_ms
    }

    /// The sealed results, once the race is over
    pub fn finish_order(&self) -> Option<&[FinishEntry]> {
        (self.phase == RacePhase::Finished).then_some(self.finish_order.as_slice())
    }

    /// Swimmers placed so far
    pub fn placings(&self) -> &[FinishEntry] {
        &self.finish_order
    }

    pub fn place_of(&self, lane: usize) -> Option<usize> {
        self.finish_order
            .iter()
            .find(|e| e.participant_id == lane)
            .map(|e| e.place)
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: RaceEvent) {
        self.events.push(event);
    }

    fn race_time_s(&self, now_ms: f64) -> f64 {
        self.start_instant_ms
            .map(|start| ((now_ms - start) / 1000.0).max(0.0))
            .unwrap_or(0.0)
    }

    /// Give the start signal
    pub(crate) fn begin_dive_window(&mut self, now_ms: f64) {
        self.start_instant_ms = Some(now_ms);
        self.phase = RacePhase::DiveWindow;
        self.dive_window_remaining_ms = DIVE_WINDOW_MS;
        self.time_limit_remaining_ms = RACE_TIME_LIMIT_MS;
        self.push_event(RaceEvent::Start { at_ms: now_ms });
        log::info!("Start signal at {:.0}ms", now_ms);
    }

    /// Append a natural or forced finish; a lane is placed at most once
    pub(crate) fn record_finish(&mut self, lane: usize, instant_ms: f64, forced: bool) {
        if self.finish_order.len() >= self.swimmers.len() || self.place_of(lane).is_some() {
            return;
        }
        let entry = FinishEntry {
            participant_id: lane,
            time_s: self.race_time_s(instant_ms),
            place: self.finish_order.len() + 1,
            forced,
        };
        log::info!(
            "Lane {} placed {} in {:.2}s{}",
            lane,
            entry.place,
            entry.time_s,
            if forced { " (time limit)" } else { "" }
        );
        self.finish_order.push(entry);
        self.push_event(RaceEvent::SwimmerFinished(entry));
    }

    /// Enter Finished once every lane is placed
    pub(crate) fn seal_if_complete(&mut self) {
        if self.phase == RacePhase::Finished || self.finish_order.len() < self.swimmers.len() {
            return;
        }
        self.phase = RacePhase::Finished;
        self.push_event(RaceEvent::RaceFinished(self.finish_order.clone()));
        log::info!("Race finished, {} swimmers placed", self.finish_order.len());
    }

    /// Rank everyone still in the water by distance covered and seal the race
    pub(crate) fn force_finish_at(&mut self, now_ms: f64) {
        if self.phase == RacePhase::Finished {
            return;
        }
        let mut remaining: Vec<usize> = self
            .swimmers
            .iter()
            .map(|s| s.id)
            .filter(|&lane| self.place_of(lane).is_none())
            .collect();
        // Stable: equal distances keep lane order
        remaining.sort_by(|&a, &b| {
            self.swimmers[b]
                .distance_m
                .partial_cmp(&self.swimmers[a].distance_m)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        log::warn!(
            "Force-ending race at {:.0}ms with {} swimmers unplaced",
            now_ms,
            remaining.len()
        );
        for lane in remaining {
            self.record_finish(lane, now_ms, true);
        }
        self.seal_if_complete();
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> RaceSnapshot {
        let countdown = match self.phase {
            RacePhase::Countdown if self.countdown_step > 0 => Some(self.countdown_step),
            _ => None,
        };
        let race_time_s = match self.phase {
            RacePhase::Finished => self
                .finish_order
                .iter()
                .map(|e| e.time_s)
                .fold(0.0, f64::max),
            _ => self.race_time_s(self.now_ms),
        };

        RaceSnapshot {
            phase: self.phase,
            countdown,
            race_time_s,
            race_distance_m: self.race_distance_m,
            swimmers: self
                .swimmers
                .iter()
                .map(|s| SwimmerSnapshot {
                    id: s.id,
                    interactive: s.is_interactive(),
                    style: s.style,
                    distance_m: s.distance_m,
                    progress: (s.distance_m / self.race_distance_m).min(1.0),
                    speed: s.speed(),
                    accuracy: s.accuracy(),
                    correct_inputs: s.correct_inputs,
                    incorrect_inputs: s.incorrect_inputs,
                    total_inputs: s.total_inputs,
                    expected_input: s.expected_input,
                    penalty_active: s.penalty_active(),
                    has_started: s.has_started,
                    finished: s.finished,
                    place: self.place_of(s.id),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes(humans: usize, ais: usize) -> Vec<Participant> {
        let mut list = vec![Participant::human(StrokeStyle::Freestyle); humans];
        list.extend(vec![Participant::ai(StrokeStyle::Freestyle); ais]);
        list
    }

    #[test]
    fn test_setup_validation() {
        assert_eq!(
            start_race(&[], 50.0, 1).err(),
            Some(RaceSetupError::NoParticipants)
        );
        assert_eq!(
            start_race(&lanes(2, 1), 50.0, 1).err(),
            Some(RaceSetupError::MultipleHumans(2))
        );
        assert_eq!(
            start_race(&lanes(1, MAX_LANES), 50.0, 1).err(),
            Some(RaceSetupError::TooManyLanes(MAX_LANES + 1))
        );
        assert!(matches!(
            start_race(&lanes(1, 1), 0.0, 1),
            Err(RaceSetupError::InvalidDistance(_))
        ));
        assert!(matches!(
            start_race(&lanes(1, 1), f64::NAN, 1),
            Err(RaceSetupError::InvalidDistance(_))
        ));
    }

    #[test]
    fn test_new_race_starts_in_countdown() {
        let mut race = start_race(&lanes(1, 3), 50.0, 9).expect("valid race");
        assert_eq!(race.phase, RacePhase::Countdown);
        assert_eq!(race.human_lane(), Some(0));
        assert_eq!(race.swimmers.len(), 4);
        assert!(race.swimmers[1..].iter().all(|s| !s.is_interactive()));
        assert!(race.finish_order().is_none());
        assert_eq!(race.drain_events(), vec![RaceEvent::Countdown(3)]);
        assert!(race.drain_events().is_empty());

        let snap = race.snapshot();
        assert_eq!(snap.countdown, Some(3));
        assert!(snap.swimmers.iter().all(|s| s.accuracy == 1.0 && s.place.is_none()));
    }

    #[test]
    fn test_ai_only_race_is_allowed() {
        let race = start_race(&lanes(0, 2), 50.0, 3).expect("valid race");
        assert_eq!(race.human_lane(), None);
        assert!(race.human().is_none());
    }

    #[test]
    fn test_force_finish_ranks_by_distance_then_lane() {
        let mut race = start_race(&lanes(1, 3), 50.0, 5).expect("valid race");
        race.begin_dive_window(0.0);
        race.swimmers[0].distance_m = 10.0;
        race.swimmers[1].distance_m = 20.0;
        race.swimmers[2].distance_m = 10.0;
        race.swimmers[3].distance_m = 30.0;

        race.force_finish_at(60_000.0);
        let order: Vec<usize> = race
            .finish_order()
            .expect("sealed")
            .iter()
            .map(|e| e.participant_id)
            .collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
        assert!(race.placings().iter().all(|e| e.forced && e.time_s == 60.0));
        assert_eq!(race.phase, RacePhase::Finished);
    }

    #[test]
    fn test_force_finish_keeps_natural_finishers_ahead() {
        let mut race = start_race(&lanes(1, 2), 50.0, 5).expect("valid race");
        race.begin_dive_window(1000.0);
        race.record_finish(2, 31_000.0, false);
        race.swimmers[0].distance_m = 48.0;
        race.swimmers[1].distance_m = 49.0;

        race.force_finish_at(61_000.0);
        let order = race.finish_order().expect("sealed");
        assert_eq!(order[0].participant_id, 2);
        assert_eq!(order[0].time_s, 30.0);
        assert!(!order[0].forced);
        assert_eq!(order[1].participant_id, 1);
        assert_eq!(order[2].participant_id, 0);
        assert_eq!(order[2].place, 3);
    }

    #[test]
    fn test_accessors_mirror_race() {
        let race = start_race(&lanes(1, 2), 25.0, 42).expect("valid race");
        assert_eq!(race.seed(), 42);
        assert_eq!(race.phase(), RacePhase::Countdown);
        assert_eq!(race.race_distance_m(), 25.0);
        assert_eq!(race.swimmers().len(), 3);
        let human = &race.swimmers()[0];
        assert!(human.is_interactive());
        assert_eq!(human.id(), 0);
        assert_eq!(human.distance_m(), 0.0);
        assert_eq!(human.momentum(), 0.0);
        assert!(!human.has_started());
        assert!(!human.finished());
        assert!(race.swimmers()[1].ai().is_some());
    }

    #[test]
    fn test_lane_placed_once() {
        let mut race = start_race(&lanes(1, 1), 50.0, 5).expect("valid race");
        race.begin_dive_window(0.0);
        race.record_finish(1, 9000.0, false);
        race.record_finish(1, 9100.0, false);
        assert_eq!(race.placings().len(), 1);
        assert_eq!(race.phase, RacePhase::DiveWindow);
    }
}
