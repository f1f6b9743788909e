//! Deterministic race simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Explicit `now`/`delta` passed in by the host, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (by lane)
//! - No rendering or platform dependencies

pub mod ai;
pub mod cadence;
pub mod dive;
pub mod state;
pub mod stroke;
pub mod swimmer;
pub mod tick;

pub use ai::AiController;
pub use cadence::InputCadenceTracker;
pub use dive::{DiveAttempt, DiveTier, evaluate_dive};
pub use state::{
    FinishEntry, Participant, ParticipantKind, RaceEvent, RacePhase, RaceSetupError,
    RaceSnapshot, RaceState, SwimmerSnapshot, start_race,
};
pub use stroke::StrokeStyle;
pub use swimmer::{DiveOutcome, InputOutcome, Side, SpeedBreakdown, SwimmerState};
pub use tick::{force_finish, register_dive, register_input, tick};
