//! Dive timing judgment
//!
//! Maps the time between the start signal and the dive to a start-quality
//! tier. The tier's multiplier seeds the swimmer's momentum and dive bonus.

use serde::{Deserialize, Serialize};

use crate::consts::DIVE_WINDOW_MS;

/// Start quality, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiveTier {
    Perfect,
    Excellent,
    Great,
    Good,
    Normal,
    /// Past the dive window. Only produced by the forced dive at window expiry.
    Late,
}

impl DiveTier {
    /// Inclusive upper bound of each tier (ms after the start signal)
    const THRESHOLDS: [(f64, DiveTier); 5] = [
        (100.0, DiveTier::Perfect),
        (200.0, DiveTier::Excellent),
        (300.0, DiveTier::Great),
        (500.0, DiveTier::Good),
        (DIVE_WINDOW_MS, DiveTier::Normal),
    ];

    pub fn multiplier(&self) -> f64 {
        match self {
            DiveTier::Perfect => 1.4,
            DiveTier::Excellent => 1.3,
            DiveTier::Great => 1.2,
            DiveTier::Good => 1.1,
            DiveTier::Normal | DiveTier::Late => 1.0,
        }
    }

    /// Feedback text for the HUD
    pub fn label(&self) -> &'static str {
        match self {
            DiveTier::Perfect => "PERFECT!",
            DiveTier::Excellent => "EXCELLENT!",
            DiveTier::Great => "GREAT!",
            DiveTier::Good => "GOOD",
            DiveTier::Normal => "OK",
            DiveTier::Late => "LATE",
        }
    }
}

/// A judged dive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiveAttempt {
    pub elapsed_ms: f64,
    pub tier: DiveTier,
    pub multiplier: f64,
}

impl DiveAttempt {
    /// The dive forced on a swimmer who never dove during the window
    pub fn forced_late() -> Self {
        Self {
            elapsed_ms: DIVE_WINDOW_MS,
            tier: DiveTier::Late,
            multiplier: DiveTier::Late.multiplier(),
        }
    }
}

/// Judge a dive made `elapsed_ms` after the start signal
pub fn evaluate_dive(elapsed_ms: f64) -> DiveAttempt {
    let elapsed_ms = elapsed_ms.max(0.0);
    let tier = DiveTier::THRESHOLDS
        .iter()
        .find(|(limit, _)| elapsed_ms <= *limit)
        .map(|&(_, tier)| tier)
        .unwrap_or(DiveTier::Late);

    DiveAttempt {
        elapsed_ms,
        tier,
        multiplier: tier.multiplier(),
    }
}
