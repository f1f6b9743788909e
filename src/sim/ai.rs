//! AI opponents
//!
//! AI swimmers never miss a stroke: they cruise at a fixed speed scaled by a
//! per-instance skill factor, with no momentum, cadence, or penalty mechanics.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiController {
    /// Drawn once at creation from [AI_SKILL_MIN, AI_SKILL_MAX]
    pub skill: f64,
    /// Delay between the start signal and the AI's dive
    pub reaction_ms: f64,
}

impl AiController {
    /// Roll a new opponent from the race RNG
    pub fn roll<R: Rng>(rng: &mut R) -> Self {
        Self {
            skill: rng.random_range(AI_SKILL_MIN..=AI_SKILL_MAX),
            reaction_ms: rng.random_range(AI_REACTION_MIN_MS..=AI_REACTION_MAX_MS),
        }
    }

    /// Cruising speed in m/s
    pub fn speed(&self, stroke_multiplier: f64) -> f64 {
        AI_BASE_SPEED * self.skill * stroke_multiplier
    }

    /// Whether the AI should have left the block `elapsed_ms` after the start signal
    pub fn ready_to_dive(&self, elapsed_ms: f64) -> bool {
        elapsed_ms >= self.reaction_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_roll_stays_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            let ai = AiController::roll(&mut rng);
            assert!((AI_SKILL_MIN..=AI_SKILL_MAX).contains(&ai.skill));
            assert!((AI_REACTION_MIN_MS..=AI_REACTION_MAX_MS).contains(&ai.reaction_ms));
            assert!(ai.reaction_ms < DIVE_WINDOW_MS);
        }
    }

    #[test]
    fn test_roll_is_deterministic_per_seed() {
        let a = AiController::roll(&mut Pcg32::seed_from_u64(42));
        let b = AiController::roll(&mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_speed_scales_with_skill_and_stroke() {
        let ai = AiController {
            skill: 1.0,
            reaction_ms: 200.0,
        };
        assert!((ai.speed(1.0) - AI_BASE_SPEED).abs() < 1e-9);
        assert!((ai.speed(0.7) - AI_BASE_SPEED * 0.7).abs() < 1e-9);
        assert!(!ai.ready_to_dive(199.0));
        assert!(ai.ready_to_dive(200.0));
    }
}
