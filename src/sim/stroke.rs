//! Stroke styles

use serde::{Deserialize, Serialize};

/// Swimming stroke, chosen in the menu. Slower strokes scale every swimmer's speed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum StrokeStyle {
    #[default]
    Freestyle,
    Butterfly,
    Backstroke,
    Breaststroke,
}

impl StrokeStyle {
    pub const ALL: [StrokeStyle; 4] = [
        StrokeStyle::Freestyle,
        StrokeStyle::Butterfly,
        StrokeStyle::Backstroke,
        StrokeStyle::Breaststroke,
    ];

    pub fn speed_multiplier(&self) -> f64 {
        match self {
            StrokeStyle::Freestyle => 1.0,
            StrokeStyle::Butterfly => 0.9,
            StrokeStyle::Backstroke => 0.8,
            StrokeStyle::Breaststroke => 0.7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrokeStyle::Freestyle => "Freestyle",
            StrokeStyle::Butterfly => "Butterfly",
            StrokeStyle::Backstroke => "Backstroke",
            StrokeStyle::Breaststroke => "Breaststroke",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "freestyle" | "free" => Some(StrokeStyle::Freestyle),
            "butterfly" | "fly" => Some(StrokeStyle::Butterfly),
            "backstroke" | "back" => Some(StrokeStyle::Backstroke),
            "breaststroke" | "breast" => Some(StrokeStyle::Breaststroke),
            _ => None,
        }
    }

    /// Index used by the JS host (menu order)
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multipliers_descend_in_menu_order() {
        let multipliers: Vec<f64> = StrokeStyle::ALL.iter().map(|s| s.speed_multiplier()).collect();
        assert_eq!(multipliers, vec![1.0, 0.9, 0.8, 0.7]);
    }

    #[test]
    fn test_parse_round_trip() {
        for style in StrokeStyle::ALL {
            assert_eq!(StrokeStyle::from_str(style.as_str()), Some(style));
        }
        assert_eq!(StrokeStyle::from_str("FLY"), Some(StrokeStyle::Butterfly));
        assert_eq!(StrokeStyle::from_str("doggy"), None);
        assert_eq!(StrokeStyle::from_index(3), Some(StrokeStyle::Breaststroke));
        assert_eq!(StrokeStyle::from_index(4), None);
    }
}
