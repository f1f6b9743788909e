//! High score leaderboard system
//!
//! Persisted to LocalStorage, tracks the top 10 times per stroke.

use serde::{Deserialize, Serialize};

use crate::sim::StrokeStyle;

/// Maximum number of times kept per stroke
pub const MAX_HIGH_SCORES: usize = 10;

/// Longest name kept on the board
pub const MAX_NAME_LEN: usize = 12;

/// Name used when the player leaves the field blank
pub const DEFAULT_NAME: &str = "Swimmer";

/// The two calls the results screen makes against the score table
pub trait ScoreTable {
    /// Would `time_s` make the top 10 for `style`?
    fn is_qualifying(&self, style: StrokeStyle, time_s: f64) -> bool;

    /// Insert a time, returning its 1-based rank, or None if it doesn't qualify
    fn record(&mut self, style: StrokeStyle, time_s: f64, name: &str, place: usize)
    -> Option<usize>;
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Race time in seconds
    pub time_s: f64,
    pub name: String,
    /// Finishing place in the race the time was set in
    pub place: usize,
    /// Unix timestamp (ms) when achieved
    #[serde(default)]
    pub timestamp: f64,
}

/// Sorted times for one stroke (fastest first)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeBoard {
    pub style: StrokeStyle,
    pub entries: Vec<HighScoreEntry>,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScoreBook {
    pub boards: Vec<StrokeBoard>,
}

fn valid_time(time_s: f64) -> bool {
    time_s.is_finite() && time_s > 0.0
}

fn clean_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        trimmed.chars().take(MAX_NAME_LEN).collect()
    }
}

impl HighScoreBook {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "swim_race_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self { boards: Vec::new() }
    }

    /// Parse stored JSON. Malformed data yields an empty book; bad entries are dropped.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<HighScoreBook>(json) {
            Ok(mut book) => {
                book.normalize();
                book
            }
            Err(e) => {
                log::warn!("Discarding unreadable high scores: {}", e);
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Restore the invariants after loading: one board per stroke, valid times,
    /// sorted, at most 10 entries
    fn normalize(&mut self) {
        let mut merged: Vec<StrokeBoard> = Vec::new();
        for board in self.boards.drain(..) {
            let target = match merged.iter_mut().position(|b| b.style == board.style) {
                Some(i) => &mut merged[i],
                None => {
                    merged.push(StrokeBoard {
                        style: board.style,
                        entries: Vec::new(),
                    });
                    let last = merged.len() - 1;
                    &mut merged[last]
                }
            };
            target
                .entries
                .extend(board.entries.into_iter().filter(|e| valid_time(e.time_s)));
        }
        for board in &mut merged {
            // Stable: stored order breaks ties
            board.entries.sort_by(|a, b| {
                a.time_s
                    .partial_cmp(&b.time_s)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            board.entries.truncate(MAX_HIGH_SCORES);
        }
        self.boards = merged;
    }

    /// Entries for a stroke, fastest first
    pub fn entries(&self, style: StrokeStyle) -> &[HighScoreEntry] {
        self.boards
            .iter()
            .find(|b| b.style == style)
            .map(|b| b.entries.as_slice())
            .unwrap_or(&[])
    }

    fn board_mut(&mut self, style: StrokeStyle) -> &mut StrokeBoard {
        match self.boards.iter().position(|b| b.style == style) {
            Some(i) => &mut self.boards[i],
            None => {
                self.boards.push(StrokeBoard {
                    style,
                    entries: Vec::new(),
                });
                let last = self.boards.len() - 1;
                &mut self.boards[last]
            }
        }
    }

    /// Get the rank a time would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, style: StrokeStyle, time_s: f64) -> Option<usize> {
        if !self.is_qualifying(style, time_s) {
            return None;
        }
        let entries = self.entries(style);
        let rank = entries.iter().position(|e| time_s < e.time_s);
        Some(rank.unwrap_or(entries.len()) + 1)
    }

    /// Add a time with an explicit timestamp
    pub fn add_time(
        &mut self,
        style: StrokeStyle,
        time_s: f64,
        name: &str,
        place: usize,
        timestamp: f64,
    ) -> Option<usize> {
        if !self.is_qualifying(style, time_s) {
            return None;
        }

        let entry = HighScoreEntry {
            time_s,
            name: clean_name(name),
            place,
            timestamp,
        };

        // Find insertion point (sorted ascending; equal times keep earlier entries first)
        let board = self.board_mut(style);
        let pos = board.entries.iter().position(|e| time_s < e.time_s);
        let rank = match pos {
            Some(i) => {
                board.entries.insert(i, entry);
                i + 1
            }
            None => {
                board.entries.push(entry);
                board.entries.len()
            }
        };

        // Trim to max size
        board.entries.truncate(MAX_HIGH_SCORES);

        log::info!("New {} high score #{}: {:.2}s", style.as_str(), rank, time_s);
        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.boards.iter().all(|b| b.entries.is_empty())
    }

    /// Get the best time for a stroke (if any)
    pub fn best_time(&self, style: StrokeStyle) -> Option<f64> {
        self.entries(style).first().map(|e| e.time_s)
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                let book = Self::from_json(&json);
                log::info!("Loaded high scores for {} strokes", book.boards.len());
                return book;
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.to_json());
            log::info!("High scores saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl ScoreTable for HighScoreBook {
    fn is_qualifying(&self, style: StrokeStyle, time_s: f64) -> bool {
        if !valid_time(time_s) {
            return false;
        }
        let entries = self.entries(style);
        if entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if time beats the slowest entry
        entries.last().map(|e| time_s < e.time_s).unwrap_or(true)
    }

    fn record(
        &mut self,
        style: StrokeStyle,
        time_s: f64,
        name: &str,
        place: usize,
    ) -> Option<usize> {
        self.add_time(style, time_s, name, place, now_timestamp())
    }
}

#[cfg(target_arch = "wasm32")]
fn now_timestamp() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_timestamp() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_board(style: StrokeStyle) -> HighScoreBook {
        let mut book = HighScoreBook::new();
        for i in 0..MAX_HIGH_SCORES {
            book.add_time(style, 30.0 + i as f64, "Fish", 1, i as f64);
        }
        book
    }

    #[test]
    fn test_empty_board_accepts_any_valid_time() {
        let book = HighScoreBook::new();
        assert!(book.is_empty());
        assert!(book.is_qualifying(StrokeStyle::Freestyle, 999.0));
        assert!(!book.is_qualifying(StrokeStyle::Freestyle, 0.0));
        assert!(!book.is_qualifying(StrokeStyle::Freestyle, -3.0));
        assert!(!book.is_qualifying(StrokeStyle::Freestyle, f64::NAN));
    }

    #[test]
    fn test_full_board_requires_beating_the_slowest() {
        let book = full_board(StrokeStyle::Freestyle);
        assert_eq!(book.entries(StrokeStyle::Freestyle).len(), MAX_HIGH_SCORES);
        assert!(book.is_qualifying(StrokeStyle::Freestyle, 38.5));
        assert!(!book.is_qualifying(StrokeStyle::Freestyle, 39.0));
        assert!(!book.is_qualifying(StrokeStyle::Freestyle, 45.0));
        // Boards are per stroke
        assert!(book.is_qualifying(StrokeStyle::Backstroke, 45.0));
    }

    #[test]
    fn test_record_returns_rank_and_trims() {
        let mut book = full_board(StrokeStyle::Butterfly);
        assert_eq!(book.record(StrokeStyle::Butterfly, 29.0, "Ray", 1), Some(1));
        assert_eq!(book.entries(StrokeStyle::Butterfly).len(), MAX_HIGH_SCORES);
        assert_eq!(book.best_time(StrokeStyle::Butterfly), Some(29.0));
        // The previous slowest (39.0) fell off
        assert_eq!(
            book.entries(StrokeStyle::Butterfly).last().map(|e| e.time_s),
            Some(38.0)
        );
        assert_eq!(book.record(StrokeStyle::Butterfly, 50.0, "Slow", 4), None);
    }

    #[test]
    fn test_ties_keep_earlier_submission_first() {
        let mut book = HighScoreBook::new();
        book.add_time(StrokeStyle::Freestyle, 30.0, "First", 1, 1.0);
        let rank = book.add_time(StrokeStyle::Freestyle, 30.0, "Second", 1, 2.0);
        assert_eq!(rank, Some(2));
        assert_eq!(book.potential_rank(StrokeStyle::Freestyle, 30.0), Some(3));
        assert_eq!(book.potential_rank(StrokeStyle::Freestyle, 29.9), Some(1));
        let names: Vec<&str> = book
            .entries(StrokeStyle::Freestyle)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn test_names_are_cleaned() {
        let mut book = HighScoreBook::new();
        book.add_time(StrokeStyle::Freestyle, 30.0, "   ", 1, 0.0);
        book.add_time(StrokeStyle::Freestyle, 31.0, "  Michael Phelps Jr  ", 2, 0.0);
        let entries = book.entries(StrokeStyle::Freestyle);
        assert_eq!(entries[0].name, DEFAULT_NAME);
        assert_eq!(entries[1].name, "Michael Phel");
    }

    #[test]
    fn test_malformed_json_falls_back_to_empty() {
        assert!(HighScoreBook::from_json("not json").is_empty());
        assert!(HighScoreBook::from_json("{\"boards\": 7}").is_empty());
        assert!(HighScoreBook::from_json("").is_empty());
    }

    #[test]
    fn test_loaded_book_is_normalized() {
        let json = r#"{"boards": [
            {"style": "Freestyle", "entries": [
                {"time_s": 35.0, "name": "B", "place": 2},
                {"time_s": -1.0, "name": "Bad", "place": 1},
                {"time_s": 31.0, "name": "A", "place": 1}
            ]},
            {"style": "Freestyle", "entries": [
                {"time_s": 33.0, "name": "C", "place": 1}
            ]}
        ]}"#;
        let book = HighScoreBook::from_json(json);
        assert_eq!(book.boards.len(), 1);
        let names: Vec<&str> = book
            .entries(StrokeStyle::Freestyle)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let mut book = HighScoreBook::new();
        book.add_time(StrokeStyle::Backstroke, 41.0, "Otter", 2, 10.0);
        book.add_time(StrokeStyle::Backstroke, 40.0, "Seal", 1, 20.0);
        let restored = HighScoreBook::from_json(&book.to_json());
        assert_eq!(
            restored.entries(StrokeStyle::Backstroke),
            book.entries(StrokeStyle::Backstroke)
        );
    }
}
