use serde::{Deserialize, Serialize};

use super::scoring::{ClearScore, calculate_clear_score, calculate_placement_score};

/// Largest bucket of [`GameStats::clear_counter`]; clears of more lines land here too.
pub const MAX_COUNTED_LINES: usize = 8;

/// Points awarded by the most recent placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub placement: u32,
    pub clear: u32,
}

impl ScoreDelta {
    #[must_use]
    pub const fn total(self) -> u32 {
        self.placement.saturating_add(self.clear)
    }
}

/// Game statistics tracking score, clear streak, and placement counts.
///
/// The score and streak kept here are the authoritative values of a game;
/// [`GameState`](crate::GameState) reads them from its stats.
///
/// # Example
///
/// ```
/// use gridfit_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_placement(4, 0, 0); // no clear
/// stats.record_placement(3, 1, 1); // one row and one column
///
/// assert_eq!(stats.score(), 40 + 30 + 300);
/// assert_eq!(stats.streak(), 1);
/// assert_eq!(stats.clear_counter()[2], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: u32,
    streak: u32,
    best_streak: u32,
    placed_pieces: usize,
    placed_cells: usize,
    cleared_rows: usize,
    cleared_cols: usize,
    clear_counter: [usize; MAX_COUNTED_LINES + 1],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            streak: 0,
            best_streak: 0,
            placed_pieces: 0,
            placed_cells: 0,
            cleared_rows: 0,
            cleared_cols: 0,
            clear_counter: [0; MAX_COUNTED_LINES + 1],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Current number of consecutive clearing placements.
    #[must_use]
    pub const fn streak(&self) -> u32 {
        self.streak
    }

    #[must_use]
    pub const fn best_streak(&self) -> u32 {
        self.best_streak
    }

    #[must_use]
    pub const fn placed_pieces(&self) -> usize {
        self.placed_pieces
    }

    #[must_use]
    pub const fn placed_cells(&self) -> usize {
        self.placed_cells
    }

    #[must_use]
    pub const fn cleared_rows(&self) -> usize {
        self.cleared_rows
    }

    #[must_use]
    pub const fn cleared_cols(&self) -> usize {
        self.cleared_cols
    }

    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.cleared_rows + self.cleared_cols
    }

    /// Histogram of placements by number of lines they cleared.
    ///
    /// Index `0` counts placements that cleared nothing; the last index
    /// collects clears of [`MAX_COUNTED_LINES`] or more lines.
    #[must_use]
    pub const fn clear_counter(&self) -> &[usize; MAX_COUNTED_LINES + 1] {
        &self.clear_counter
    }

    /// Scores one placement and updates the counters.
    ///
    /// Returns the points awarded. The streak multiplier only applies to
    /// the clear part.
    pub fn record_placement(
        &mut self,
        cell_count: usize,
        cleared_rows: usize,
        cleared_cols: usize,
    ) -> ScoreDelta {
        let lines = cleared_rows + cleared_cols;
        let placement = calculate_placement_score(cell_count);
        let ClearScore {
            points: clear,
            streak,
        } = calculate_clear_score(lines, self.streak);

        self.placed_pieces += 1;
        self.placed_cells += cell_count;
        self.cleared_rows += cleared_rows;
        self.cleared_cols += cleared_cols;
        self.clear_counter[lines.min(MAX_COUNTED_LINES)] += 1;
        self.streak = streak;
        self.best_streak = self.best_streak.max(streak);

        let delta = ScoreDelta { placement, clear };
        self.score = self.score.saturating_add(delta.total());
        delta
    }
}
