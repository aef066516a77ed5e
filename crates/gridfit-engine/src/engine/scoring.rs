//! Point rules.
//!
//! - Every placement earns [`PLACEMENT_POINTS_PER_CELL`] per cell.
//! - Clearing `k` lines in one placement earns `100 + 200 + ... + 100k`,
//!   multiplied by the clear streak (consecutive clearing placements,
//!   including this one).
//! - A placement that clears nothing resets the streak to zero.

use serde::{Deserialize, Serialize};

/// Points per placed cell.
pub const PLACEMENT_POINTS_PER_CELL: u32 = 10;

/// Base points of the first line in a clear; the i-th line (0-indexed) is worth `(i + 1)` times this.
pub const LINE_CLEAR_BASE_POINTS: u32 = 100;

/// Result of [`calculate_clear_score`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearScore {
    pub points: u32,
    pub streak: u32,
}

/// Points for placing a piece of `cell_count` cells.
///
/// ```
/// use gridfit_engine::calculate_placement_score;
///
/// assert_eq!(calculate_placement_score(4), 40);
/// ```
#[must_use]
pub fn calculate_placement_score(cell_count: usize) -> u32 {
    u32::try_from(cell_count).map_or(u32::MAX, |count| {
        count.saturating_mul(PLACEMENT_POINTS_PER_CELL)
    })
}

/// Points for clearing `line_count` lines with the streak standing at `current_streak`.
///
/// ```
/// use gridfit_engine::{ClearScore, calculate_clear_score};
///
/// assert_eq!(calculate_clear_score(2, 1), ClearScore { points: 600, streak: 2 });
/// assert_eq!(calculate_clear_score(0, 5), ClearScore { points: 0, streak: 0 });
/// ```
#[must_use]
pub fn calculate_clear_score(line_count: usize, current_streak: u32) -> ClearScore {
    if line_count == 0 {
        return ClearScore {
            points: 0,
            streak: 0,
        };
    }
    let k = u32::try_from(line_count).unwrap_or(u32::MAX);
    let base = LINE_CLEAR_BASE_POINTS.saturating_mul(triangular(k));
    let streak = current_streak.saturating_add(1);
    ClearScore {
        points: base.saturating_mul(streak),
        streak,
    }
}

fn triangular(k: u32) -> u32 {
    let k = u64::from(k);
    u32::try_from(k * (k + 1) / 2).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_score() {
        assert_eq!(calculate_placement_score(0), 0);
        assert_eq!(calculate_placement_score(1), 10);
        assert_eq!(calculate_placement_score(4), 40);
        assert_eq!(calculate_placement_score(9), 90);
    }

    #[test]
    fn test_clear_score_known_values() {
        let score = |lines, streak| {
            let ClearScore { points, streak } = calculate_clear_score(lines, streak);
            (points, streak)
        };
        assert_eq!(score(1, 0), (100, 1));
        assert_eq!(score(2, 0), (300, 1));
        assert_eq!(score(2, 1), (600, 2));
        assert_eq!(score(0, 5), (0, 0));
        assert_eq!(score(3, 0), (600, 1));
        assert_eq!(score(4, 2), (3000, 3));
    }

    #[test]
    fn test_clear_base_is_triangular() {
        for k in 1..=16 {
            let expected: u32 = (1..=k).map(|i| 100 * i).sum();
            let lines = usize::try_from(k).unwrap();
            assert_eq!(calculate_clear_score(lines, 0).points, expected, "k = {k}");
        }
    }

    #[test]
    fn test_streak_saturates() {
        let score = calculate_clear_score(1, u32::MAX);
        assert_eq!(score.streak, u32::MAX);
        assert_eq!(score.points, u32::MAX);
    }
}
