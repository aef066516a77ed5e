use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

/// Longest accepted player name, in characters.
pub const MAX_PLAYER_NAME_LEN: usize = 16;

/// One leaderboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ScoreStoreError {
    #[display("invalid player name {name:?}: expected 1 to {MAX_PLAYER_NAME_LEN} characters")]
    InvalidName { name: String },
    #[display("leaderboard limit must be at least 1")]
    InvalidLimit,
    #[display("score store failed: {_0}")]
    Backend(#[error(not(source))] String),
}

/// Trims `name` and checks its length.
pub fn normalize_player_name(name: &str) -> Result<String, ScoreStoreError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > MAX_PLAYER_NAME_LEN {
        return Err(ScoreStoreError::InvalidName {
            name: name.to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

/// Whether `score` earns a place on a leaderboard of `board_size` entries.
///
/// `top` is the current top of the leaderboard, best first. The score
/// qualifies if the board is not full yet, or if it beats the lowest of the
/// top `board_size` scores. Ties do not qualify.
///
/// ```
/// use gridfit_engine::{ScoreRecord, is_new_high_score};
///
/// let top = [
///     ScoreRecord { name: "ann".into(), score: 900 },
///     ScoreRecord { name: "bob".into(), score: 400 },
/// ];
/// assert!(is_new_high_score(&top, 10, 3));
/// assert!(is_new_high_score(&top, 401, 2));
/// assert!(!is_new_high_score(&top, 400, 2));
/// ```
#[must_use]
pub fn is_new_high_score(top: &[ScoreRecord], score: u32, board_size: usize) -> bool {
    if top.len() < board_size {
        return true;
    }
    top.iter()
        .take(board_size)
        .map(|record| record.score)
        .min()
        .is_some_and(|lowest| score > lowest)
}

/// Persistent leaderboard used by the surrounding UI.
///
/// The game engine never talks to a store; callers submit the final score
/// after observing [`Phase::GameOver`](crate::Phase::GameOver).
pub trait ScoreStore {
    /// Best `limit` records, highest score first. Equal scores keep
    /// submission order.
    fn fetch_top_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreStoreError>;

    /// Stores a score under a player name and returns the stored record.
    fn submit_score(&mut self, name: &str, score: u32) -> Result<ScoreRecord, ScoreStoreError>;

    /// See [`is_new_high_score`].
    fn is_new_high_score(&self, score: u32, board_size: usize) -> Result<bool, ScoreStoreError> {
        if board_size == 0 {
            return Ok(false);
        }
        let top = self.fetch_top_scores(board_size)?;
        Ok(is_new_high_score(&top, score, board_size))
    }
}

/// In-process [`ScoreStore`], lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    records: Vec<ScoreRecord>,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn fetch_top_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>, ScoreStoreError> {
        if limit == 0 {
            return Err(ScoreStoreError::InvalidLimit);
        }
        let mut records = self.records.clone();
        records.sort_by_key(|record| Reverse(record.score));
        records.truncate(limit);
        Ok(records)
    }

    fn submit_score(&mut self, name: &str, score: u32) -> Result<ScoreRecord, ScoreStoreError> {
        let record = ScoreRecord {
            name: normalize_player_name(name)?,
            score,
        };
        self.records.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(scores: &[(&str, u32)]) -> MemoryScoreStore {
        let mut store = MemoryScoreStore::new();
        for (name, score) in scores {
            store.submit_score(name, *score).unwrap();
        }
        store
    }

    #[test]
    fn test_top_scores_ordering() {
        let store = store(&[("a", 10), ("b", 30), ("c", 20), ("d", 30)]);
        let top = store.fetch_top_scores(3).unwrap();
        let names: Vec<_> = top.iter().map(|record| record.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "c"], "ties keep submission order");
        assert_eq!(store.fetch_top_scores(10).unwrap().len(), 4);
        assert_eq!(store.fetch_top_scores(0), Err(ScoreStoreError::InvalidLimit));
    }

    #[test]
    fn test_names_are_trimmed_and_validated() {
        let mut store = MemoryScoreStore::new();
        let record = store.submit_score("  ann  ", 5).unwrap();
        assert_eq!(record.name, "ann");

        for name in ["", "   ", "abcdefghijklmnopq"] {
            let err = store.submit_score(name, 5).unwrap_err();
            assert!(matches!(err, ScoreStoreError::InvalidName { .. }), "{name:?}");
        }
        // multi-byte characters count once
        assert!(store.submit_score("ääääääääääääääää", 5).is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_new_high_score_when_board_not_full() {
        let store = store(&[("a", 500), ("b", 300)]);
        assert!(store.is_new_high_score(0, 3).unwrap());
        assert!(MemoryScoreStore::new().is_new_high_score(0, 1).unwrap());
    }

    #[test]
    fn test_new_high_score_must_beat_lowest() {
        let store = store(&[("a", 500), ("b", 300), ("c", 100)]);
        assert!(store.is_new_high_score(101, 3).unwrap());
        assert!(!store.is_new_high_score(100, 3).unwrap());
        assert!(!store.is_new_high_score(250, 2).unwrap());
        assert!(store.is_new_high_score(301, 2).unwrap());
        assert!(!store.is_new_high_score(u32::MAX, 0).unwrap());
    }

    #[test]
    fn test_error_messages() {
        let err = normalize_player_name("").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid player name \"\": expected 1 to 16 characters"
        );
        assert_eq!(
            ScoreStoreError::Backend("disk full".into()).to_string(),
            "score store failed: disk full"
        );
    }
}
