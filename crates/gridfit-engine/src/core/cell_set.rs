use serde::{Deserialize, Serialize};

use super::GRID_SIZE;

/// A set of grid cells stored as a 64-bit mask.
///
/// Bit `row * 8 + col` represents the cell at `(row, col)`. Used for the
/// presentation hints of [`GameState`](crate::GameState) (cells being cleared,
/// cells just placed) and for ghost previews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellSet {
    bits: u64,
}

const ROW_MASK: u64 = 0xff;
const COL_MASK: u64 = 0x0101_0101_0101_0101;

impl CellSet {
    pub const EMPTY: Self = Self { bits: 0 };

    #[inline]
    const fn bit(row: usize, col: usize) -> u64 {
        assert!(row < GRID_SIZE && col < GRID_SIZE);
        1 << (row * GRID_SIZE + col)
    }

    /// All cells of the given row.
    #[must_use]
    pub const fn row(row: usize) -> Self {
        assert!(row < GRID_SIZE);
        Self {
            bits: ROW_MASK << (row * GRID_SIZE),
        }
    }

    /// All cells of the given column.
    #[must_use]
    pub const fn col(col: usize) -> Self {
        assert!(col < GRID_SIZE);
        Self {
            bits: COL_MASK << col,
        }
    }

    pub fn insert(&mut self, row: usize, col: usize) {
        self.bits |= Self::bit(row, col);
    }

    #[must_use]
    pub const fn contains(self, row: usize, col: usize) -> bool {
        self.bits & Self::bit(row, col) != 0
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Iterates the cells as `(row, col)` in row-major order.
    pub fn iter(self) -> impl Iterator<Item = (usize, usize)> {
        let mut bits = self.bits;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let index = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some((index / GRID_SIZE, index % GRID_SIZE))
        })
    }
}

impl FromIterator<(usize, usize)> for CellSet {
    fn from_iter<T: IntoIterator<Item = (usize, usize)>>(iter: T) -> Self {
        let mut set = Self::EMPTY;
        for (row, col) in iter {
            set.insert(row, col);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_and_col_masks() {
        let row = CellSet::row(3);
        assert_eq!(row.len(), GRID_SIZE);
        assert!((0..GRID_SIZE).all(|col| row.contains(3, col)));
        assert!(!row.contains(2, 0));

        let col = CellSet::col(5);
        assert_eq!(col.len(), GRID_SIZE);
        assert!((0..GRID_SIZE).all(|row| col.contains(row, 5)));
        assert!(!col.contains(0, 4));
    }

    #[test]
    fn test_intersection_counted_once() {
        let cross = CellSet::row(2).union(CellSet::col(6));
        assert_eq!(cross.len(), 2 * GRID_SIZE - 1);
    }

    #[test]
    fn test_iter_is_row_major() {
        let set: CellSet = [(7, 7), (0, 1), (3, 0)].into_iter().collect();
        let cells: Vec<_> = set.iter().collect();
        assert_eq!(cells, vec![(0, 1), (3, 0), (7, 7)]);
    }

    #[test]
    fn test_every_row_covers_the_board() {
        let all = (0..GRID_SIZE).fold(CellSet::EMPTY, |set, row| set.union(CellSet::row(row)));
        assert_eq!(all.len(), GRID_SIZE * GRID_SIZE);
        assert!(CellSet::EMPTY.is_empty());
        assert_eq!(CellSet::EMPTY.iter().count(), 0);
    }
}
