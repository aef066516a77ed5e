use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::{Piece, Shape};

/// Number of slots in the tray.
pub const TRAY_SIZE: usize = 3;

/// The pieces available to the player.
///
/// Holds [`TRAY_SIZE`] slots; placing a piece empties its slot. A new batch
/// is only dealt once every slot is empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tray {
    slots: [Option<Piece>; TRAY_SIZE],
}

impl Tray {
    pub const EMPTY: Self = Self {
        slots: [None; TRAY_SIZE],
    };

    #[must_use]
    pub const fn new(pieces: [Piece; TRAY_SIZE]) -> Self {
        let [a, b, c] = pieces;
        Self {
            slots: [Some(a), Some(b), Some(c)],
        }
    }

    /// Returns the piece in `slot`, or `None` if the slot is consumed or out of range.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<Piece> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn slots(&self) -> impl Iterator<Item = Option<Piece>> + '_ {
        self.slots.iter().copied()
    }

    /// Pieces still available, with their slot index.
    #[must_use]
    pub fn remaining(&self) -> ArrayVec<(usize, Piece), TRAY_SIZE> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, piece)| Some((slot, (*piece)?)))
            .collect()
    }

    pub fn shapes(&self) -> impl Iterator<Item = &'static Shape> + '_ {
        self.slots.iter().flatten().map(Piece::shape)
    }

    /// True when every slot has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub(crate) fn take(&mut self, slot: usize) -> Option<Piece> {
        self.slots.get_mut(slot)?.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PieceId;

    fn tray() -> Tray {
        let shape = |id| Shape::by_id(id).unwrap();
        Tray::new([
            Piece::new(PieceId(0), shape("dot")),
            Piece::new(PieceId(1), shape("square2")),
            Piece::new(PieceId(2), shape("line3_h")),
        ])
    }

    #[test]
    fn test_take_consumes_slot() {
        let mut tray = tray();
        assert_eq!(tray.take(1).map(|piece| piece.id()), Some(PieceId(1)));
        assert_eq!(tray.get(1), None);
        assert_eq!(tray.take(1), None);
        assert_eq!(tray.take(3), None, "out of range");

        let remaining: Vec<_> = tray.remaining().iter().map(|(slot, _)| *slot).collect();
        assert_eq!(remaining, vec![0, 2]);
        assert!(!tray.is_empty());
    }

    #[test]
    fn test_empty_only_when_all_consumed() {
        let mut tray = tray();
        tray.take(0);
        tray.take(2);
        assert!(!tray.is_empty());
        tray.take(1);
        assert!(tray.is_empty());
        assert_eq!(tray, Tray::EMPTY);
        assert_eq!(tray.shapes().count(), 0);
    }
}
