//! Mapping pointer input onto the board.
//!
//! Nothing here changes a game; the result of a drag is an
//! [`Action::PlacePiece`](crate::Action::PlacePiece) that the caller
//! dispatches once the [`GhostPreview`] is valid.

use crate::core::{CellSet, GRID_SIZE, Grid, Shape};

use super::tray::Tray;

/// Where the board is drawn, in screen units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    pub origin: (u16, u16),
    pub cell_width: u16,
    pub cell_height: u16,
}

impl BoardGeometry {
    /// The board cell under the screen position `(x, y)`, if any.
    ///
    /// ```
    /// use gridfit_engine::BoardGeometry;
    ///
    /// let geometry = BoardGeometry { origin: (10, 5), cell_width: 2, cell_height: 1 };
    /// assert_eq!(geometry.cell_at(10, 5), Some((0, 0)));
    /// assert_eq!(geometry.cell_at(13, 7), Some((2, 1)));
    /// assert_eq!(geometry.cell_at(9, 5), None);
    /// assert_eq!(geometry.cell_at(26, 5), None);
    /// ```
    #[must_use]
    pub fn cell_at(&self, x: u16, y: u16) -> Option<(usize, usize)> {
        if self.cell_width == 0 || self.cell_height == 0 {
            return None;
        }
        let dx = x.checked_sub(self.origin.0)?;
        let dy = y.checked_sub(self.origin.1)?;
        let row = usize::from(dy / self.cell_height);
        let col = usize::from(dx / self.cell_width);
        (row < GRID_SIZE && col < GRID_SIZE).then_some((row, col))
    }

    /// Top-left screen position of a board cell.
    #[must_use]
    pub fn cell_origin(&self, row: usize, col: usize) -> (u16, u16) {
        let offset = |index: usize, size: u16| {
            u16::try_from(index)
                .unwrap_or(u16::MAX)
                .saturating_mul(size)
        };
        (
            self.origin.0.saturating_add(offset(col, self.cell_width)),
            self.origin.1.saturating_add(offset(row, self.cell_height)),
        )
    }
}

/// A tray piece being dragged over the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drag {
    pub slot: usize,
    /// Cell of the piece, relative to its origin, that follows the pointer.
    pub grab: (usize, usize),
}

impl Drag {
    /// Starts dragging the piece in `slot` by its cell at `grab`.
    ///
    /// Returns `None` if the slot is empty or `grab` is not one of the
    /// piece's cells.
    #[must_use]
    pub fn start(tray: &Tray, slot: usize, grab: (usize, usize)) -> Option<Self> {
        let piece = tray.get(slot)?;
        piece
            .cells()
            .any(|cell| cell == grab)
            .then_some(Self { slot, grab })
    }

    /// Origin of the piece when the grabbed cell is over `pointer_cell`.
    ///
    /// The result may lie outside the board; [`Grid::can_place`] rejects it.
    #[must_use]
    pub fn target(&self, pointer_cell: (usize, usize)) -> (i32, i32) {
        let coord = |value: usize| i32::try_from(value).unwrap_or(i32::MAX);
        (
            coord(pointer_cell.0) - coord(self.grab.0),
            coord(pointer_cell.1) - coord(self.grab.1),
        )
    }
}

/// Cells a piece would cover, and whether it may be dropped there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GhostPreview {
    /// The covered cells that are on the board.
    pub cells: CellSet,
    pub valid: bool,
}

#[must_use]
pub fn ghost_preview(grid: &Grid, shape: &Shape, row: i32, col: i32) -> GhostPreview {
    GhostPreview {
        cells: Grid::covered_cells(shape, row, col),
        valid: grid.can_place(shape, row, col),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Piece, PieceId};

    fn shape(id: &str) -> &'static Shape {
        Shape::by_id(id).unwrap()
    }

    #[test]
    fn test_cell_at_covers_whole_cell() {
        let geometry = BoardGeometry {
            origin: (4, 2),
            cell_width: 2,
            cell_height: 1,
        };
        assert_eq!(geometry.cell_at(4, 2), Some((0, 0)));
        assert_eq!(geometry.cell_at(5, 2), Some((0, 0)));
        assert_eq!(geometry.cell_at(6, 2), Some((0, 1)));
        assert_eq!(geometry.cell_at(19, 9), Some((7, 7)));
        assert_eq!(geometry.cell_at(20, 9), None);
        assert_eq!(geometry.cell_at(19, 10), None);
        assert_eq!(geometry.cell_at(3, 2), None);
        assert_eq!(geometry.cell_origin(7, 7), (18, 9));

        let degenerate = BoardGeometry {
            cell_width: 0,
            ..geometry
        };
        assert_eq!(degenerate.cell_at(4, 2), None);
    }

    #[test]
    fn test_drag_needs_a_piece_cell() {
        let tray = Tray::new([
            Piece::new(PieceId(0), shape("t_down")),
            Piece::new(PieceId(1), shape("dot")),
            Piece::new(PieceId(2), shape("dot")),
        ]);
        assert!(Drag::start(&tray, 0, (1, 1)).is_some());
        assert!(Drag::start(&tray, 0, (1, 0)).is_none(), "gap in the T");
        assert!(Drag::start(&tray, 3, (0, 0)).is_none());
        assert!(Drag::start(&Tray::EMPTY, 0, (0, 0)).is_none());
    }

    #[test]
    fn test_drag_target_subtracts_grab() {
        let drag = Drag {
            slot: 0,
            grab: (1, 1),
        };
        assert_eq!(drag.target((4, 5)), (3, 4));
        assert_eq!(drag.target((0, 0)), (-1, -1));
    }

    #[test]
    fn test_ghost_preview() {
        let grid = Grid::from_ascii(
            "
            ........
            ..#.....
            ",
        );
        let square = shape("square2");

        let free = ghost_preview(&grid, square, 2, 2);
        assert!(free.valid);
        assert_eq!(free.cells.len(), 4);

        let blocked = ghost_preview(&grid, square, 0, 1);
        assert!(!blocked.valid);
        assert_eq!(blocked.cells.len(), 4);

        let edge = ghost_preview(&grid, square, 7, 7);
        assert!(!edge.valid);
        assert_eq!(edge.cells.iter().collect::<Vec<_>>(), vec![(7, 7)]);
    }
}
