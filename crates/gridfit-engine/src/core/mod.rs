pub use self::{cell_set::*, grid::*, shape::*};

pub(crate) mod cell_set;
pub(crate) mod grid;
pub(crate) mod shape;

/// Number of rows and columns of the board.
pub const GRID_SIZE: usize = 8;
