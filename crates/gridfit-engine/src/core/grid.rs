use std::fmt;

use serde::{Deserialize, Serialize};

use super::{GRID_SIZE, cell_set::CellSet, shape::PieceColor, shape::Shape};

/// A grid cell: empty, or filled with the color of the piece that occupies it.
pub type Cell = Option<PieceColor>;

const FULL_LINE: u8 = u8::MAX;

/// Rows and columns of a grid, stored as 8-bit masks.
///
/// Returned by [`Grid::find_completed_lines`] and [`Grid::near_complete_lines`].
/// A cell at the intersection of a listed row and a listed column belongs to
/// both lines: it counts once per line in [`total`](Self::total), but appears
/// once in [`cells`](Self::cells).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedLines {
    rows: u8,
    cols: u8,
}

impl CompletedLines {
    pub const NONE: Self = Self { rows: 0, cols: 0 };

    pub fn rows(self) -> impl Iterator<Item = usize> {
        (0..GRID_SIZE).filter(move |row| self.rows & (1 << row) != 0)
    }

    pub fn cols(self) -> impl Iterator<Item = usize> {
        (0..GRID_SIZE).filter(move |col| self.cols & (1 << col) != 0)
    }

    #[must_use]
    pub const fn row_count(self) -> usize {
        self.rows.count_ones() as usize
    }

    #[must_use]
    pub const fn col_count(self) -> usize {
        self.cols.count_ones() as usize
    }

    /// Number of lines, rows plus columns.
    #[must_use]
    pub const fn total(self) -> usize {
        self.row_count() + self.col_count()
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.rows == 0 && self.cols == 0
    }

    /// Every cell that lies in a listed row or column.
    #[must_use]
    pub fn cells(self) -> CellSet {
        let rows = self.rows().map(CellSet::row);
        let cols = self.cols().map(CellSet::col);
        rows.chain(cols).fold(CellSet::EMPTY, CellSet::union)
    }
}

/// The 8×8 playing field.
///
/// All operations are pure: placing and clearing return a new grid.
///
/// # Example
///
/// ```
/// use gridfit_engine::{Grid, Shape};
///
/// let square = Shape::by_id("square2").unwrap();
/// let grid = Grid::EMPTY;
/// assert!(grid.can_place(square, 6, 6));
/// assert!(!grid.can_place(square, 7, 7));
///
/// let grid = grid.place_piece(square, 6, 6);
/// assert_eq!(grid.filled_count(), 4);
/// assert!(!grid.can_place(square, 5, 5));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Grid {
    pub const SIZE: usize = GRID_SIZE;
    pub const EMPTY: Self = Self {
        rows: [[None; GRID_SIZE]; GRID_SIZE],
    };

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.rows[row][col]
    }

    #[must_use]
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.rows[row][col].is_some()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; GRID_SIZE]> {
        self.rows.iter()
    }

    #[must_use]
    pub fn filled_cells(&self) -> CellSet {
        self.cells_where(Option::is_some)
    }

    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.filled_cells().len()
    }

    fn cells_where(&self, pred: impl Fn(&Cell) -> bool) -> CellSet {
        let mut set = CellSet::EMPTY;
        for (row, cells) in self.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if pred(cell) {
                    set.insert(row, col);
                }
            }
        }
        set
    }

    /// Translates the shape to `(row, col)`.
    ///
    /// Returns `None` if any cell falls outside the grid.
    fn translate(
        shape: &Shape,
        row: i32,
        col: i32,
    ) -> Option<impl Iterator<Item = (usize, usize)> + '_> {
        let in_bounds = |offset: usize, origin: i32| {
            let pos = i64::from(origin) + i64::try_from(offset).ok()?;
            usize::try_from(pos).ok().filter(|&pos| pos < GRID_SIZE)
        };
        let all_inside = shape
            .cells()
            .all(|(dr, dc)| in_bounds(dr, row).is_some() && in_bounds(dc, col).is_some());
        if !all_inside {
            return None;
        }
        Some(
            shape
                .cells()
                .filter_map(move |(dr, dc)| Some((in_bounds(dr, row)?, in_bounds(dc, col)?))),
        )
    }

    /// Returns the in-bounds cells covered by the shape at `(row, col)`.
    ///
    /// Cells falling outside the grid are dropped, so the result may be
    /// smaller than the shape.
    #[must_use]
    pub fn covered_cells(shape: &Shape, row: i32, col: i32) -> CellSet {
        shape
            .cells()
            .filter_map(|(dr, dc)| {
                let r = usize::try_from(i64::from(row) + i64::try_from(dr).ok()?).ok()?;
                let c = usize::try_from(i64::from(col) + i64::try_from(dc).ok()?).ok()?;
                (r < GRID_SIZE && c < GRID_SIZE).then_some((r, c))
            })
            .collect()
    }

    /// Checks whether the shape fits at `(row, col)`.
    ///
    /// True iff every cell of the shape, translated by `(row, col)`, lies
    /// inside the grid and is empty.
    #[must_use]
    pub fn can_place(&self, shape: &Shape, row: i32, col: i32) -> bool {
        match Self::translate(shape, row, col) {
            Some(mut cells) => cells.all(|(r, c)| !self.is_filled(r, c)),
            None => false,
        }
    }

    /// Returns a new grid with the shape's cells filled with its color.
    ///
    /// # Panics
    ///
    /// Panics if the placement is not legal (see [`Self::can_place`]).
    #[must_use]
    pub fn place_piece(&self, shape: &Shape, row: i32, col: i32) -> Self {
        assert!(
            self.can_place(shape, row, col),
            "illegal placement of {} at ({row}, {col})",
            shape.id()
        );
        let mut grid = self.clone();
        if let Some(cells) = Self::translate(shape, row, col) {
            for (r, c) in cells {
                grid.rows[r][c] = Some(shape.color());
            }
        }
        grid
    }

    /// Finds every fully occupied row and column.
    ///
    /// Both axes are checked independently, so a single placement can
    /// complete rows and columns at once.
    #[must_use]
    pub fn find_completed_lines(&self) -> CompletedLines {
        let (rows, cols) = self.line_masks(|missing| missing == 0);
        CompletedLines { rows, cols }
    }

    /// Finds rows and columns missing between 1 and `max_missing` cells.
    #[must_use]
    pub fn near_complete_lines(&self, max_missing: usize) -> CompletedLines {
        let (rows, cols) = self.line_masks(|missing| (1..=max_missing).contains(&missing));
        CompletedLines { rows, cols }
    }

    fn line_masks(&self, pred: impl Fn(usize) -> bool) -> (u8, u8) {
        let mut row_fill = [0u8; GRID_SIZE];
        let mut col_fill = [0u8; GRID_SIZE];
        for (row, cells) in self.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if cell.is_some() {
                    row_fill[row] |= 1 << col;
                    col_fill[col] |= 1 << row;
                }
            }
        }
        let mask = |fill: [u8; GRID_SIZE]| {
            fill.iter().enumerate().fold(0u8, |acc, (i, &bits)| {
                let missing = (FULL_LINE & !bits).count_ones() as usize;
                if pred(missing) { acc | (1 << i) } else { acc }
            })
        };
        (mask(row_fill), mask(col_fill))
    }

    /// Returns a new grid with every cell of the given rows and columns emptied.
    #[must_use]
    pub fn clear_lines(&self, lines: CompletedLines) -> Self {
        let mut grid = self.clone();
        for (row, col) in lines.cells().iter() {
            grid.rows[row][col] = None;
        }
        grid
    }

    /// Iterates every `(row, col)` at which the shape can be placed.
    pub fn placements<'a>(&'a self, shape: &'a Shape) -> impl Iterator<Item = (i32, i32)> + 'a {
        let max_row = GRID_SIZE.saturating_sub(shape.height());
        let max_col = GRID_SIZE.saturating_sub(shape.width());
        (0..=max_row)
            .flat_map(move |row| (0..=max_col).map(move |col| (row, col)))
            .filter_map(|(row, col)| Some((i32::try_from(row).ok()?, i32::try_from(col).ok()?)))
            .filter(move |&(row, col)| self.can_place(shape, row, col))
    }

    #[must_use]
    pub fn can_piece_fit_anywhere(&self, shape: &Shape) -> bool {
        self.placements(shape).next().is_some()
    }

    /// Checks whether at least one of the shapes fits somewhere.
    ///
    /// An empty collection never fits.
    pub fn can_any_piece_fit<'a>(&self, shapes: impl IntoIterator<Item = &'a Shape>) -> bool {
        shapes
            .into_iter()
            .any(|shape| self.can_piece_fit_anywhere(shape))
    }

    /// Checks whether some legal placement of the shape completes a line.
    #[must_use]
    pub fn would_complete_line(&self, shape: &Shape) -> bool {
        self.placements(shape).any(|(row, col)| {
            !self
                .place_piece(shape, row, col)
                .find_completed_lines()
                .is_empty()
        })
    }

    /// Fraction of occupied cells, from 0.0 to 1.0.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn density(&self) -> f64 {
        self.filled_count() as f64 / (GRID_SIZE * GRID_SIZE) as f64
    }

    /// Creates a grid from ASCII art for testing.
    ///
    /// `.` is an empty cell, `#` a filled cell (colored red) and a color
    /// letter (see [`PieceColor::as_char`]) a cell of that color. Up to 8
    /// rows of exactly 8 cells, from the top; missing rows are empty.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut grid = Self::EMPTY;
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(lines.len() <= GRID_SIZE, "too many rows: {}", lines.len());

        for (row, line) in lines.iter().enumerate() {
            let cells: Vec<Cell> = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| match c {
                    '.' => None,
                    '#' => Some(PieceColor::Red),
                    c => Some(
                        PieceColor::from_char(c)
                            .unwrap_or_else(|| panic!("invalid cell {c:?} at row {row}")),
                    ),
                })
                .collect();
            assert_eq!(
                cells.len(),
                GRID_SIZE,
                "Each row must have exactly {GRID_SIZE} cells, got {} at row {row}",
                cells.len(),
            );
            grid.rows[row].copy_from_slice(&cells);
        }
        grid
    }

    fn row_string(cells: &[Cell; GRID_SIZE]) -> String {
        cells
            .iter()
            .map(|cell| cell.map_or('.', PieceColor::as_char))
            .collect()
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rows.iter().map(Self::row_string))
            .finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cells in &self.rows {
            writeln!(f, "{}", Self::row_string(cells))?;
        }
        Ok(())
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: ["R.......", "........", ...] (one string per row)
        let rows: Vec<String> = self.rows.iter().map(Self::row_string).collect();
        rows.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let rows = Vec::<String>::deserialize(deserializer)?;
        if rows.len() != GRID_SIZE {
            return Err(serde::de::Error::custom(format!(
                "expected {GRID_SIZE} rows, got {}",
                rows.len()
            )));
        }

        let mut grid = Self::EMPTY;
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != GRID_SIZE {
                return Err(serde::de::Error::custom(format!(
                    "expected {GRID_SIZE} cells at row {row}, got {line:?}"
                )));
            }
            for (col, c) in line.chars().enumerate() {
                grid.rows[row][col] = match c {
                    '.' => None,
                    c => Some(PieceColor::from_char(c).ok_or_else(|| {
                        serde::de::Error::custom(format!("invalid cell {c:?} at ({row}, {col})"))
                    })?),
                };
            }
        }
        Ok(grid)
    }
}
