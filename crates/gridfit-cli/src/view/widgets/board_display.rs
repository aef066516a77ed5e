use gridfit_engine::{BoardGeometry, CellSet, GRID_SIZE, GhostPreview, Grid};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::view::widgets::{CellDisplay, CellState};

#[expect(clippy::cast_possible_truncation)]
const GRID_CELLS: u16 = GRID_SIZE as u16;

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    grid: &'a Grid,
    ghost: Option<GhostPreview>,
    clearing: CellSet,
    just_placed: CellSet,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            ghost: None,
            clearing: CellSet::EMPTY,
            just_placed: CellSet::EMPTY,
            block: None,
        }
    }

    pub fn ghost(self, ghost: Option<GhostPreview>) -> Self {
        Self { ghost, ..self }
    }

    pub fn clearing(self, clearing: CellSet) -> Self {
        Self { clearing, ..self }
    }

    pub fn just_placed(self, just_placed: CellSet) -> Self {
        Self {
            just_placed,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        GRID_CELLS * CellDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        GRID_CELLS * CellDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }

    /// Screen geometry of the cells when rendered into `area`.
    pub fn geometry(&self, area: Rect) -> BoardGeometry {
        let inner = self.block.inner_if_some(area);
        BoardGeometry {
            origin: (inner.x, inner.y),
            cell_width: CellDisplay::WIDTH,
            cell_height: CellDisplay::HEIGHT,
        }
    }

    fn cell_state(&self, row: usize, col: usize) -> CellState {
        let cell = self.grid.cell(row, col);
        if cell.is_some() && self.clearing.contains(row, col) {
            return CellState::Clearing;
        }
        if let Some(ghost) = self.ghost
            && ghost.cells.contains(row, col)
        {
            return CellState::Ghost { valid: ghost.valid };
        }
        match cell {
            Some(color) if self.just_placed.contains(row, col) => CellState::JustPlaced(color),
            _ => cell.into(),
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let inner = self.block.inner_if_some(area);
        let geometry = self.geometry(area);

        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let (x, y) = geometry.cell_origin(row, col);
                let cell_area =
                    Rect::new(x, y, CellDisplay::WIDTH, CellDisplay::HEIGHT).intersection(inner);
                if cell_area.is_empty() {
                    continue;
                }
                CellDisplay::from_state(self.cell_state(row, col)).render(cell_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use gridfit_engine::{PieceColor, Shape, ghost_preview};
    use ratatui::widgets::Block;

    use super::*;
    use crate::view::widgets::color;

    #[test]
    fn test_size_and_geometry_include_border() {
        let grid = Grid::EMPTY;
        let board = BoardDisplay::new(&grid).block(Block::bordered());
        assert_eq!((board.width(), board.height()), (18, 10));

        let geometry = board.geometry(Rect::new(5, 3, 18, 10));
        assert_eq!(geometry.origin, (6, 4));
        assert_eq!(geometry.cell_at(6, 4), Some((0, 0)));
        assert_eq!(geometry.cell_at(21, 11), Some((7, 7)));
    }

    #[test]
    fn test_cell_state_precedence() {
        let grid = Grid::from_ascii(
            "
            RR......
            ",
        );
        let square = Shape::by_id("square2").unwrap();
        let board = BoardDisplay::new(&grid)
            .clearing(CellSet::row(0))
            .just_placed(CellSet::col(1))
            .ghost(Some(ghost_preview(&grid, square, 0, 1)));

        assert_eq!(board.cell_state(0, 0), CellState::Clearing);
        assert_eq!(board.cell_state(0, 1), CellState::Clearing);
        assert_eq!(board.cell_state(0, 2), CellState::Ghost { valid: false });
        assert_eq!(board.cell_state(1, 1), CellState::Ghost { valid: false });
        assert_eq!(board.cell_state(0, 3), CellState::Empty);

        let settled = BoardDisplay::new(&grid).just_placed(CellSet::col(1));
        assert_eq!(settled.cell_state(0, 1), CellState::JustPlaced(PieceColor::Red));
        assert_eq!(settled.cell_state(0, 0), CellState::Filled(PieceColor::Red));
    }

    #[test]
    fn test_renders_cells() {
        let grid = Grid::from_ascii("B.......");
        let board = BoardDisplay::new(&grid);
        let mut buf = Buffer::empty(Rect::new(0, 0, 16, 8));
        board.render(buf.area, &mut buf);
        assert_eq!(buf[(1, 0)].bg, color::BLUE);
        assert_eq!(buf[(2, 0)].bg, color::BLACK);
        assert_eq!(buf[(15, 7)].bg, color::BLACK);
    }
}
