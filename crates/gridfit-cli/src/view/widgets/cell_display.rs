use gridfit_engine::{Cell, PieceColor};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use crate::view::widgets::{color, style};

/// How a single board or tray cell is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Filled(PieceColor),
    /// Part of the piece placed last.
    JustPlaced(PieceColor),
    /// Part of a completed line that is about to disappear.
    Clearing,
    Ghost {
        valid: bool,
    },
}

impl From<Cell> for CellState {
    fn from(cell: Cell) -> Self {
        cell.map_or(Self::Empty, Self::Filled)
    }
}

#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const WIDTH: u16 = 2;
    pub const HEIGHT: u16 = 1;

    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub const fn from_state(state: CellState) -> Self {
        match state {
            CellState::Empty => Self::new(style::EMPTY_DOT, "."),
            CellState::Filled(piece) => Self::new(style::bg_only(color::piece(piece)), ""),
            CellState::JustPlaced(piece) => Self::new(
                Style::new().fg(color::WHITE).bg(color::piece(piece)),
                "<>",
            ),
            CellState::Clearing => Self::new(style::CLEARING, "**"),
            CellState::Ghost { valid: true } => Self::new(style::GHOST_VALID, "[]"),
            CellState::Ghost { valid: false } => Self::new(style::GHOST_INVALID, "><"),
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Paragraph fills the whole area, not just the cells under the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
