use gridfit_engine::{Piece, TRAY_SIZE, Tray};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::view::widgets::{CellDisplay, CellState, style};

/// Largest piece extent, in cells.
const SLOT_CELLS: u16 = 5;
const SLOT_WIDTH: u16 = SLOT_CELLS * CellDisplay::WIDTH + 2;
const SLOT_HEIGHT: u16 = SLOT_CELLS * CellDisplay::HEIGHT + 2;
const SLOT_SPACING: u16 = 1;

/// The three tray slots side by side, each labelled with its key.
#[derive(Debug)]
pub struct TrayDisplay<'a> {
    tray: &'a Tray,
    selected: Option<usize>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> TrayDisplay<'a> {
    pub fn new(tray: &'a Tray) -> Self {
        Self {
            tray,
            selected: None,
            block: None,
        }
    }

    pub fn selected(self, selected: Option<usize>) -> Self {
        Self { selected, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        3 * SLOT_WIDTH + 2 * SLOT_SPACING + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        SLOT_HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }

    fn slot_areas(&self, area: Rect) -> [Rect; TRAY_SIZE] {
        let inner = self.block.inner_if_some(area);
        Layout::horizontal([Constraint::Length(SLOT_WIDTH); TRAY_SIZE])
            .spacing(SLOT_SPACING)
            .areas(inner)
    }

    /// Where each remaining piece is drawn when rendered into `area`.
    ///
    /// The rectangle spans the piece's bounding box, one cell per
    /// `CellDisplay` unit.
    pub fn piece_areas(&self, area: Rect) -> [Option<Rect>; TRAY_SIZE] {
        let slots = self.slot_areas(area);
        let mut areas = [None; TRAY_SIZE];
        for (slot, piece) in self.tray.remaining() {
            let slot_inner = slots[slot].inner(Margin::new(1, 1));
            areas[slot] = Some(piece_area(piece, slot_inner));
        }
        areas
    }
}

fn piece_area(piece: Piece, slot_inner: Rect) -> Rect {
    let (width, height) = dimensions(piece);
    slot_inner.centered(
        Constraint::Length(width * CellDisplay::WIDTH),
        Constraint::Length(height * CellDisplay::HEIGHT),
    )
}

fn dimensions(piece: Piece) -> (u16, u16) {
    let shape = piece.shape();
    let clamp = |n: usize| u16::try_from(n).unwrap_or(SLOT_CELLS).min(SLOT_CELLS);
    (clamp(shape.width()), clamp(shape.height()))
}

impl Widget for TrayDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &TrayDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let pieces = self.piece_areas(area);

        for (slot, slot_area) in self.slot_areas(area).into_iter().enumerate() {
            let piece = self.tray.get(slot);
            let border_style = match (piece, self.selected == Some(slot)) {
                (None, _) => style::DIM,
                (Some(_), true) => style::SELECTED_BORDER,
                (Some(_), false) => style::DEFAULT,
            };
            let frame = BlockWidget::bordered()
                .title(Line::from(format!("{}", slot + 1)).centered())
                .border_style(border_style)
                .style(style::DEFAULT);
            frame.render(slot_area, buf);

            let (Some(piece), Some(piece_area)) = (piece, pieces[slot]) else {
                continue;
            };
            for (row, col) in piece.cells() {
                let (Ok(row), Ok(col)) = (u16::try_from(row), u16::try_from(col)) else {
                    continue;
                };
                let cell_area = Rect::new(
                    piece_area.x + col * CellDisplay::WIDTH,
                    piece_area.y + row * CellDisplay::HEIGHT,
                    CellDisplay::WIDTH,
                    CellDisplay::HEIGHT,
                )
                .intersection(piece_area);
                CellDisplay::from_state(CellState::Filled(piece.color())).render(cell_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use gridfit_engine::{PieceId, Shape};

    use super::*;

    fn tray() -> Tray {
        let piece = |n, id| Piece::new(PieceId(n), Shape::by_id(id).unwrap());
        Tray::new([
            piece(0, "line5_h"),
            piece(1, "dot"),
            piece(2, "big_l_0"),
        ])
    }

    #[test]
    fn test_size() {
        let tray = tray();
        let display = TrayDisplay::new(&tray);
        assert_eq!((display.width(), display.height()), (38, 7));
    }

    #[test]
    fn test_piece_areas_are_centered_in_slots() {
        let tray = tray();
        let display = TrayDisplay::new(&tray);
        let areas = display.piece_areas(Rect::new(0, 0, 38, 7));

        assert_eq!(areas[0], Some(Rect::new(1, 3, 10, 1)));
        assert_eq!(areas[1], Some(Rect::new(18, 3, 2, 1)));
        assert_eq!(areas[2], Some(Rect::new(29, 2, 6, 3)));
    }

    #[test]
    fn test_consumed_slot_has_no_area() {
        let areas = TrayDisplay::new(&Tray::EMPTY).piece_areas(Rect::new(0, 0, 38, 7));
        assert_eq!(areas, [None; TRAY_SIZE]);
    }
}
