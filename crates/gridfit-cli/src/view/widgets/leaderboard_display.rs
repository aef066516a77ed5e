use gridfit_engine::ScoreRecord;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::style;

/// Ranked list of the best scores, padded to `size` rows.
#[derive(Debug)]
pub struct LeaderboardDisplay<'a> {
    records: &'a [ScoreRecord],
    size: usize,
    block: Option<BlockWidget<'a>>,
}

impl<'a> LeaderboardDisplay<'a> {
    pub fn new(records: &'a [ScoreRecord], size: usize) -> Self {
        Self {
            records,
            size,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        // rank, name, score
        4 + 16 + 8 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(self.size.max(1)).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for LeaderboardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        if self.records.is_empty() {
            Line::styled("no scores yet", style::DIM)
                .centered()
                .render(area, buf);
            return;
        }

        let rows = Layout::vertical((0..self.size).map(|_| Constraint::Length(1))).split(area);
        for (rank, (record, row_area)) in self.records.iter().zip(rows.iter()).enumerate() {
            let [rank_area, name_area, score_area] = row_area.layout(&Layout::horizontal([
                Constraint::Length(4),
                Constraint::Fill(1),
                Constraint::Length(8),
            ]));
            Line::styled(format!("{}.", rank + 1), style::DIM).render(rank_area, buf);
            Line::styled(record.name.as_str(), style::DEFAULT).render(name_area, buf);
            Line::styled(record.score.to_string(), style::DEFAULT)
                .right_aligned()
                .render(score_area, buf);
        }
    }
}
