use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_display::*, key_binding_display::*, leaderboard_display::*,
    stats_display::*, tray_display::*,
};

mod board_display;
mod cell_display;
mod key_binding_display;
mod leaderboard_display;
mod stats_display;
mod tray_display;

pub mod color {
    use gridfit_engine::PieceColor;
    use ratatui::style::Color;

    pub const RED: Color = Color::Rgb(230, 60, 60);
    pub const ORANGE: Color = Color::Rgb(255, 140, 0);
    pub const YELLOW: Color = Color::Rgb(240, 210, 40);
    pub const GREEN: Color = Color::Rgb(60, 200, 90);
    pub const CYAN: Color = Color::Rgb(40, 210, 220);
    pub const BLUE: Color = Color::Rgb(60, 100, 240);
    pub const PURPLE: Color = Color::Rgb(160, 80, 220);
    pub const PINK: Color = Color::Rgb(240, 110, 180);
    pub const GRAY: Color = Color::Rgb(110, 110, 110);
    pub const DARK_GRAY: Color = Color::Rgb(60, 60, 60);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    pub const fn piece(color: PieceColor) -> Color {
        match color {
            PieceColor::Red => RED,
            PieceColor::Orange => ORANGE,
            PieceColor::Yellow => YELLOW,
            PieceColor::Green => GREEN,
            PieceColor::Cyan => CYAN,
            PieceColor::Blue => BLUE,
            PieceColor::Purple => PURPLE,
            PieceColor::Pink => PINK,
        }
    }
}

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    use super::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const DIM: Style = fg_bg(color::GRAY, color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::DARK_GRAY, color::BLACK);
    pub const GHOST_VALID: Style = fg_bg(color::WHITE, color::DARK_GRAY);
    pub const GHOST_INVALID: Style = fg_bg(color::RED, color::BLACK);
    pub const CLEARING: Style = fg_bg(color::BLACK, color::WHITE).add_modifier(Modifier::BOLD);
    pub const SELECTED_BORDER: Style = Style::new().fg(color::YELLOW);
    pub const GAME_OVER: Style = fg_bg(color::WHITE, color::RED);
    pub const PROMPT: Style = fg_bg(color::BLACK, color::YELLOW);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
