use gridfit_engine::{Phase, ScoreStore};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget as _},
};

use super::app::{PlayApp, ScreenLayout};
use crate::view::widgets::{
    BoardDisplay, KeyBinding, KeyBindingDisplay, LeaderboardDisplay, StatsDisplay, TrayDisplay,
    color, style,
};

const PLAYING_KEYS: &[KeyBinding] = &[
    (&["1", "2", "3"], "Select"),
    (&["←↑↓→"], "Move"),
    (&["Enter", "Space"], "Place"),
    (&["Esc"], "Deselect"),
    (&["Mouse"], "Drag"),
    (&["R"], "Reset"),
    (&["Q"], "Quit"),
];
const GAME_OVER_KEYS: &[KeyBinding] = &[(&["R"], "New game"), (&["Q"], "Quit")];
const PROMPT_KEYS: &[KeyBinding] = &[(&["Enter"], "Save"), (&["Esc"], "Skip")];

/// Draws the whole play screen and reports where the interactive parts went.
pub(super) fn render<S>(app: &PlayApp<S>, frame: &mut Frame) -> ScreenLayout
where
    S: ScoreStore,
{
    let game = &app.game;
    let padding = Padding::horizontal(1);
    let border_style = match game.phase() {
        Phase::Playing => color::WHITE,
        Phase::Clearing => color::YELLOW,
        Phase::GameOver => color::RED,
    };
    let panel = |title: &'static str| {
        Block::bordered()
            .title(Line::from(title).centered())
            .border_style(border_style)
            .style(style::DEFAULT)
    };

    let board = BoardDisplay::new(game.grid())
        .ghost(app.ghost())
        .clearing(game.clearing_cells())
        .just_placed(game.just_placed_cells())
        .block(panel("GRIDFIT"));
    let tray = TrayDisplay::new(game.tray())
        .selected(app.selected)
        .block(Block::new().style(style::DEFAULT));
    let stats = StatsDisplay::new(game).block(panel("STATS").padding(padding));
    let leaderboard = LeaderboardDisplay::new(&app.top_scores, app.settings.leaderboard_size)
        .block(panel("HIGH SCORES").padding(padding));

    let [main_area, help_area, status_area] = Layout::vertical([
        Constraint::Length(board.height() + tray.height()),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .flex(Flex::Center)
    .areas(frame.area());

    let center_width = board.width().max(tray.width());
    let [left_column, center_column, right_column] = Layout::horizontal([
        Constraint::Length(stats.width()),
        Constraint::Length(center_width),
        Constraint::Length(leaderboard.width()),
    ])
    .flex(Flex::Center)
    .spacing(1)
    .areas(main_area);

    let [board_row, tray_area] = Layout::vertical([
        Constraint::Length(board.height()),
        Constraint::Length(tray.height()),
    ])
    .areas(center_column);
    let board_area = board_row.centered_horizontally(Constraint::Length(board.width()));
    let tray_area = tray_area.centered_horizontally(Constraint::Length(tray.width()));
    let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(left_column);
    let [leaderboard_area] =
        Layout::vertical([Constraint::Length(leaderboard.height())]).areas(right_column);

    let layout = ScreenLayout {
        board: board.geometry(board_area),
        tray_pieces: tray.piece_areas(tray_area),
    };

    let buf = frame.buffer_mut();
    board.render(board_area, buf);
    tray.render(tray_area, buf);
    stats.render(stats_area, buf);
    leaderboard.render(leaderboard_area, buf);

    let keys = if app.name_prompt.is_some() {
        PROMPT_KEYS
    } else if game.phase().is_game_over() {
        GAME_OVER_KEYS
    } else {
        PLAYING_KEYS
    };
    KeyBindingDisplay::new(keys).render(help_area, buf);
    if let Some(status) = &app.status {
        Line::styled(status.as_str(), style::DIM)
            .centered()
            .render(status_area, buf);
    }

    if game.phase().is_game_over() {
        let (lines, popup_style) = match &app.name_prompt {
            Some(name) => (
                vec![
                    Line::from("NEW HIGH SCORE!"),
                    Line::from(format!("{} points", game.score())),
                    Line::from(format!("Name: {name}_")),
                ],
                style::PROMPT,
            ),
            None => (
                vec![
                    Line::from("GAME OVER!!"),
                    Line::from(format!("{} points", game.score())),
                ],
                style::GAME_OVER,
            ),
        };
        render_popup(frame, board_area, lines, popup_style);
    }

    layout
}

fn render_popup(
    frame: &mut Frame,
    over: Rect,
    lines: Vec<Line<'static>>,
    popup_style: Style,
) {
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX) + 2;
    let area = over.centered(Constraint::Length(over.width), Constraint::Length(height));
    let block = Block::new().style(popup_style);
    let inner = block.inner(area);
    let text = Text::from(lines).style(popup_style).centered();

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);
    frame.render_widget(
        text,
        inner.centered_vertically(Constraint::Length(height - 2)),
    );
}
