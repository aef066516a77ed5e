use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use gridfit_engine::{
    Action, BoardGeometry, Drag, GRID_SIZE, GameState, GhostPreview, MAX_PLAYER_NAME_LEN,
    ScoreRecord, ScoreStore, ScoreStoreError, TRAY_SIZE, ghost_preview,
};
use ratatui::{
    Frame,
    layout::{Position, Rect},
};
use ratatui_runtime::{App, Countdown, RenderMode, Runtime};

use crate::view::widgets::CellDisplay;

const TICK_RATE: f64 = 30.0;
const FPS: f64 = 60.0;

#[derive(Debug, Clone, Copy)]
pub struct PlaySettings {
    /// Time between completing lines and removing them.
    pub clear_delay: Duration,
    /// Time the last placed piece stays highlighted.
    pub highlight: Duration,
    pub leaderboard_size: usize,
}

/// Where things were drawn last frame, for mouse hit testing.
#[derive(Debug, Clone, Copy)]
pub(super) struct ScreenLayout {
    pub board: BoardGeometry,
    pub tray_pieces: [Option<Rect>; TRAY_SIZE],
}

impl ScreenLayout {
    /// The tray slot and piece-relative cell under `(x, y)`.
    fn tray_cell_at(&self, x: u16, y: u16) -> Option<(usize, (usize, usize))> {
        self.tray_pieces
            .iter()
            .enumerate()
            .find_map(|(slot, area)| {
                let area = (*area)?;
                area.contains(Position { x, y }).then(|| {
                    let row = usize::from((y - area.y) / CellDisplay::HEIGHT);
                    let col = usize::from((x - area.x) / CellDisplay::WIDTH);
                    (slot, (row, col))
                })
            })
    }
}

/// Interactive game: input mapping, delays and the leaderboard around a [`GameState`].
#[derive(Debug)]
pub struct PlayApp<S> {
    pub(super) game: GameState,
    store: S,
    pub(super) settings: PlaySettings,
    pub(super) top_scores: Vec<ScoreRecord>,
    pub(super) selected: Option<usize>,
    cursor: (i32, i32),
    drag: Option<Drag>,
    drag_target: Option<(i32, i32)>,
    clear_timer: Countdown,
    highlight_timer: Countdown,
    pub(super) name_prompt: Option<String>,
    pub(super) status: Option<String>,
    layout: Option<ScreenLayout>,
    is_exiting: bool,
}

impl<S> PlayApp<S>
where
    S: ScoreStore,
{
    pub fn new(game: GameState, store: S, settings: PlaySettings) -> Self {
        let mut app = Self {
            game,
            store,
            settings,
            top_scores: vec![],
            selected: None,
            cursor: (0, 0),
            drag: None,
            drag_target: None,
            clear_timer: Countdown::default(),
            highlight_timer: Countdown::default(),
            name_prompt: None,
            status: None,
            layout: None,
            is_exiting: false,
        };
        app.refresh_scores();
        app
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    fn refresh_scores(&mut self) {
        match self.store.fetch_top_scores(self.settings.leaderboard_size) {
            Ok(records) => self.top_scores = records,
            Err(err) => self.status = Some(format!("Leaderboard unavailable: {err}")),
        }
    }

    /// Ghost of the dragged or selected piece.
    pub(super) fn ghost(&self) -> Option<GhostPreview> {
        if self.game.phase().is_game_over() {
            return None;
        }
        let (slot, (row, col)) = match self.drag {
            Some(drag) => (drag.slot, self.drag_target?),
            None => (self.selected?, self.cursor),
        };
        let piece = self.game.tray().get(slot)?;
        Some(ghost_preview(self.game.grid(), piece.shape(), row, col))
    }

    fn dispatch(&mut self, action: Action) -> bool {
        let was_over = self.game.phase().is_game_over();
        if !self.game.dispatch(action) {
            return false;
        }
        if let Action::PlacePiece { .. } = action {
            if self.game.phase().is_clearing() {
                self.clear_timer.start(self.settings.clear_delay);
            }
            if !self.game.just_placed_cells().is_empty() {
                self.highlight_timer.start(self.settings.highlight);
            }
        }
        if !was_over && self.game.phase().is_game_over() {
            self.on_game_over();
        }
        true
    }

    fn on_game_over(&mut self) {
        self.selected = None;
        self.drag = None;
        let score = self.game.score();
        match self
            .store
            .is_new_high_score(score, self.settings.leaderboard_size)
        {
            Ok(true) => self.name_prompt = Some(String::new()),
            Ok(false) => {}
            Err(err) => self.status = Some(format!("Leaderboard unavailable: {err}")),
        }
    }

    fn reset(&mut self) {
        self.dispatch(Action::Reset);
        self.clear_timer.cancel();
        self.highlight_timer.cancel();
        self.selected = None;
        self.drag = None;
        self.drag_target = None;
        self.name_prompt = None;
        self.status = None;
    }

    fn select(&mut self, slot: usize) {
        if self.game.tray().get(slot).is_some() {
            self.selected = Some(slot);
            self.move_cursor(0, 0);
        }
    }

    /// Moves the selected piece's origin, keeping the piece on the board.
    fn move_cursor(&mut self, d_row: i32, d_col: i32) {
        let Some(piece) = self.selected.and_then(|slot| self.game.tray().get(slot)) else {
            return;
        };
        let limit = |extent: usize| i32::try_from(GRID_SIZE.saturating_sub(extent)).unwrap_or(0);
        let (row, col) = self.cursor;
        self.cursor = (
            (row + d_row).clamp(0, limit(piece.shape().height())),
            (col + d_col).clamp(0, limit(piece.shape().width())),
        );
    }

    fn place(&mut self, slot: usize, row: i32, col: i32) {
        if !self.dispatch(Action::PlacePiece { slot, row, col }) {
            return;
        }
        self.cursor = (row, col);
        self.selected = None;
        if let Some(&(next, _)) = self.game.tray().remaining().first()
            && !self.game.phase().is_game_over()
        {
            self.select(next);
        }
    }

    pub(super) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if self.name_prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.is_exiting = true,
            KeyCode::Char('r') => self.reset(),
            KeyCode::Char('1') => self.select(0),
            KeyCode::Char('2') => self.select(1),
            KeyCode::Char('3') => self.select(2),
            KeyCode::Esc => self.selected = None,
            KeyCode::Up => self.move_cursor(-1, 0),
            KeyCode::Down => self.move_cursor(1, 0),
            KeyCode::Left => self.move_cursor(0, -1),
            KeyCode::Right => self.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(slot) = self.selected {
                    let (row, col) = self.cursor;
                    self.place(slot, row, col);
                }
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(name) = &mut self.name_prompt else {
            return;
        };
        match key.code {
            KeyCode::Char(c) if !c.is_control() && name.chars().count() < MAX_PLAYER_NAME_LEN => {
                name.push(c);
            }
            KeyCode::Backspace => _ = name.pop(),
            KeyCode::Esc => self.name_prompt = None,
            KeyCode::Enter => self.submit_name(),
            _ => {}
        }
    }

    fn submit_name(&mut self) {
        let Some(name) = self.name_prompt.take() else {
            return;
        };
        match self.store.submit_score(&name, self.game.score()) {
            Ok(record) => {
                self.status = Some(format!("Saved {} with {} points", record.name, record.score));
                self.refresh_scores();
            }
            Err(err @ ScoreStoreError::InvalidName { .. }) => {
                self.status = Some(err.to_string());
                self.name_prompt = Some(name);
            }
            Err(err) => self.status = Some(format!("Could not save score: {err}")),
        }
    }

    pub(super) fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(layout) = self.layout else {
            return;
        };
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.game.phase().is_game_over() || self.name_prompt.is_some() {
                    return;
                }
                if let Some((slot, grab)) = layout.tray_cell_at(x, y)
                    && let Some(drag) = Drag::start(self.game.tray(), slot, grab)
                {
                    self.drag = Some(drag);
                    self.drag_target = None;
                    self.selected = Some(slot);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                if let Some(drag) = self.drag {
                    self.drag_target = layout.board.cell_at(x, y).map(|cell| drag.target(cell));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let commit = self.ghost().is_some_and(|ghost| ghost.valid);
                let (Some(drag), target) = (self.drag.take(), self.drag_target.take()) else {
                    return;
                };
                if let Some((row, col)) = target
                    && commit
                {
                    self.place(drag.slot, row, col);
                }
            }
            _ => {}
        }
    }

    pub(super) fn tick(&mut self, elapsed: Duration) {
        if self.clear_timer.advance(elapsed) {
            self.dispatch(Action::FinishClear);
        }
        if self.highlight_timer.advance(elapsed) {
            self.dispatch(Action::ClearPlacedHighlight);
        }
    }
}

impl<S> App for PlayApp<S>
where
    S: ScoreStore,
{
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(TICK_RATE));
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
        runtime.set_mouse_capture(true);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        self.layout = Some(super::render::render(self, frame));
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        self.tick(elapsed);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use gridfit_engine::{
        ClearMode, GameConfig, Grid, MemoryScoreStore, Piece, PieceId, PieceSeed, Shape, Tray,
    };

    use super::*;

    const MS: Duration = Duration::from_millis(1);

    fn settings() -> PlaySettings {
        PlaySettings {
            clear_delay: MS * 300,
            highlight: MS * 400,
            leaderboard_size: 3,
        }
    }

    fn config() -> GameConfig {
        GameConfig {
            seed: Some(PieceSeed::from_bytes([7; 16])),
            clear_mode: ClearMode::Deferred,
            ..GameConfig::default()
        }
    }

    fn tray(ids: [&str; 3]) -> Tray {
        let mut n = 100;
        Tray::new(ids.map(|id| {
            n += 1;
            Piece::new(PieceId(n), Shape::by_id(id).unwrap())
        }))
    }

    fn app(grid: Grid, ids: [&str; 3]) -> PlayApp<MemoryScoreStore> {
        let game = GameState::from_position(config(), grid, tray(ids));
        PlayApp::new(game, MemoryScoreStore::new(), settings())
    }

    fn press(app: &mut PlayApp<MemoryScoreStore>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn mouse(app: &mut PlayApp<MemoryScoreStore>, kind: MouseEventKind, x: u16, y: u16) {
        app.handle_mouse(MouseEvent {
            kind,
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        });
    }

    #[test]
    fn test_keyboard_placement() {
        let mut app = app(Grid::EMPTY, ["square2", "dot", "dot"]);
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.ghost().map(|ghost| ghost.valid), Some(true));
        press(&mut app, KeyCode::Enter);

        assert!(app.game.grid().is_filled(1, 2));
        assert!(app.game.grid().is_filled(2, 3));
        assert_eq!(app.game.score(), 40);
        assert_eq!(app.selected, Some(1), "next piece is selected");
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut app = app(Grid::EMPTY, ["line5_h", "dot", "dot"]);
        press(&mut app, KeyCode::Char('1'));
        for _ in 0..10 {
            press(&mut app, KeyCode::Right);
            press(&mut app, KeyCode::Up);
        }
        assert_eq!(app.cursor, (0, 3));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.ghost(), None);
    }

    #[test]
    fn test_clear_and_highlight_timers() {
        let mut app = app(Grid::from_ascii("#######."), ["dot", "dot", "dot"]);
        press(&mut app, KeyCode::Char('1'));
        for _ in 0..7 {
            press(&mut app, KeyCode::Right);
        }
        press(&mut app, KeyCode::Char(' '));
        assert!(app.game.phase().is_clearing());

        app.tick(MS * 200);
        assert!(app.game.phase().is_clearing());
        app.tick(MS * 100);
        assert!(app.game.phase().is_playing());
        assert_eq!(app.game.grid().filled_count(), 0);
        assert!(!app.game.just_placed_cells().is_empty());

        app.tick(MS * 100);
        assert!(app.game.just_placed_cells().is_empty());
    }

    #[test]
    fn test_mouse_drag_and_drop() {
        let mut app = app(Grid::EMPTY, ["t_down", "dot", "dot"]);
        app.layout = Some(ScreenLayout {
            board: BoardGeometry {
                origin: (10, 1),
                cell_width: 2,
                cell_height: 1,
            },
            tray_pieces: [
                Some(Rect::new(10, 12, 6, 2)),
                Some(Rect::new(20, 12, 2, 1)),
                None,
            ],
        });

        // the gap below the T's left arm is not part of the piece
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 10, 13);
        assert_eq!(app.drag, None);

        // grab the stem, then hover over board cell (4, 3)
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 12, 13);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 16, 5);
        assert_eq!(app.drag_target, Some((3, 2)));
        assert_eq!(app.ghost().map(|ghost| ghost.valid), Some(true));

        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 16, 5);
        assert_eq!(app.drag, None);
        let placed: Vec<_> = app.game.grid().filled_cells().iter().collect();
        assert_eq!(placed, vec![(3, 2), (3, 3), (3, 4), (4, 3)]);
    }

    #[test]
    fn test_drop_outside_board_is_cancelled() {
        let mut app = app(Grid::EMPTY, ["dot", "dot", "dot"]);
        app.layout = Some(ScreenLayout {
            board: BoardGeometry {
                origin: (0, 0),
                cell_width: 2,
                cell_height: 1,
            },
            tray_pieces: [Some(Rect::new(0, 10, 2, 1)), None, None],
        });
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 0, 10);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 40, 40);
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 40, 40);
        assert_eq!(app.game.grid().filled_count(), 0);
        assert!(app.game.tray().get(0).is_some());
    }

    #[test]
    fn test_game_over_prompts_for_name() {
        let grid = Grid::from_ascii(
            "
            ..######
            #.######
            ##.#####
            ###.####
            ####.###
            #####.##
            ######.#
            #######.
            ",
        );
        let mut app = app(grid, ["dot", "square3", "square3"]);
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert!(app.game.phase().is_game_over());
        assert_eq!(app.name_prompt.as_deref(), Some(""));

        // q is part of the name while the prompt is open
        for c in "qa".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert!(!app.is_exiting);
        assert_eq!(app.name_prompt, None);
        assert_eq!(
            app.top_scores,
            vec![ScoreRecord {
                name: "q".into(),
                score: 10
            }]
        );

        press(&mut app, KeyCode::Char('r'));
        assert!(app.game.phase().is_playing());
        assert_eq!(app.status, None);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_exit());
    }

    #[test]
    fn test_blank_name_keeps_prompt_open() {
        let mut app = app(Grid::EMPTY, ["dot", "dot", "dot"]);
        app.name_prompt = Some(String::new());
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.name_prompt.as_deref(), Some(" "));
        assert!(app.status.as_deref().is_some_and(|s| s.contains("invalid player name")));
    }
}
