use serde::{Deserialize, Serialize};

use crate::core::{CellSet, CompletedLines, Grid};

use super::{
    game_stats::{GameStats, ScoreDelta},
    piece_dealer::{Dealing, PieceDealer, PieceSeed},
    tray::Tray,
};

/// Phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum Phase {
    /// Waiting for a placement.
    Playing,
    /// Completed lines were scored and are waiting for [`Action::FinishClear`].
    Clearing,
    /// No piece in the tray fits. Only [`Action::Reset`] leaves this phase.
    GameOver,
}

/// When completed lines are removed from the grid.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum ClearMode {
    /// Lines are removed on a separate [`Action::FinishClear`], so the caller
    /// can animate them in between.
    #[default]
    Deferred,
    /// Lines are removed as part of the placement.
    Immediate,
}

/// Settings fixed for the lifetime of a [`GameState`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameConfig {
    pub dealing: Dealing,
    pub clear_mode: ClearMode,
    /// Seed for the piece dealer; `None` seeds from the thread-local generator.
    pub seed: Option<PieceSeed>,
}

/// Input to [`GameState::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Places the piece in tray slot `slot` with its origin at `(row, col)`.
    PlacePiece { slot: usize, row: i32, col: i32 },
    /// Removes the lines completed by the last placement.
    FinishClear,
    /// Forgets which cells were just placed.
    ClearPlacedHighlight,
    /// Starts a new game.
    Reset,
}

/// Read-only view of everything a [`GameState`] shows to its readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub grid: Grid,
    pub tray: Tray,
    pub stats: GameStats,
    pub phase: Phase,
    pub clearing_cells: CellSet,
    pub just_placed_cells: CellSet,
    pub last_delta: ScoreDelta,
}

/// The authoritative state of one game.
///
/// All changes go through [`dispatch`](Self::dispatch). Actions that are not
/// legal in the current state (empty or out-of-range slot, blocked or
/// out-of-bounds placement, wrong phase) are ignored and leave the state
/// untouched.
///
/// `clearing_cells`, `just_placed_cells` and `last_delta` are presentation
/// hints; nothing in the game logic reads them.
///
/// # Example
///
/// ```
/// use gridfit_engine::{Action, GameConfig, GameState, Phase};
///
/// let mut game = GameState::new(GameConfig::default());
/// let (row, col) = game.legal_placements(0)[0];
///
/// assert!(game.dispatch(Action::PlacePiece { slot: 0, row, col }));
/// assert!(game.tray().get(0).is_none());
/// assert!(game.score() > 0);
///
/// // the slot is consumed, so placing it again is ignored
/// assert!(!game.dispatch(Action::PlacePiece { slot: 0, row, col }));
/// ```
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    dealer: PieceDealer,
    grid: Grid,
    tray: Tray,
    stats: GameStats,
    phase: Phase,
    pending_clear: CompletedLines,
    clearing_cells: CellSet,
    just_placed_cells: CellSet,
    last_delta: ScoreDelta,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl GameState {
    /// Starts a game on an empty grid with a freshly dealt tray.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let mut dealer = config.seed.map_or_else(PieceDealer::new, PieceDealer::with_seed);
        let tray = dealer.deal(config.dealing, &Grid::EMPTY);
        Self::with_dealer(config, dealer, Grid::EMPTY, tray)
    }

    /// Starts a game from an arbitrary position.
    ///
    /// An empty tray is refilled right away. The phase is [`Phase::GameOver`]
    /// if no piece of the tray fits, [`Phase::Playing`] otherwise. Completed
    /// lines already present in `grid` are left as they are.
    #[must_use]
    pub fn from_position(config: GameConfig, grid: Grid, tray: Tray) -> Self {
        let dealer = config.seed.map_or_else(PieceDealer::new, PieceDealer::with_seed);
        Self::with_dealer(config, dealer, grid, tray)
    }

    fn with_dealer(config: GameConfig, dealer: PieceDealer, grid: Grid, tray: Tray) -> Self {
        let mut this = Self {
            config,
            dealer,
            grid,
            tray,
            stats: GameStats::new(),
            phase: Phase::Playing,
            pending_clear: CompletedLines::NONE,
            clearing_cells: CellSet::EMPTY,
            just_placed_cells: CellSet::EMPTY,
            last_delta: ScoreDelta::default(),
        };
        this.refill_and_check();
        this
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn tray(&self) -> &Tray {
        &self.tray
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.stats.score()
    }

    #[must_use]
    pub fn streak(&self) -> u32 {
        self.stats.streak()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Lines scored by the last placement and not yet removed.
    #[must_use]
    pub fn pending_clear(&self) -> CompletedLines {
        self.pending_clear
    }

    #[must_use]
    pub fn clearing_cells(&self) -> CellSet {
        self.clearing_cells
    }

    #[must_use]
    pub fn just_placed_cells(&self) -> CellSet {
        self.just_placed_cells
    }

    #[must_use]
    pub fn last_delta(&self) -> ScoreDelta {
        self.last_delta
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.grid.clone(),
            tray: self.tray,
            stats: self.stats.clone(),
            phase: self.phase,
            clearing_cells: self.clearing_cells,
            just_placed_cells: self.just_placed_cells,
            last_delta: self.last_delta,
        }
    }

    /// Every `(row, col)` at which the piece in `slot` can be placed right now.
    ///
    /// Empty unless the phase is [`Phase::Playing`].
    #[must_use]
    pub fn legal_placements(&self, slot: usize) -> Vec<(i32, i32)> {
        if !self.phase.is_playing() {
            return vec![];
        }
        self.tray
            .get(slot)
            .map(|piece| self.grid.placements(piece.shape()).collect())
            .unwrap_or_default()
    }

    /// Applies an action.
    ///
    /// Returns `false` if the action was ignored because it is not legal in
    /// the current state; the state is then unchanged.
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::PlacePiece { slot, row, col } => self.place_piece(slot, row, col),
            Action::FinishClear => self.finish_clear(),
            Action::ClearPlacedHighlight => self.clear_placed_highlight(),
            Action::Reset => {
                self.reset();
                true
            }
        }
    }

    fn place_piece(&mut self, slot: usize, row: i32, col: i32) -> bool {
        if !self.phase.is_playing() {
            return false;
        }
        let Some(piece) = self.tray.get(slot) else {
            return false;
        };
        let shape = piece.shape();
        if !self.grid.can_place(shape, row, col) {
            return false;
        }

        self.tray.take(slot);
        self.grid = self.grid.place_piece(shape, row, col);
        self.just_placed_cells = Grid::covered_cells(shape, row, col);

        let lines = self.grid.find_completed_lines();
        self.last_delta =
            self.stats
                .record_placement(shape.len(), lines.row_count(), lines.col_count());
        self.clearing_cells = lines.cells();

        if lines.is_empty() {
            self.refill_and_check();
            return true;
        }

        match self.config.clear_mode {
            ClearMode::Deferred => {
                self.pending_clear = lines;
                self.phase = Phase::Clearing;
            }
            ClearMode::Immediate => {
                self.grid = self.grid.clear_lines(lines);
                self.refill_and_check();
            }
        }
        true
    }

    fn finish_clear(&mut self) -> bool {
        if !self.phase.is_clearing() {
            return false;
        }
        self.grid = self.grid.clear_lines(self.pending_clear);
        self.pending_clear = CompletedLines::NONE;
        self.clearing_cells = CellSet::EMPTY;
        self.refill_and_check();
        true
    }

    fn clear_placed_highlight(&mut self) -> bool {
        if self.just_placed_cells.is_empty() {
            return false;
        }
        self.just_placed_cells = CellSet::EMPTY;
        true
    }

    fn reset(&mut self) {
        let tray = self.dealer.deal(self.config.dealing, &Grid::EMPTY);
        let dealer = self.dealer.clone();
        *self = Self::with_dealer(self.config, dealer, Grid::EMPTY, tray);
    }

    /// Deals a new batch if every slot is consumed, then ends the game if
    /// nothing in the tray fits.
    fn refill_and_check(&mut self) {
        if self.tray.is_empty() {
            self.tray = self.dealer.deal(self.config.dealing, &self.grid);
        }
        self.phase = if self.grid.can_any_piece_fit(self.tray.shapes()) {
            Phase::Playing
        } else {
            Phase::GameOver
        };
    }
}
