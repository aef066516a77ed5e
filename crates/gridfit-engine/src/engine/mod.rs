//! Game rules and state management.
//!
//! This module builds the gameplay on top of the [`core`](crate::core) value
//! types:
//!
//! - [`GameState`] - The state machine driven by [`Action`]s
//! - [`GameStats`] - Score, clear streak and placement counters
//! - [`PieceDealer`] - Smart and uniform piece dealing, seeded by [`PieceSeed`]
//! - [`Tray`] - The three slots of dealt pieces
//! - [`ScoreStore`] - The leaderboard contract implemented by front ends
//! - [`BoardGeometry`], [`Drag`] and [`ghost_preview`] - Pointer input mapping
//!
//! # Game Flow
//!
//! 1. [`GameState::new`] deals three pieces onto an empty grid
//! 2. [`Action::PlacePiece`] drops a piece and scores it
//! 3. If lines were completed the phase becomes [`Phase::Clearing`] until
//!    [`Action::FinishClear`] removes them
//! 4. Once all three slots are used, a new batch is dealt
//! 5. When no piece in the tray fits, the phase becomes [`Phase::GameOver`]
//!
//! # Example
//!
//! ```
//! use gridfit_engine::{Action, GameConfig, GameState};
//!
//! let mut game = GameState::new(GameConfig::default());
//!
//! while !game.phase().is_game_over() && game.stats().placed_pieces() < 10 {
//!     if game.phase().is_clearing() {
//!         game.dispatch(Action::FinishClear);
//!         continue;
//!     }
//!     let (slot, (row, col)) = (0..3)
//!         .find_map(|slot| Some((slot, *game.legal_placements(slot).first()?)))
//!         .expect("a playing game has a legal placement");
//!     game.dispatch(Action::PlacePiece { slot, row, col });
//! }
//! ```

pub use self::{
    game_state::*, game_stats::*, interaction::*, leaderboard::*, piece_dealer::*, scoring::*,
    tray::*,
};

mod game_state;
mod game_stats;
mod interaction;
mod leaderboard;
mod piece_dealer;
mod scoring;
mod tray;
