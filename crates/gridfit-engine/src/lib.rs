//! Block-placement puzzle engine.
//!
//! Pieces are dealt three at a time into a tray and dropped onto an 8×8 grid.
//! Completed rows and columns are cleared and scored; the game ends when no
//! piece left in the tray fits anywhere on the grid.
//!
//! - [`core`] holds the value types: [`Grid`], [`CellSet`], [`Shape`] and the
//!   static shape catalog.
//! - [`engine`] holds the rules: scoring, piece dealing, the [`GameState`]
//!   state machine, the score-store contract and pointer-to-cell mapping.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
