use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::IndexedRandom as _,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{CATALOG_LEN, Grid, Piece, PieceId, Shape};

use super::tray::{TRAY_SIZE, Tray};

/// Lines missing at most this many cells count as near-complete when dealing.
const NEAR_COMPLETE_MAX_MISSING: usize = 2;

/// Weight of a fitting shape that can complete a line when near-complete lines exist.
const LINE_COMPLETING_WEIGHT: u32 = 3;

/// How pieces are chosen when the tray is refilled.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant,
)]
pub enum Dealing {
    /// Biased towards shapes that fit the current grid.
    #[default]
    Smart,
    /// Uniform over the catalog.
    Random,
}

/// Seed for deterministic piece dealing.
///
/// A 128-bit seed for the dealer's random number generator. The same seed
/// combined with the same sequence of actions yields the same deals.
///
/// # Example
///
/// ```
/// use gridfit_engine::{PieceDealer, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = PieceDealer::with_seed(seed);
/// let mut b = PieceDealer::with_seed(seed);
/// assert_eq!(a.random_pieces(5), b.random_pieces(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    /// Parses a seed from 32 hexadecimal digits.
    pub fn from_hex(hex: &str) -> Result<Self, InvalidSeedError> {
        let invalid = || InvalidSeedError {
            input: hex.to_owned(),
        };
        if hex.len() != 32 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let num = u128::from_str_radix(hex, 16).map_err(|_| invalid())?;
        Ok(Self(num.to_be_bytes()))
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        let num = u128::from_be_bytes(self.0);
        let mut hex = String::with_capacity(2 * self.0.len());
        let _ = write!(&mut hex, "{num:032x}");
        hex
    }
}

/// A seed string that is not 32 hexadecimal digits.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: expected 32 hex digits")]
pub struct InvalidSeedError {
    input: String,
}

impl std::str::FromStr for PieceSeed {
    type Err = InvalidSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Deals pieces from the shape catalog.
///
/// Every dealt piece gets a fresh [`PieceId`]. Dealing never fails: when no
/// shape fits the grid, smart dealing falls back to uniform sampling and
/// leaves the game-over decision to the caller.
///
/// # Example
///
/// ```
/// use gridfit_engine::{Grid, PieceDealer};
///
/// let mut dealer = PieceDealer::new();
/// let pieces = dealer.smart_pieces(3, &Grid::EMPTY);
/// assert_eq!(pieces.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct PieceDealer {
    rng: Pcg32,
    next_id: u64,
}

impl Default for PieceDealer {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceDealer {
    /// Creates a dealer seeded from the thread-local generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic dealing.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            next_id: 0,
        }
    }

    fn instantiate(&mut self, shape: &'static Shape) -> Piece {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        Piece::new(id, shape)
    }

    fn uniform_shape(&mut self) -> &'static Shape {
        &Shape::catalog()[self.rng.random_range(0..CATALOG_LEN)]
    }

    /// Samples `n` pieces uniformly from the catalog, with replacement.
    pub fn random_pieces(&mut self, n: usize) -> Vec<Piece> {
        (0..n)
            .map(|_| {
                let shape = self.uniform_shape();
                self.instantiate(shape)
            })
            .collect()
    }

    /// Samples `n` pieces, preferring shapes that fit somewhere on `grid`.
    ///
    /// Each piece is drawn from the fitting shapes with probability
    /// `0.6 + 0.4 * density`, otherwise from the whole catalog. When the grid
    /// has nearly complete lines, fitting shapes able to complete a line are
    /// weighted higher. If nothing fits, sampling is uniform.
    pub fn smart_pieces(&mut self, n: usize, grid: &Grid) -> Vec<Piece> {
        let has_near_complete = !grid
            .near_complete_lines(NEAR_COMPLETE_MAX_MISSING)
            .is_empty();
        let fitting: Vec<(&'static Shape, u32)> = Shape::catalog()
            .iter()
            .filter(|shape| grid.can_piece_fit_anywhere(shape))
            .map(|shape| {
                let weight = if has_near_complete && grid.would_complete_line(shape) {
                    LINE_COMPLETING_WEIGHT
                } else {
                    1
                };
                (shape, weight)
            })
            .collect();
        let fit_probability = (0.6 + 0.4 * grid.density()).clamp(0.0, 1.0);

        (0..n)
            .map(|_| {
                let prefer_fitting = !fitting.is_empty() && self.rng.random_bool(fit_probability);
                let shape = if prefer_fitting {
                    match fitting.choose_weighted(&mut self.rng, |(_, weight)| *weight) {
                        Ok((shape, _)) => *shape,
                        Err(_) => self.uniform_shape(),
                    }
                } else {
                    self.uniform_shape()
                };
                self.instantiate(shape)
            })
            .collect()
    }

    /// Deals a full tray.
    pub fn deal(&mut self, dealing: Dealing, grid: &Grid) -> Tray {
        let pieces = match dealing {
            Dealing::Smart => self.smart_pieces(TRAY_SIZE, grid),
            Dealing::Random => self.random_pieces(TRAY_SIZE),
        };
        Tray::new(
            pieces
                .try_into()
                .expect("dealer should return one piece per tray slot"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(byte: u8) -> PieceSeed {
        PieceSeed::from_bytes([byte; 16])
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut dealer = PieceDealer::with_seed(seed(1));
        let mut pieces = dealer.random_pieces(4);
        pieces.extend(dealer.smart_pieces(4, &Grid::EMPTY));
        let ids: Vec<u64> = pieces.iter().map(|piece| piece.id().0).collect();
        assert_eq!(ids, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_deterministic_dealing() {
        let grid = Grid::from_ascii(
            "
            ######..
            ",
        );
        let mut a = PieceDealer::with_seed(seed(0x42));
        let mut b = PieceDealer::with_seed(seed(0x42));
        for _ in 0..20 {
            assert_eq!(a.smart_pieces(3, &grid), b.smart_pieces(3, &grid));
        }
    }

    #[test]
    fn test_smart_dealing_on_full_grid_still_deals() {
        let full = Grid::from_ascii(&"########\n".repeat(8));
        let mut dealer = PieceDealer::with_seed(seed(7));
        for _ in 0..10 {
            let pieces = dealer.smart_pieces(3, &full);
            assert_eq!(pieces.len(), 3);
            assert!(!full.can_any_piece_fit(pieces.iter().map(Piece::shape)));
        }
    }

    #[test]
    fn test_smart_dealing_prefers_fitting_shapes() {
        // only the dot and the vertical domino fit the holes
        let grid = Grid::from_ascii(
            "
            .#######
            .#######
            ########
            ########
            ########
            ########
            ########
            #######.
            ",
        );
        let mut dealer = PieceDealer::with_seed(seed(3));
        let pieces = dealer.smart_pieces(3000, &grid);
        let fitting = pieces
            .iter()
            .filter(|piece| grid.can_piece_fit_anywhere(piece.shape()))
            .count();
        // uniform sampling would give 2/37 of the pieces
        assert!(fitting > pieces.len() / 2, "only {fitting} fitting pieces");
    }

    #[test]
    fn test_deal_fills_tray() {
        let mut dealer = PieceDealer::with_seed(seed(9));
        for dealing in [Dealing::Smart, Dealing::Random] {
            let tray = dealer.deal(dealing, &Grid::EMPTY);
            assert_eq!(tray.remaining().len(), TRAY_SIZE);
        }
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_known_value_sequential_bytes() {
            let seed = PieceSeed::from_bytes([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(deserialized, seed);
        }

        #[test]
        fn test_parse_uppercase_hex() {
            let seed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(seed.to_hex(), "0123456789abcdeffedcba9876543210");
        }

        #[test]
        fn test_invalid_seeds() {
            for input in [
                "",
                "0123456789abcdef0123456789abcde",
                "0123456789abcdef0123456789abcdef0",
                "ghijklmnopqrstuvwxyzghijklmnopqr",
            ] {
                let err = PieceSeed::from_hex(input).unwrap_err();
                assert!(err.to_string().contains("invalid seed"), "{input}");
                let json = format!("\"{input}\"");
                assert!(serde_json::from_str::<PieceSeed>(&json).is_err(), "{input}");
            }
        }
    }
}
