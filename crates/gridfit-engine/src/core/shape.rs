use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fill color of a shape, and of the grid cells it leaves behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceColor {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Pink,
}

impl PieceColor {
    pub const ALL: [Self; 8] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Cyan,
        Self::Blue,
        Self::Purple,
        Self::Pink,
    ];

    /// Returns the single character used in ASCII grid representations.
    ///
    /// ```
    /// use gridfit_engine::PieceColor;
    ///
    /// assert_eq!(PieceColor::Red.as_char(), 'R');
    /// assert_eq!(PieceColor::Pink.as_char(), 'K');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Red => 'R',
            Self::Orange => 'O',
            Self::Yellow => 'Y',
            Self::Green => 'G',
            Self::Cyan => 'C',
            Self::Blue => 'B',
            Self::Purple => 'P',
            Self::Pink => 'K',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'R' => Some(Self::Red),
            'O' => Some(Self::Orange),
            'Y' => Some(Self::Yellow),
            'G' => Some(Self::Green),
            'C' => Some(Self::Cyan),
            'B' => Some(Self::Blue),
            'P' => Some(Self::Purple),
            'K' => Some(Self::Pink),
            _ => None,
        }
    }
}

/// An immutable polyomino template from the catalog.
///
/// Cells are `(row, col)` offsets from the shape origin; the topmost row of
/// every shape is row 0 and the leftmost column is column 0. Rotations are
/// separate catalog entries, there is no runtime rotation.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    id: &'static str,
    cells: &'static [(u8, u8)],
    color: PieceColor,
}

impl Shape {
    const fn new(id: &'static str, cells: &'static [(u8, u8)], color: PieceColor) -> Self {
        Self { id, cells, color }
    }

    /// Returns the whole shape catalog.
    #[must_use]
    pub fn catalog() -> &'static [Shape] {
        &CATALOG
    }

    /// Looks up a catalog entry by its identifier.
    ///
    /// ```
    /// use gridfit_engine::Shape;
    ///
    /// let shape = Shape::by_id("square2").unwrap();
    /// assert_eq!(shape.len(), 4);
    /// assert!(Shape::by_id("heptomino").is_none());
    /// ```
    #[must_use]
    pub fn by_id(id: &str) -> Option<&'static Shape> {
        CATALOG.iter().find(|shape| shape.id == id)
    }

    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.id
    }

    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.color
    }

    /// Number of occupied cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates the occupied `(row, col)` offsets.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .map(|&(row, col)| (usize::from(row), usize::from(col)))
    }

    /// Number of rows spanned by the shape.
    #[must_use]
    pub fn height(&self) -> usize {
        self.cells().map(|(row, _)| row + 1).max().unwrap_or(0)
    }

    /// Number of columns spanned by the shape.
    #[must_use]
    pub fn width(&self) -> usize {
        self.cells().map(|(_, col)| col + 1).max().unwrap_or(0)
    }
}

impl Serialize for Shape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.id)
    }
}

impl<'de> Deserialize<'de> for &'static Shape {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = String::deserialize(deserializer)?;
        Shape::by_id(&id).ok_or_else(|| serde::de::Error::custom(format!("unknown shape: {id}")))
    }
}

/// Per-instance identifier of a dealt piece.
///
/// Only used to key pieces in a user interface; it has no gameplay meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u64);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A shape dealt into the tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    shape: &'static Shape,
}

impl Piece {
    #[must_use]
    pub const fn new(id: PieceId, shape: &'static Shape) -> Self {
        Self { id, shape }
    }

    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    #[must_use]
    pub const fn shape(&self) -> &'static Shape {
        self.shape
    }

    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.shape.color
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.shape.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.shape.is_empty()
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.shape.cells()
    }
}

/// Number of entries in the catalog.
pub const CATALOG_LEN: usize = 37;

static CATALOG: [Shape; CATALOG_LEN] = {
    use PieceColor::{Blue, Cyan, Green, Orange, Pink, Purple, Red, Yellow};
    [
        Shape::new("dot", &[(0, 0)], Yellow),
        // straight lines
        Shape::new("line2_h", &[(0, 0), (0, 1)], Orange),
        Shape::new("line2_v", &[(0, 0), (1, 0)], Orange),
        Shape::new("line3_h", &[(0, 0), (0, 1), (0, 2)], Green),
        Shape::new("line3_v", &[(0, 0), (1, 0), (2, 0)], Green),
        Shape::new("line4_h", &[(0, 0), (0, 1), (0, 2), (0, 3)], Cyan),
        Shape::new("line4_v", &[(0, 0), (1, 0), (2, 0), (3, 0)], Cyan),
        Shape::new("line5_h", &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)], Blue),
        Shape::new("line5_v", &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)], Blue),
        // squares and rectangles
        Shape::new("square2", &[(0, 0), (0, 1), (1, 0), (1, 1)], Yellow),
        Shape::new(
            "square3",
            &[
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 1),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2),
            ],
            Purple,
        ),
        Shape::new(
            "rect2x3",
            &[(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)],
            Pink,
        ),
        Shape::new(
            "rect3x2",
            &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)],
            Pink,
        ),
        // small corners
        Shape::new("corner_a", &[(0, 0), (1, 0), (1, 1)], Red),
        Shape::new("corner_b", &[(0, 0), (0, 1), (1, 0)], Red),
        Shape::new("corner_c", &[(0, 0), (0, 1), (1, 1)], Red),
        Shape::new("corner_d", &[(0, 1), (1, 0), (1, 1)], Red),
        // L tetrominoes
        Shape::new("l_0", &[(0, 0), (1, 0), (2, 0), (2, 1)], Orange),
        Shape::new("l_90", &[(0, 0), (0, 1), (0, 2), (1, 0)], Orange),
        Shape::new("l_180", &[(0, 0), (0, 1), (1, 1), (2, 1)], Orange),
        Shape::new("l_270", &[(0, 2), (1, 0), (1, 1), (1, 2)], Orange),
        // J tetrominoes
        Shape::new("j_0", &[(0, 1), (1, 1), (2, 0), (2, 1)], Blue),
        Shape::new("j_90", &[(0, 0), (1, 0), (1, 1), (1, 2)], Blue),
        Shape::new("j_180", &[(0, 0), (0, 1), (1, 0), (2, 0)], Blue),
        Shape::new("j_270", &[(0, 0), (0, 1), (0, 2), (1, 2)], Blue),
        // T tetrominoes
        Shape::new("t_down", &[(0, 0), (0, 1), (0, 2), (1, 1)], Purple),
        Shape::new("t_up", &[(0, 1), (1, 0), (1, 1), (1, 2)], Purple),
        Shape::new("t_right", &[(0, 0), (1, 0), (1, 1), (2, 0)], Purple),
        Shape::new("t_left", &[(0, 1), (1, 0), (1, 1), (2, 1)], Purple),
        // S and Z tetrominoes
        Shape::new("s_h", &[(0, 1), (0, 2), (1, 0), (1, 1)], Green),
        Shape::new("s_v", &[(0, 0), (1, 0), (1, 1), (2, 1)], Green),
        Shape::new("z_h", &[(0, 0), (0, 1), (1, 1), (1, 2)], Red),
        Shape::new("z_v", &[(0, 1), (1, 0), (1, 1), (2, 0)], Red),
        // big corners
        Shape::new(
            "big_l_0",
            &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)],
            Cyan,
        ),
        Shape::new(
            "big_l_90",
            &[(0, 0), (0, 1), (0, 2), (1, 0), (2, 0)],
            Cyan,
        ),
        Shape::new(
            "big_l_180",
            &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)],
            Cyan,
        ),
        Shape::new(
            "big_l_270",
            &[(0, 2), (1, 2), (2, 0), (2, 1), (2, 2)],
            Cyan,
        ),
    ]
};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<_> = Shape::catalog().iter().map(Shape::id).collect();
        assert_eq!(ids.len(), CATALOG_LEN);
    }

    #[test]
    fn test_catalog_cells_are_unique_and_anchored() {
        for shape in Shape::catalog() {
            let cells: HashSet<_> = shape.cells().collect();
            assert_eq!(cells.len(), shape.len(), "{} has duplicate cells", shape.id());
            assert!(
                cells.iter().any(|&(row, _)| row == 0),
                "{} does not start at row 0",
                shape.id()
            );
            assert!(
                cells.iter().any(|&(_, col)| col == 0),
                "{} does not start at column 0",
                shape.id()
            );
        }
    }

    #[test]
    fn test_catalog_sizes() {
        let sizes: HashSet<_> = Shape::catalog().iter().map(Shape::len).collect();
        let expected: HashSet<_> = [1, 2, 3, 4, 5, 6, 9].into_iter().collect();
        assert_eq!(sizes, expected);
        assert!(Shape::catalog().iter().all(|shape| shape.len() <= 9));
    }

    #[test]
    fn test_rotations_are_distinct_entries() {
        let l_shapes: Vec<_> = ["l_0", "l_90", "l_180", "l_270"]
            .iter()
            .map(|id| Shape::by_id(id).unwrap())
            .collect();
        for (i, a) in l_shapes.iter().enumerate() {
            for b in &l_shapes[i + 1..] {
                let a_cells: HashSet<_> = a.cells().collect();
                let b_cells: HashSet<_> = b.cells().collect();
                assert_ne!(a_cells, b_cells, "{} equals {}", a.id(), b.id());
            }
        }
    }

    #[test]
    fn test_dimensions() {
        let shape = Shape::by_id("rect2x3").unwrap();
        assert_eq!((shape.height(), shape.width()), (2, 3));
        let shape = Shape::by_id("line5_v").unwrap();
        assert_eq!((shape.height(), shape.width()), (5, 1));
    }

    #[test]
    fn test_color_char_roundtrip() {
        for color in PieceColor::ALL {
            assert_eq!(PieceColor::from_char(color.as_char()), Some(color));
        }
        assert_eq!(PieceColor::from_char('.'), None);
    }

    #[test]
    fn test_piece_serialization() {
        let piece = Piece::new(PieceId(7), Shape::by_id("t_up").unwrap());
        let json = serde_json::to_string(&piece).unwrap();
        assert_eq!(json, r#"{"id":7,"shape":"t_up"}"#);
        let back: Piece = serde_json::from_str(&json).unwrap();
        assert_eq!(back, piece);

        let result: Result<Piece, _> = serde_json::from_str(r#"{"id":1,"shape":"blob"}"#);
        assert!(result.unwrap_err().to_string().contains("unknown shape"));
    }
}
