use serde::{Deserialize, Serialize};

/// Hidden ground truth of a cell, fixed once the board is seeded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellContent {
    /// No monster here, with the number of monsters among the adjacent cells.
    Empty(u8),
    /// A monster, drawn with the given sprite variant.
    Mine(u8),
}

impl CellContent {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine(_))
    }

    /// The display state this content shows once uncovered.
    pub const fn revealed(self) -> DisplayState {
        match self {
            Self::Empty(count) => DisplayState::RevealedNumber(count),
            Self::Mine(variant) => DisplayState::RevealedMine(variant),
        }
    }
}

impl Default for CellContent {
    fn default() -> Self {
        Self::Empty(0)
    }
}

/// Player-visible state of a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayState {
    Covered,
    Questioned,
    Flagged,
    RevealedNumber(u8),
    RevealedMine(u8),
    /// A flag that turned out to sit on a cell without a monster.
    MisflaggedMine,
}

impl DisplayState {
    /// Cells the player has not committed on yet; the board cannot be judged while any remain.
    pub const fn is_undecided(self) -> bool {
        matches!(self, Self::Covered | Self::Questioned)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(
            self,
            Self::RevealedNumber(_) | Self::RevealedMine(_) | Self::MisflaggedMine
        )
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::Covered
    }
}
