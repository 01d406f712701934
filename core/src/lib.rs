#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
    /// Number of monster sprites a mine can be drawn with.
    pub variants: u8,
}

impl GameConfig {
    pub const DEFAULT_SIZE: Coord2 = (10, 7);
    pub const DEFAULT_MINES: CellCount = 10;
    pub const DEFAULT_VARIANTS: u8 = 4;
    /// Monster sprites available on the sheet; variants index into `0..MAX_VARIANTS`.
    pub const MAX_VARIANTS: u8 = 4;

    pub const DEFAULT: Self = Self::new(Self::DEFAULT_SIZE, Self::DEFAULT_MINES);

    pub const fn new(size: Coord2, mines: CellCount) -> Self {
        Self {
            size,
            mines,
            variants: Self::DEFAULT_VARIANTS,
        }
    }

    pub const fn with_variants(self, variants: u8) -> Self {
        Self { variants, ..self }
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    /// Checks the configuration leaves at least one safe cell on a non-empty board.
    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidConfiguration("board must not be empty"));
        }
        if self.mines >= self.total_cells() {
            return Err(GameError::InvalidConfiguration(
                "mine count must be lower than the cell count",
            ));
        }
        if self.variants == 0 {
            return Err(GameError::InvalidConfiguration(
                "at least one mine variant is required",
            ));
        }
        if self.variants > Self::MAX_VARIANTS {
            return Err(GameError::InvalidConfiguration(
                "more mine variants than monster sprites",
            ));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Hidden layer of the board: every cell's content with adjacency counts already computed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    cells: Array2<CellContent>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Builds the content layer from a mask of mine variants, filling in adjacency counts.
    pub(crate) fn from_mine_mask(mine_mask: &Array2<Option<u8>>) -> Self {
        let dim = mine_mask.dim();
        let size: Coord2 = (dim.0 as Coord, dim.1 as Coord);
        let mut cells: Array2<CellContent> = Array2::default(dim);
        let mut mine_count = 0;

        for coords in iter_coords(size) {
            cells[coords.to_nd_index()] = match mine_mask[coords.to_nd_index()] {
                Some(variant) => {
                    mine_count += 1;
                    CellContent::Mine(variant)
                }
                None => {
                    let count = Neighbors::new(coords, size)
                        .filter(|pos| mine_mask[pos.to_nd_index()].is_some())
                        .count();
                    CellContent::Empty(count as u8)
                }
            };
        }

        Self { cells, mine_count }
    }

    /// Places mines by hand, each as `(coords, variant)`.
    pub fn from_mines(size: Coord2, mines: &[(Coord2, u8)]) -> Result<Self> {
        GameConfig::new(size, mines.len() as CellCount).validate()?;

        let mut mine_mask: Array2<Option<u8>> = Array2::default(size.to_nd_index());
        for &(coords, variant) in mines {
            if !in_bounds(coords, size) {
                return Err(GameError::OutOfBounds);
            }
            if variant >= GameConfig::MAX_VARIANTS {
                return Err(GameError::InvalidConfiguration(
                    "mine variant outside the sprite palette",
                ));
            }
            let slot = &mut mine_mask[coords.to_nd_index()];
            if slot.is_some() {
                return Err(GameError::InvalidConfiguration("two mines on the same cell"));
            }
            *slot = Some(variant);
        }

        Ok(Self::from_mine_mask(&mine_mask))
    }

    /// Configuration this layout satisfies, with `variants` covering the highest variant placed.
    pub fn game_config(&self) -> GameConfig {
        let variants = self
            .cells
            .iter()
            .filter_map(|content| match content {
                CellContent::Mine(variant) => Some(variant + 1),
                CellContent::Empty(_) => None,
            })
            .max()
            .unwrap_or(1);
        GameConfig::new(self.size(), self.mine_count).with_variants(variants)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.size()) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords].is_mine()
    }

    pub(crate) fn cells(&self) -> &Array2<CellContent> {
        &self.cells
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> Neighbors {
        Neighbors::new(coords, self.size())
    }
}

impl Index<Coord2> for MineLayout {
    type Output = CellContent;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

/// Outcome of a reveal attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The cell was already uncovered.
    NoChange,
    /// A safe cell was uncovered, `revealed` counts it plus any flood-expanded cells.
    Continue { revealed: CellCount },
    /// A monster was uncovered.
    GameLost,
}

impl RevealOutcome {
    /// False only when the cell was already uncovered and nothing changed.
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn is_lost(self) -> bool {
        matches!(self, Self::GameLost)
    }
}

/// Outcome of toggling the mark on a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The cell could not be toggled, carries its unchanged state.
    NoChange(DisplayState),
    /// The cell moved to a new marking.
    Marked(DisplayState),
    /// The toggle went past the flag and attempted a reveal.
    Revealed(RevealOutcome),
}

impl ToggleOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange(_) => false,
            Self::Marked(_) => true,
            Self::Revealed(outcome) => outcome.has_update(),
        }
    }

    pub const fn is_lost(self) -> bool {
        matches!(self, Self::Revealed(RevealOutcome::GameLost))
    }
}

/// Verdict over the whole board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Some cells are still covered or questioned.
    Undecided,
    Won,
    /// Everything is decided but at least one flag sits on a safe cell.
    Lost,
}

impl GameOutcome {
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Undecided)
    }
}
