use alloc::vec;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

/// A game board: the hidden layout plus what the player currently sees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    config: GameConfig,
    layout: MineLayout,
    display: Array2<DisplayState>,
    detonated: Option<Coord2>,
}

impl Grid {
    /// Seeds a fresh board.
    pub fn new<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<Self> {
        let layout = RandomLayoutGenerator::new(rng).generate(config)?;
        Ok(Self::with_config(config, layout))
    }

    /// Wraps a hand-built layout, `config()` then reports the variants the layout actually uses.
    pub fn from_layout(layout: MineLayout) -> Self {
        Self::with_config(layout.game_config(), layout)
    }

    fn with_config(config: GameConfig, layout: MineLayout) -> Self {
        let size = layout.size();
        Self {
            config,
            layout,
            display: Array2::default(size.to_nd_index()),
            detonated: None,
        }
    }

    /// Covers every cell and reseeds the board. On error the current board is left as it was.
    pub fn reset<R: Rng + ?Sized>(&mut self, config: GameConfig, rng: &mut R) -> Result<()> {
        *self = Self::new(config, rng)?;
        Ok(())
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<DisplayState> {
        let coords = self.layout.validate_coords(coords)?;
        Ok(self.display[coords.to_nd_index()])
    }

    pub fn content_at(&self, coords: Coord2) -> Result<CellContent> {
        let coords = self.layout.validate_coords(coords)?;
        Ok(self.layout[coords])
    }

    /// Row-major iteration over every cell's display state.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, DisplayState)> + '_ {
        iter_coords(self.size()).map(move |coords| (coords, self.display[coords.to_nd_index()]))
    }

    /// The mine that ended the game, if one was uncovered.
    pub fn detonated(&self) -> Option<Coord2> {
        self.detonated
    }

    pub fn flag_count(&self) -> CellCount {
        self.count_cells(|state| state == DisplayState::Flagged)
    }

    /// Cells still covered or questioned.
    pub fn covered_count(&self) -> CellCount {
        self.count_cells(DisplayState::is_undecided)
    }

    /// How many mines have not been flagged yet
    pub fn mines_left(&self) -> isize {
        self.layout.mine_count() as isize - self.flag_count() as isize
    }

    /// Advances the mark cycle `Covered -> Questioned -> Flagged`, the next toggle on a flag
    /// attempts a reveal. Revealed cells are left untouched.
    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<ToggleOutcome> {
        use DisplayState::*;

        let coords = self.layout.validate_coords(coords)?;

        let current = self.display[coords.to_nd_index()];
        let next = match current {
            Covered => Questioned,
            Questioned => Flagged,
            Flagged => return self.attempt_reveal(coords).map(ToggleOutcome::Revealed),
            state @ (RevealedNumber(_) | RevealedMine(_) | MisflaggedMine) => {
                log::trace!("Ignoring toggle on {:?} at {:?}", state, coords);
                return Ok(ToggleOutcome::NoChange(state));
            }
        };
        self.display[coords.to_nd_index()] = next;
        log::debug!("Marked {:?} as {:?}", coords, next);
        Ok(ToggleOutcome::Marked(next))
    }

    /// Uncovers a cell, expanding through connected zero cells.
    pub fn attempt_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.layout.validate_coords(coords)?;

        if self.display[coords.to_nd_index()].is_revealed() {
            return Ok(RevealOutcome::NoChange);
        }

        Ok(match self.layout[coords] {
            CellContent::Mine(variant) => {
                self.display[coords.to_nd_index()] = DisplayState::RevealedMine(variant);
                self.detonated = Some(coords);
                log::debug!("Detonated mine at {:?}", coords);
                RevealOutcome::GameLost
            }
            CellContent::Empty(0) => {
                // expansion only opens covered cells, the origin included
                self.display[coords.to_nd_index()] = DisplayState::Covered;
                let revealed = self.expand_uncovered(coords);
                log::debug!("Revealed {} cells from {:?}", revealed, coords);
                RevealOutcome::Continue { revealed }
            }
            CellContent::Empty(count) => {
                self.display[coords.to_nd_index()] = DisplayState::RevealedNumber(count);
                log::debug!("Revealed {:?}, adjacent mines: {}", coords, count);
                RevealOutcome::Continue { revealed: 1 }
            }
        })
    }

    fn expand_uncovered(&mut self, origin: Coord2) -> CellCount {
        let mut revealed = 0;
        let mut stack = vec![origin];

        while let Some(coords) = stack.pop() {
            if self.display[coords.to_nd_index()] != DisplayState::Covered {
                continue;
            }
            let CellContent::Empty(count) = self.layout[coords] else {
                log::warn!("Flood expansion reached a mine at {:?}", coords);
                continue;
            };

            self.display[coords.to_nd_index()] = DisplayState::RevealedNumber(count);
            revealed += 1;
            log::trace!("Flood opened {:?}, adjacent mines: {}", coords, count);

            if count == 0 {
                stack.extend(self.layout.iter_neighbors(coords));
            }
        }

        revealed
    }

    /// Judges the board once nothing is left covered or questioned.
    pub fn check_win_loss(&self) -> GameOutcome {
        if self.display.iter().any(|state| state.is_undecided()) {
            return GameOutcome::Undecided;
        }

        let misflagged = self
            .display
            .iter()
            .zip(self.layout.cells().iter())
            .any(|(&state, content)| state == DisplayState::Flagged && !content.is_mine());

        if misflagged {
            GameOutcome::Lost
        } else {
            GameOutcome::Won
        }
    }

    /// Shows every cell's content for the end-of-game screen, marking flags placed on safe cells.
    pub fn mark_misflags(&mut self) {
        use DisplayState::*;

        for coords in iter_coords(self.size()) {
            let content = self.layout[coords];
            let cell = &mut self.display[coords.to_nd_index()];
            *cell = match (*cell, content) {
                (Flagged | MisflaggedMine, CellContent::Empty(_)) => MisflaggedMine,
                _ => content.revealed(),
            };
        }
    }

    fn count_cells(&self, pred: impl Fn(DisplayState) -> bool) -> CellCount {
        self.display.iter().filter(|&&state| pred(state)).count() as CellCount
    }
}
