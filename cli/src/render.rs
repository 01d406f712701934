use std::fmt::Write as _;

use monster_sweeper_core::{DisplayState, Grid};

/// Tile indices into the device sprite sheet.
pub mod sprite {
    /// `OPEN0..=OPEN8` occupy indices `0..=8`.
    pub const BLANK: u8 = 9;
    pub const FLAGGED: u8 = 11;
    pub const MISFLAGGED: u8 = 12;
    pub const QUESTION: u8 = 13;
    pub const MONSTER_BASE: u8 = 16;
    pub const MONSTER_DEATH_BASE: u8 = 20;
}

/// Sprite-sheet tile for a cell, the detonated monster drawn in red.
pub fn sprite_index(state: DisplayState, detonated: bool) -> u8 {
    use DisplayState::*;

    match state {
        Covered => sprite::BLANK,
        Questioned => sprite::QUESTION,
        Flagged => sprite::FLAGGED,
        MisflaggedMine => sprite::MISFLAGGED,
        RevealedNumber(count) => count,
        RevealedMine(variant) if detonated => sprite::MONSTER_DEATH_BASE + variant,
        RevealedMine(variant) => sprite::MONSTER_BASE + variant,
    }
}

pub fn glyph(state: DisplayState, detonated: bool) -> char {
    use DisplayState::*;

    match state {
        Covered => '#',
        Questioned => '?',
        Flagged => 'F',
        MisflaggedMine => 'X',
        RevealedNumber(0) => '.',
        RevealedNumber(count) => char::from(b'0' + count),
        RevealedMine(_) if detonated => '@',
        RevealedMine(_) => '*',
    }
}

/// Text picture of the board with column and row labels.
pub fn render_grid(grid: &Grid) -> String {
    let (width, _) = grid.size();
    let detonated = grid.detonated();
    let mut out = String::from("   ");
    for x in 0..width {
        let _ = write!(out, "{}", x % 10);
    }

    let mut row = None;
    for ((x, y), state) in grid.iter_cells() {
        if row != Some(y) {
            row = Some(y);
            let _ = write!(out, "\n{y:>2} ");
        }
        out.push(glyph(state, detonated == Some((x, y))));
    }
    out.push('\n');
    let _ = write!(out, "mines left: {}", grid.mines_left());
    out
}

/// Sprite indices laid out row by row, as the device tile grid would hold them.
pub fn sprite_rows(grid: &Grid) -> Vec<Vec<u8>> {
    let (width, height) = grid.size();
    let detonated = grid.detonated();
    let mut rows = vec![Vec::with_capacity(usize::from(width)); usize::from(height)];
    for (coords, state) in grid.iter_cells() {
        rows[usize::from(coords.1)].push(sprite_index(state, detonated == Some(coords)));
    }
    rows
}
