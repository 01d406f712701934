use monster_sweeper_core::{Coord, Coord2};

/// Side of a square sprite tile, in screen pixels.
pub const TILE_PIX_SIZE: u32 = 32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A tap already resolved to a cell.
    Tap(Coord2),
    /// A raw touch sample in screen pixels, repeated for as long as the finger is down.
    Touch(u32, u32),
    Release,
    Quit,
}

/// Parses one line of player input.
///
/// Accepted forms: `x y` taps a cell, `t px py` is a touch sample, `r` releases and `q` quits.
/// Blank lines and anything unparsable yield `None`.
pub fn parse_line(line: &str) -> Option<InputEvent> {
    let mut words = line.split_whitespace();
    let first = words.next()?;
    let event = match first {
        "q" | "quit" => InputEvent::Quit,
        "r" | "release" => InputEvent::Release,
        "t" | "touch" => {
            let px = words.next()?.parse().ok()?;
            let py = words.next()?.parse().ok()?;
            InputEvent::Touch(px, py)
        }
        x => {
            let x = x.parse().ok()?;
            let y = words.next()?.parse().ok()?;
            InputEvent::Tap((x, y))
        }
    };
    if words.next().is_some() {
        return None;
    }
    Some(event)
}

/// Maps a pixel position to the tile under it, clamped into the board.
pub fn pixel_to_cell((px, py): (u32, u32), size: Coord2) -> Coord2 {
    let clamp = |pixel: u32, len: Coord| {
        let cell = pixel / TILE_PIX_SIZE;
        cell.min(u32::from(len.saturating_sub(1))) as Coord
    };
    (clamp(px, size.0), clamp(py, size.1))
}

/// Turns a held touch into a single tap, waiting for a release before the next one.
#[derive(Debug, Default)]
pub struct TouchDebouncer {
    waiting_for_release: bool,
}

impl TouchDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one event, returning the cell tap it stands for, if any.
    pub fn feed(&mut self, event: InputEvent, size: Coord2) -> Option<Coord2> {
        match event {
            InputEvent::Tap(coords) => Some(coords),
            InputEvent::Touch(px, py) => {
                if self.waiting_for_release {
                    log::trace!("Touch still held at ({}, {}), ignored", px, py);
                    return None;
                }
                self.waiting_for_release = true;
                Some(pixel_to_cell((px, py), size))
            }
            InputEvent::Release => {
                self.waiting_for_release = false;
                None
            }
            InputEvent::Quit => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_forms() {
        assert_eq!(parse_line("3 4"), Some(InputEvent::Tap((3, 4))));
        assert_eq!(parse_line("  t 100 40 "), Some(InputEvent::Touch(100, 40)));
        assert_eq!(parse_line("r"), Some(InputEvent::Release));
        assert_eq!(parse_line("quit"), Some(InputEvent::Quit));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("3"), None);
        assert_eq!(parse_line("a b"), None);
        assert_eq!(parse_line("1 2 3"), None);
        assert_eq!(parse_line("-1 2"), None);
        assert_eq!(parse_line("t 10"), None);
    }

    #[test]
    fn pixels_map_to_clamped_tiles() {
        assert_eq!(pixel_to_cell((0, 0), (10, 7)), (0, 0));
        assert_eq!(pixel_to_cell((33, 65), (10, 7)), (1, 2));
        assert_eq!(pixel_to_cell((319, 223), (10, 7)), (9, 6));
        assert_eq!(pixel_to_cell((480, 320), (10, 7)), (9, 6));
    }

    #[test]
    fn held_touch_taps_once() {
        let mut debouncer = TouchDebouncer::new();
        let size = (10, 7);

        assert_eq!(debouncer.feed(InputEvent::Touch(40, 40), size), Some((1, 1)));
        assert_eq!(debouncer.feed(InputEvent::Touch(41, 40), size), None);
        assert_eq!(debouncer.feed(InputEvent::Touch(200, 10), size), None);
        assert_eq!(debouncer.feed(InputEvent::Release, size), None);
        assert_eq!(debouncer.feed(InputEvent::Touch(200, 10), size), Some((6, 0)));
    }

    #[test]
    fn direct_taps_bypass_debouncing() {
        let mut debouncer = TouchDebouncer::new();
        debouncer.feed(InputEvent::Touch(0, 0), (10, 7));
        assert_eq!(debouncer.feed(InputEvent::Tap((5, 5)), (10, 7)), Some((5, 5)));
    }
}
