use monster_sweeper_core::{GameConfig, GameOutcome, Grid, Result};
use monster_sweeper_protocol::GameResult;
use rand::Rng;

use crate::input::{InputEvent, TouchDebouncer};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sound {
    Win,
    Lose,
}

impl Sound {
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Win => "sounds/win.wav",
            Self::Lose => "sounds/lose.wav",
        }
    }
}

/// Side effects requested from the driver after handling an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Render,
    Sound(Sound),
    Publish(GameResult),
    GameOver(GameOutcome),
}

/// One round of play: owns the board and turns input events into effects.
#[derive(Debug)]
pub struct Session {
    grid: Grid,
    debouncer: TouchDebouncer,
    publish_wins: bool,
    finished: Option<GameOutcome>,
}

impl Session {
    pub fn new(grid: Grid, publish_wins: bool) -> Self {
        Self {
            grid,
            debouncer: TouchDebouncer::new(),
            publish_wins,
            finished: None,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Final verdict once the round is over.
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.finished
    }

    /// Starts a new round on a freshly seeded board.
    pub fn reset<R: Rng + ?Sized>(&mut self, config: GameConfig, rng: &mut R) -> Result<()> {
        self.grid.reset(config, rng)?;
        self.debouncer = TouchDebouncer::new();
        self.finished = None;
        Ok(())
    }

    pub fn handle(&mut self, event: InputEvent) -> Vec<Effect> {
        if self.finished.is_some() {
            return Vec::new();
        }

        let Some(coords) = self.debouncer.feed(event, self.grid.size()) else {
            return Vec::new();
        };

        let toggled = match self.grid.toggle_mark(coords) {
            Ok(toggled) => toggled,
            Err(err) => {
                log::warn!("Ignoring tap at {:?}: {}", coords, err);
                return Vec::new();
            }
        };

        if toggled.is_lost() {
            return self.finish(GameOutcome::Lost);
        }
        if !toggled.has_update() {
            return Vec::new();
        }

        match self.grid.check_win_loss() {
            GameOutcome::Undecided => vec![Effect::Render],
            outcome => self.finish(outcome),
        }
    }

    fn finish(&mut self, outcome: GameOutcome) -> Vec<Effect> {
        self.finished = Some(outcome);
        log::debug!("Round finished: {:?}", outcome);

        match outcome {
            GameOutcome::Won => {
                let mut effects = vec![Effect::Render, Effect::Sound(Sound::Win)];
                if self.publish_wins {
                    effects.push(Effect::Publish(GameResult::Won));
                }
                effects.push(Effect::GameOver(outcome));
                effects
            }
            GameOutcome::Lost => {
                self.grid.mark_misflags();
                vec![
                    Effect::Render,
                    Effect::Sound(Sound::Lose),
                    Effect::Publish(GameResult::Failed),
                    Effect::GameOver(GameOutcome::Lost),
                ]
            }
            GameOutcome::Undecided => {
                unreachable!("round finished while cells are still covered")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monster_sweeper_core::{DisplayState, MineLayout};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn session(publish_wins: bool) -> Session {
        let layout = MineLayout::from_mines((3, 3), &[((2, 2), 0)]).unwrap();
        Session::new(Grid::from_layout(layout), publish_wins)
    }

    fn tap(session: &mut Session, coords: (u8, u8), times: usize) -> Vec<Effect> {
        let mut effects = Vec::new();
        for _ in 0..times {
            effects = session.handle(InputEvent::Tap(coords));
        }
        effects
    }

    #[test]
    fn third_tap_on_mine_loses_and_publishes() {
        let mut session = session(false);

        assert_eq!(tap(&mut session, (2, 2), 2), [Effect::Render]);
        let effects = session.handle(InputEvent::Tap((2, 2)));

        assert_eq!(
            effects,
            [
                Effect::Render,
                Effect::Sound(Sound::Lose),
                Effect::Publish(GameResult::Failed),
                Effect::GameOver(GameOutcome::Lost),
            ]
        );
        assert_eq!(session.outcome(), Some(GameOutcome::Lost));
        // losing uncovers the rest of the board
        assert_eq!(
            session.grid().cell_at((0, 0)).unwrap(),
            DisplayState::RevealedNumber(0)
        );
        assert!(session.handle(InputEvent::Tap((0, 0))).is_empty());
    }

    #[test]
    fn partial_reveal_keeps_round_open() {
        let layout = MineLayout::from_mines((3, 1), &[((0, 0), 0)]).unwrap();
        let mut session = Session::new(Grid::from_layout(layout), false);

        assert_eq!(tap(&mut session, (1, 0), 3), [Effect::Render]);
        assert_eq!(session.outcome(), None);
        assert_eq!(
            session.grid().cell_at((0, 0)).unwrap(),
            DisplayState::Covered
        );
    }

    #[test]
    fn clearing_the_board_wins() {
        let mut session = session(false);

        tap(&mut session, (0, 0), 3);
        tap(&mut session, (2, 2), 1);
        let effects = session.handle(InputEvent::Tap((2, 2)));

        assert_eq!(
            effects,
            [
                Effect::Render,
                Effect::Sound(Sound::Win),
                Effect::GameOver(GameOutcome::Won),
            ]
        );
    }

    #[test]
    fn wins_are_published_on_request() {
        let mut session = session(true);

        tap(&mut session, (0, 0), 3);
        let effects = tap(&mut session, (2, 2), 2);

        assert!(effects.contains(&Effect::Publish(GameResult::Won)));
    }

    #[test]
    fn misflag_on_finished_board_loses() {
        let layout = MineLayout::from_mines((2, 1), &[((0, 0), 0)]).unwrap();
        let mut session = Session::new(Grid::from_layout(layout), false);

        tap(&mut session, (1, 0), 2);
        let effects = tap(&mut session, (0, 0), 2);

        assert!(effects.contains(&Effect::Publish(GameResult::Failed)));
        assert_eq!(session.outcome(), Some(GameOutcome::Lost));
        assert_eq!(
            session.grid().cell_at((1, 0)).unwrap(),
            DisplayState::MisflaggedMine
        );
    }

    #[test]
    fn held_touch_counts_once() {
        let mut session = session(false);

        assert_eq!(session.handle(InputEvent::Touch(5, 5)), [Effect::Render]);
        assert!(session.handle(InputEvent::Touch(6, 5)).is_empty());
        assert!(session.handle(InputEvent::Release).is_empty());
        assert_eq!(
            session.grid().cell_at((0, 0)).unwrap(),
            DisplayState::Questioned
        );
    }

    #[test]
    fn out_of_bounds_tap_is_ignored() {
        let mut session = session(false);
        assert!(session.handle(InputEvent::Tap((7, 7))).is_empty());
    }

    #[test]
    fn reset_starts_a_new_round() {
        let mut session = session(false);
        tap(&mut session, (2, 2), 3);
        assert!(session.outcome().is_some());

        let mut rng = Pcg64Mcg::seed_from_u64(11);
        session.reset(GameConfig::DEFAULT, &mut rng).unwrap();

        assert_eq!(session.outcome(), None);
        assert_eq!(session.grid().size(), (10, 7));
        assert_eq!(session.grid().covered_count(), 70);
    }
}
