use std::{
    fs::File,
    io::{self, BufRead, BufWriter},
    path::PathBuf,
    thread,
    time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use monster_sweeper_core::{CellCount, Coord, GameConfig, GameOutcome, Grid};
use monster_sweeper_protocol::Envelope;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use crate::{
    input::{InputEvent, parse_line},
    render::{render_grid, sprite_rows},
    session::{Effect, Session},
    telemetry::{JsonLinesSink, TelemetrySink},
};

mod input;
mod render;
mod session;
mod telemetry;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// Board width in tiles
    #[arg(long, default_value_t = GameConfig::DEFAULT_SIZE.0)]
    width: Coord,

    /// Board height in tiles
    #[arg(long, default_value_t = GameConfig::DEFAULT_SIZE.1)]
    height: Coord,

    /// Number of monsters hidden on the board
    #[arg(short, long, default_value_t = GameConfig::DEFAULT_MINES)]
    mines: CellCount,

    /// Number of monster sprites to pick from
    #[arg(
        long,
        default_value_t = GameConfig::DEFAULT_VARIANTS,
        value_parser = clap::value_parser!(u8).range(1..=GameConfig::MAX_VARIANTS as i64),
    )]
    variants: u8,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop after this many rounds, play until input ends otherwise
    #[arg(short, long)]
    games: Option<u32>,

    /// Pause between rounds
    #[arg(long, default_value_t = 5000)]
    restart_delay_ms: u64,

    /// Append game results as JSON lines to this file instead of stderr
    #[arg(long)]
    telemetry: Option<PathBuf>,

    /// Also publish won rounds, only losses are published otherwise
    #[arg(long)]
    publish_wins: bool,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        GameConfig::new((self.width, self.height), self.mines).with_variants(self.variants)
    }

    fn telemetry_sink(&self) -> anyhow::Result<Box<dyn TelemetrySink>> {
        Ok(match &self.telemetry {
            Some(path) => {
                let file = File::options()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("opening telemetry file {}", path.display()))?;
                Box::new(JsonLinesSink::new(BufWriter::new(file)))
            }
            None => Box::new(JsonLinesSink::new(io::stderr())),
        })
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = args.game_config();
    config.validate().context("invalid board configuration")?;

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let mut sink = args.telemetry_sink()?;
    let restart_delay = Duration::from_millis(args.restart_delay_ms);

    let stdin = io::stdin();
    let mut events = stdin
        .lock()
        .lines()
        .map_while(|line| line.inspect_err(|err| log::error!("Reading input failed: {}", err)).ok())
        .filter_map(|line| {
            let event = parse_line(&line);
            if event.is_none() && !line.trim().is_empty() {
                log::warn!("Unrecognized input {:?}", line);
            }
            event
        });

    let mut session = Session::new(Grid::new(config, &mut rng)?, args.publish_wins);
    let mut played = 0;
    loop {
        println!("{}", render_grid(session.grid()));
        let Some(outcome) = play_round(&mut session, &mut events, sink.as_mut())? else {
            log::info!("Input closed, quitting");
            break;
        };
        played += 1;
        log::info!("Round {} finished: {:?}", played, outcome);

        if args.games.is_some_and(|games| played >= games) {
            break;
        }
        thread::sleep(restart_delay);
        session.reset(config, &mut rng)?;
    }

    Ok(())
}

/// Feeds events to the session until the round ends, `None` when input runs out or the player quits.
fn play_round(
    session: &mut Session,
    events: &mut dyn Iterator<Item = InputEvent>,
    sink: &mut dyn TelemetrySink,
) -> anyhow::Result<Option<GameOutcome>> {
    for event in events {
        if event == InputEvent::Quit {
            return Ok(None);
        }

        for effect in session.handle(event) {
            match effect {
                Effect::Render => {
                    println!("{}\n", render_grid(session.grid()));
                    log::trace!("Sprite tiles: {:?}", sprite_rows(session.grid()));
                }
                Effect::Sound(sound) => log::info!("Playing {}", sound.file_name()),
                Effect::Publish(result) => sink.publish(&Envelope::game_result(result))?,
                Effect::GameOver(outcome) => return Ok(Some(outcome)),
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use monster_sweeper_core::MineLayout;
    use monster_sweeper_protocol::GameResult;

    #[derive(Default)]
    struct RecordingSink(Vec<Envelope>);

    impl TelemetrySink for RecordingSink {
        fn publish(&mut self, envelope: &Envelope) -> anyhow::Result<()> {
            self.0.push(envelope.clone());
            Ok(())
        }
    }

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_device_board() {
        let args = Args::try_parse_from(["monster-sweeper"]).unwrap();
        assert_eq!(args.game_config(), GameConfig::DEFAULT);
        assert_eq!(args.restart_delay_ms, 5000);
        assert!(!args.publish_wins);
    }

    #[test]
    fn flags_override_board() {
        let args = Args::try_parse_from([
            "monster-sweeper",
            "--width",
            "3",
            "--height",
            "3",
            "-m",
            "9",
            "--seed",
            "12",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(12));
        assert!(args.game_config().validate().is_err());
    }

    #[test]
    fn variants_outside_sprite_sheet_are_refused() {
        assert!(Args::try_parse_from(["monster-sweeper", "--variants", "5"]).is_err());
        assert!(Args::try_parse_from(["monster-sweeper", "--variants", "0"]).is_err());
        let args = Args::try_parse_from(["monster-sweeper", "--variants", "2"]).unwrap();
        assert_eq!(args.game_config().variants, 2);
    }

    #[test]
    fn lost_round_publishes_failure() {
        let layout = MineLayout::from_mines((3, 3), &[((1, 1), 0)]).unwrap();
        let mut session = Session::new(Grid::from_layout(layout), false);
        let mut sink = RecordingSink::default();
        let mut events = ["1 1", "1 1", "1 1", "0 0"]
            .into_iter()
            .filter_map(parse_line);

        let outcome = play_round(&mut session, &mut events, &mut sink).unwrap();

        assert_eq!(outcome, Some(GameOutcome::Lost));
        assert_eq!(sink.0, [Envelope::game_result(GameResult::Failed)]);
        // the round stops consuming input at game over
        assert_eq!(events.next(), Some(InputEvent::Tap((0, 0))));
    }

    #[test]
    fn quit_ends_round_without_outcome() {
        let layout = MineLayout::from_mines((3, 3), &[((1, 1), 0)]).unwrap();
        let mut session = Session::new(Grid::from_layout(layout), false);
        let mut sink = RecordingSink::default();
        let mut events = ["0 0", "q", "1 1"].into_iter().filter_map(parse_line);

        let outcome = play_round(&mut session, &mut events, &mut sink).unwrap();

        assert_eq!(outcome, None);
        assert!(sink.0.is_empty());
    }
}
