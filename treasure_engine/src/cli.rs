use crate::error::{Error, Result};
use crate::text::{read_from_file, write_to_file};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Runs the treasure hunt described in a map file and writes the final map.
#[derive(Parser, Debug)]
#[command(name = "treasure_engine")]
#[command(about = "Simulate adventurers hunting treasures on a map")]
pub struct Args {
    /// The map file to read
    pub input: PathBuf,

    /// The file to write the final map to
    pub output: PathBuf,

    /// Save a JSON replay of every turn to this file
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Draw the map to the console after every turn
    #[arg(long)]
    pub draw: bool,
}

pub fn run(args: &Args) -> Result<()> {
    let mut hunt = read_from_file(&args.input)?.with_replay_logger(args.replay.clone());

    if args.draw {
        let draw_error = |source: std::io::Error| Error::Io {
            path: PathBuf::from("<stdout>"),
            source,
        };
        hunt.draw().map_err(draw_error)?;
        while hunt.has_more_turns_to_run() {
            hunt.run_next_turn()?;
            hunt.draw().map_err(draw_error)?;
        }
    } else {
        hunt.full_run()?;
    }
    info!(turns = hunt.turn(), "hunt complete");

    write_to_file(&args.output, &hunt)?;
    hunt.save_replay()
}
