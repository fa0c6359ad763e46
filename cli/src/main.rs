use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inertia_core::*;

mod autoplay;
mod play;
mod render;

/// Two-player sliding gem game against the computer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[arg(long, default_value_t = 12)]
    rows: Coord,

    #[arg(long, default_value_t = 12)]
    cols: Coord,

    /// Opponent tier: easy, medium or hard
    #[arg(short, long, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play against the computer on stdin/stdout
    Play,
    /// Let the computer drive both seats
    Autoplay(autoplay::AutoplayArgs),
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = BoardConfig::new(args.rows, args.cols, args.difficulty)
        .with_context(|| format!("cannot play on a {}x{} board", args.rows, args.cols))?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed: {seed}");

    let board = RandomBoardGenerator::new(seed).generate(config);
    log::debug!("{} gems dealt", board.grid().gems_left());

    match args.command {
        Command::Play => play::run(board, config.difficulty()),
        Command::Autoplay(opts) => autoplay::run(board, config.difficulty(), seed, &opts),
    }
}
