use anyhow::Result;
use clap::Args;
use inertia_core::*;

use crate::render;

#[derive(Args, Debug)]
pub(crate) struct AutoplayArgs {
    /// Tier driving the human seat; defaults to the opponent's tier
    #[arg(long)]
    human_difficulty: Option<Difficulty>,

    /// Stop after this many rounds even if the game is still going
    #[arg(long, default_value_t = 200)]
    max_turns: u32,

    /// Print the final board as JSON
    #[arg(long)]
    json: bool,
}

/// Plays rounds until the game ends or `max_turns` runs out. Returns the rounds played.
fn play_out(board: &mut Board, tiers: [Difficulty; 2], max_turns: u32) -> Result<u32> {
    if board.check_end_game().is_finished() {
        return Ok(0);
    }
    for turn in 1..=max_turns {
        for (player, difficulty) in Player::ALL.into_iter().zip(tiers) {
            let direction = choose_move(board, player, difficulty);
            let outcome = board.make_move(player, direction)?;
            log::debug!("turn {turn}: {player} slides {direction}: {outcome:?}");
            if board.check_end_game().is_finished() {
                return Ok(turn);
            }
        }
    }
    Ok(max_turns)
}

pub(crate) fn run(
    mut board: Board,
    difficulty: Difficulty,
    seed: u64,
    args: &AutoplayArgs,
) -> Result<()> {
    let tiers = [args.human_difficulty.unwrap_or(difficulty), difficulty];
    let turns = play_out(&mut board, tiers, args.max_turns)?;
    let message = board
        .result_message()
        .unwrap_or_else(|| format!("No result after {turns} turns."));

    if args.json {
        let report = serde_json::json!({
            "seed": seed,
            "turns": turns,
            "result": message,
            "board": board,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", render::BoardView(&board));
        println!("{}", render::scores(&board));
        println!("{message}");
    }
    Ok(())
}
