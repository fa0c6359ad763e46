use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use inertia_core::*;

use crate::render;

/// What the human typed at the prompt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Input {
    Slide(Direction),
    Quit,
}

/// Reads a direction name, or a target cell `row col` that is turned into the direction
/// pointing at it from `position`.
fn parse_input(line: &str, position: Coord2) -> Result<Input> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Ok(Input::Quit);
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [name] => Ok(Input::Slide(name.parse()?)),
        [row, col] => {
            let target = (
                row.parse().with_context(|| format!("bad row {row:?}"))?,
                col.parse().with_context(|| format!("bad column {col:?}"))?,
            );
            match Direction::from_click(position, target) {
                Some(direction) => Ok(Input::Slide(direction)),
                None => bail!("you are already standing on {target:?}"),
            }
        }
        _ => bail!("expected a direction like `ne` or a cell like `4 7`"),
    }
}

/// Interactive game: the human moves from stdin, the computer answers at `difficulty`.
pub(crate) fn run(mut board: Board, difficulty: Difficulty) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    while !board.is_finished() {
        println!("{}", render::BoardView(&board));
        println!("{}", render::scores(&board));
        print!("Your move (direction or `row col`, q to quit): ");
        stdout.flush().context("failed to flush prompt")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read move")?;

        let direction = match parse_input(&line, board.position(Player::Human)) {
            Ok(Input::Slide(direction)) => direction,
            Ok(Input::Quit) => return Ok(()),
            Err(err) => {
                println!("{err:#}");
                continue;
            }
        };

        let outcome = board.make_move_with(Player::Human, direction, |at| {
            println!("Your shield absorbed the mine at {at:?}.");
        })?;
        if !outcome.has_update() {
            println!("Blocked, try another direction.");
            continue;
        }
        if board.check_end_game().is_finished() {
            break;
        }

        let reply = choose_opponent_move(&board, difficulty);
        board.make_move_with(Player::Opponent, reply, |at| {
            println!("The CPU's shield absorbed the mine at {at:?}.");
        })?;
        println!("CPU slides {reply}.");
        board.check_end_game();
    }

    println!("{}", render::BoardView(&board));
    println!("{}", render::scores(&board));
    if let Some(message) = board.result_message() {
        println!("{message}");
    }
    Ok(())
}
