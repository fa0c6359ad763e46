use std::fmt;

use inertia_core::*;

fn cell_glyph(cell: Cell) -> char {
    match cell {
        Cell::Empty => '.',
        Cell::Wall => '#',
        Cell::Gem => '*',
        Cell::Mine => 'x',
        Cell::Shield => '+',
        Cell::Stop => 'o',
    }
}

/// Plain-text picture of a board: column numbers on top, row numbers on the left, `H` and `C`
/// for the two players.
pub(crate) struct BoardView<'a>(pub &'a Board);

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.0;
        let (rows, cols) = board.size();
        let human = board.position(Player::Human);
        let opponent = board.position(Player::Opponent);

        f.write_str("   ")?;
        for col in 0..cols {
            write!(f, "{col:>3}")?;
        }
        writeln!(f)?;

        for row in 0..rows {
            write!(f, "{row:>3}")?;
            for col in 0..cols {
                let glyph = match (row, col) {
                    coords if coords == human => 'H',
                    coords if coords == opponent => 'C',
                    coords => cell_glyph(board.grid()[coords]),
                };
                write!(f, "{glyph:>3}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One line with both players' scores and shields.
pub(crate) fn scores(board: &Board) -> String {
    Player::ALL
        .into_iter()
        .map(|player| {
            format!(
                "{player}: {} gems, {} shields",
                board.score(player),
                board.shields(player)
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_players_over_cells() {
        let mut grid = Grid::walled((5, 5));
        grid.set_cell((2, 2), Cell::Gem).unwrap();
        let game = Board::new(grid, Difficulty::Easy).unwrap();

        let text = BoardView(&game).to_string();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "  0  #  #  #  #  #");
        assert_eq!(lines[2], "  1  #  H  .  .  #");
        assert_eq!(lines[3], "  2  #  .  *  .  #");
        assert_eq!(lines[4], "  3  #  .  .  C  #");
    }

    #[test]
    fn scores_list_both_seats() {
        let board = Board::new(Grid::walled((5, 5)), Difficulty::Easy).unwrap();

        assert_eq!(
            scores(&board),
            "Human: 0 gems, 0 shields | CPU: 0 gems, 0 shields"
        );
    }
}
