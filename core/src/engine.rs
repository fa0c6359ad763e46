use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Human,
    Opponent,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::Human, Player::Opponent];

    pub const fn other(self) -> Self {
        match self {
            Self::Human => Self::Opponent,
            Self::Opponent => Self::Human,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Human => 0,
            Self::Opponent => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Human => "Human",
            Self::Opponent => "CPU",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    position: Coord2,
    score: u32,
    shields: u32,
}

impl PlayerState {
    const fn at(position: Coord2) -> Self {
        Self {
            position,
            score: 0,
            shields: 0,
        }
    }

    pub const fn position(&self) -> Coord2 {
        self.position
    }

    /// Gems collected so far.
    pub const fn score(&self) -> u32 {
        self.score
    }

    pub const fn shields(&self) -> u32 {
        self.shields
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    MineHit { loser: Player },
    AllGemsCollected,
    /// Neither player has a move that both moves and survives.
    Stalemate,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub reason: EndReason,
    /// `None` for a draw.
    pub winner: Option<Player>,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.reason, self.winner) {
            (EndReason::MineHit { loser }, _) => {
                write!(f, "{loser} hit a mine! {} wins.", loser.other())
            }
            (EndReason::AllGemsCollected, Some(winner)) => {
                write!(f, "All gems collected. {winner} wins!")
            }
            (EndReason::AllGemsCollected, None) => f.write_str("All gems collected. Draw!"),
            (EndReason::Stalemate, Some(winner)) => write!(f, "Stalemate. {winner} wins!"),
            (EndReason::Stalemate, None) => f.write_str("Stalemate. Draw!"),
        }
    }
}

/// Valid transitions:
/// - InProgress -> Finished
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Finished(GameResult),
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished(_))
    }

    pub const fn result(self) -> Option<GameResult> {
        match self {
            Self::InProgress => None,
            Self::Finished(result) => Some(result),
        }
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

/// Full state of one game: the grid, both players, and whether it is over.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    grid: Grid,
    players: [PlayerState; 2],
    difficulty: Difficulty,
    status: GameStatus,
}

impl Board {
    /// Deals a new board, drawing every random decision from `rng`.
    pub fn generate<R: Rng + ?Sized>(config: BoardConfig, rng: &mut R) -> Self {
        let grid = generate_grid(config, rng);
        let opponent = opponent_start(config.size());
        Self::new_unchecked(grid, config.difficulty(), HUMAN_START, opponent)
    }

    /// Board over a hand-built grid with both players on their usual start cells.
    pub fn new(grid: Grid, difficulty: Difficulty) -> Result<Self> {
        let (rows, cols) = grid.size();
        if rows < MIN_BOARD_SIDE || cols < MIN_BOARD_SIDE {
            return Err(GameError::BoardTooSmall { rows, cols });
        }
        let opponent = opponent_start(grid.size());
        Self::with_positions(grid, difficulty, HUMAN_START, opponent)
    }

    pub fn with_positions(
        grid: Grid,
        difficulty: Difficulty,
        human: Coord2,
        opponent: Coord2,
    ) -> Result<Self> {
        for position in [human, opponent] {
            if grid[grid.validate_coords(position)?].is_wall() {
                return Err(GameError::WallPosition);
            }
        }
        Ok(Self::new_unchecked(grid, difficulty, human, opponent))
    }

    const fn new_unchecked(
        grid: Grid,
        difficulty: Difficulty,
        human: Coord2,
        opponent: Coord2,
    ) -> Self {
        Self {
            grid,
            players: [PlayerState::at(human), PlayerState::at(opponent)],
            difficulty,
            status: GameStatus::InProgress,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// Human-readable outcome once the game is over.
    pub fn result_message(&self) -> Option<String> {
        self.status.result().map(|result| result.to_string())
    }

    pub fn player(&self, player: Player) -> &PlayerState {
        &self.players[player.index()]
    }

    pub fn position(&self, player: Player) -> Coord2 {
        self.player(player).position
    }

    pub fn score(&self, player: Player) -> u32 {
        self.player(player).score
    }

    pub fn shields(&self, player: Player) -> u32 {
        self.player(player).shields
    }

    /// What-if slide on the current grid, used by the opponent and by callers previewing moves.
    pub fn simulate_slide(&self, start: Coord2, direction: Direction) -> SlideOutcome {
        self.grid.simulate_slide(start, direction)
    }

    pub fn make_move(&mut self, player: Player, direction: Direction) -> Result<MoveOutcome> {
        self.make_move_with(player, direction, |_| {})
    }

    /// Slides `player` in `direction`, calling `on_shield_break` with the mine cell whenever a
    /// shield absorbs a hit.
    pub fn make_move_with<F>(
        &mut self,
        player: Player,
        direction: Direction,
        on_shield_break: F,
    ) -> Result<MoveOutcome>
    where
        F: FnOnce(Coord2),
    {
        self.check_not_finished()?;

        let start = self.position(player);
        let slide = self.grid.consume_slide(start, direction);
        if slide.is_noop(start) {
            return Ok(MoveOutcome::NoChange);
        }

        let state = &mut self.players[player.index()];
        state.score += slide.gems;
        state.shields += slide.shields;

        if !slide.hit_mine {
            state.position = slide.end;
            return Ok(MoveOutcome::Moved);
        }

        if state.shields > 0 {
            state.shields -= 1;
            state.position = slide.end;
            log::debug!("{player} shield absorbed mine at {:?}", slide.end);
            on_shield_break(slide.end);
            Ok(MoveOutcome::ShieldBroken { at: slide.end })
        } else {
            self.finish(GameResult {
                reason: EndReason::MineHit { loser: player },
                winner: Some(player.other()),
            });
            Ok(MoveOutcome::HitMine)
        }
    }

    /// Whether an actor at `start` holding `shields` has a direction that both moves and survives.
    pub fn has_any_safe_move(&self, start: Coord2, shields: u32) -> bool {
        Direction::ALL.into_iter().any(|direction| {
            let slide = self.grid.simulate_slide(start, direction);
            !slide.is_fatal(shields) && slide.end != start
        })
    }

    /// Ends the game when no gem is left or neither player can move safely. Must run after every
    /// half-move; a finished game is left untouched.
    pub fn check_end_game(&mut self) -> GameStatus {
        if self.is_finished() {
            return self.status;
        }

        if !self.grid.has_gems() {
            self.finish(GameResult {
                reason: EndReason::AllGemsCollected,
                winner: self.leader(),
            });
        } else if Player::ALL
            .into_iter()
            .all(|player| !self.has_any_safe_move(self.position(player), self.shields(player)))
        {
            self.finish(GameResult {
                reason: EndReason::Stalemate,
                winner: self.leader(),
            });
        }

        self.status
    }

    /// The player with the strictly higher score, if any.
    fn leader(&self) -> Option<Player> {
        let human = self.score(Player::Human);
        let opponent = self.score(Player::Opponent);
        match human.cmp(&opponent) {
            core::cmp::Ordering::Greater => Some(Player::Human),
            core::cmp::Ordering::Less => Some(Player::Opponent),
            core::cmp::Ordering::Equal => None,
        }
    }

    fn finish(&mut self, result: GameResult) {
        if self.status.is_finished() {
            return;
        }
        log::info!("Game over: {result}");
        self.status = GameStatus::Finished(result);
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
