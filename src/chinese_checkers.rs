//! Two-player Chinese checkers on the 8x8 grid.
//!
//! Each side starts with fifteen marbles packed into its home triangle and
//! races them into the opposite triangle (its goal). Marbles step to any of
//! the eight neighbors or jump over a neighboring marble of either color.
//! Jumps may chain; the player ends a chain early by pressing the marble
//! again. A marble that has reached its goal may only move within it.

use tracing::debug;

use crate::board::{Board, Cell, Player, Point};
use crate::constants::{
    ALL_DIRECTIONS, CHINESE_CHECKERS_P1_HOME_MIN, CHINESE_CHECKERS_P2_HOME_MAX,
    CHINESE_CHECKERS_PIECES, CHINESE_CHECKERS_SIZE, CHINESE_CHECKERS_TURN_SECONDS,
};
use crate::session::{Game, MoveError, Outcome, Verdict};
use crate::shell::{Color, GameShell};

/// True when `pt` lies in `player`'s starting triangle.
pub fn in_home((x, y): Point, player: Player) -> bool {
    match player {
        Player::One => x + y >= CHINESE_CHECKERS_P1_HOME_MIN,
        Player::Two => x + y <= CHINESE_CHECKERS_P2_HOME_MAX,
    }
}

/// True when `pt` lies in the triangle `player` is racing toward.
pub fn in_goal(pt: Point, player: Player) -> bool {
    in_home(pt, player.opponent())
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Point,
    pub to: Point,
    pub jump: bool,
}

/// Moves for the marble on `from`.
///
/// `came_from` is the cell the marble just jumped from during a chain; it is
/// never offered as a landing spot. With `jumps_only` set, steps are left
/// out.
pub fn moves_from(
    board: &Board,
    from: Point,
    came_from: Option<Point>,
    jumps_only: bool,
) -> Vec<Move> {
    let Some(owner) = board.get(from).owner() else {
        return Vec::new();
    };
    let confined = in_goal(from, owner);
    let allowed = |to: Point| !confined || in_goal(to, owner);

    let mut moves = Vec::new();
    for &(dx, dy) in &ALL_DIRECTIONS {
        let Some(next) = board.offset(from, dx, dy) else {
            continue;
        };
        if board.get(next).is_empty() {
            if !jumps_only && allowed(next) {
                moves.push(Move {
                    from,
                    to: next,
                    jump: false,
                });
            }
            continue;
        }
        let Some(to) = board.offset(from, 2 * dx, 2 * dy) else {
            continue;
        };
        if board.get(to).is_empty() && Some(to) != came_from && allowed(to) {
            moves.push(Move {
                from,
                to,
                jump: true,
            });
        }
    }
    moves
}

/// True if any of `player`'s marbles can step or jump.
pub fn has_any_move(board: &Board, player: Player) -> bool {
    board
        .points()
        .filter(|&pt| board.get(pt).owner() == Some(player))
        .any(|pt| !moves_from(board, pt, None, false).is_empty())
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Stage {
    AwaitingPiece,
    Selected {
        from: Point,
        moves: Vec<Move>,
    },
    Chain {
        head: Point,
        came_from: Point,
        jumps: Vec<Move>,
    },
}

pub struct ChineseCheckers {
    board: Board,
    turn: u32,
    stage: Stage,
    scores: [u32; 2],
}

impl Default for ChineseCheckers {
    fn default() -> Self {
        Self::new()
    }
}

impl ChineseCheckers {
    pub fn new() -> Self {
        Self::from_position(Self::starting_board(), 0)
    }

    /// Resume from an arbitrary position. Marbles already in their goal count
    /// as scored.
    pub fn from_position(board: Board, turn: u32) -> Self {
        let mut scores = [0; 2];
        for pt in board.points() {
            if let Some(owner) = board.get(pt).owner() {
                if in_goal(pt, owner) {
                    scores[owner.index()] += 1;
                }
            }
        }
        Self {
            board,
            turn,
            stage: Stage::AwaitingPiece,
            scores,
        }
    }

    pub fn starting_board() -> Board {
        let mut board = Board::square(CHINESE_CHECKERS_SIZE);
        for pt in board.points() {
            for player in [Player::One, Player::Two] {
                if in_home(pt, player) {
                    board.set(pt, Cell::man(player));
                }
            }
        }
        board
    }

    pub fn to_move(&self) -> Player {
        Player::from_turn(self.turn)
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    pub fn offered(&self) -> &[Move] {
        match &self.stage {
            Stage::AwaitingPiece => &[],
            Stage::Selected { moves, .. } => moves,
            Stage::Chain { jumps, .. } => jumps,
        }
    }

    pub fn chain_head(&self) -> Option<Point> {
        match self.stage {
            Stage::Chain { head, .. } => Some(head),
            _ => None,
        }
    }

    fn paint(&self, shell: &mut dyn GameShell) {
        for pt in self.board.points() {
            let color = match self.board.get(pt).owner() {
                Some(owner) => Color::of(owner),
                None if in_home(pt, Player::One) || in_home(pt, Player::Two) => Color::White,
                None => Color::Off,
            };
            shell.set_cell_color(pt, color);
        }
        let highlight = match self.stage {
            Stage::Chain { .. } => Color::DarkYellow,
            _ => Color::Yellow,
        };
        for mv in self.offered() {
            shell.set_cell_color(mv.to, highlight);
        }
    }

    fn end_turn(&mut self, shell: &mut dyn GameShell) -> Outcome {
        let player = self.to_move();
        self.stage = Stage::AwaitingPiece;
        self.turn += 1;
        self.paint(shell);
        // A player left without a move loses.
        if !has_any_move(&self.board, player.opponent()) {
            debug!(blocked = %player.opponent(), "no legal move");
            return Outcome::Finished(Verdict::Winner(player));
        }
        Outcome::TurnPassed {
            to: player.opponent(),
        }
    }

    fn play(&mut self, mv: Move, shell: &mut dyn GameShell) -> Outcome {
        let player = self.to_move();
        let marble = self.board.get(mv.from);
        self.board.set(mv.from, Cell::Empty);
        self.board.set(mv.to, marble);

        if in_goal(mv.to, player) && !in_goal(mv.from, player) {
            let score = &mut self.scores[player.index()];
            *score += 1;
            shell.set_score(player, *score);
            debug!(%player, score = *score, "marble reached the goal");
            if *score >= CHINESE_CHECKERS_PIECES {
                self.stage = Stage::AwaitingPiece;
                self.paint(shell);
                return Outcome::Finished(Verdict::Winner(player));
            }
        }

        if mv.jump {
            let jumps = moves_from(&self.board, mv.to, Some(mv.from), true);
            if !jumps.is_empty() {
                self.stage = Stage::Chain {
                    head: mv.to,
                    came_from: mv.from,
                    jumps,
                };
                self.paint(shell);
                return Outcome::Continue;
            }
        }
        self.end_turn(shell)
    }
}

impl Game for ChineseCheckers {
    fn name(&self) -> &'static str {
        "chinese-checkers"
    }

    fn dimensions(&self) -> (usize, usize) {
        (CHINESE_CHECKERS_SIZE, CHINESE_CHECKERS_SIZE)
    }

    fn turn_seconds(&self) -> Option<u32> {
        Some(CHINESE_CHECKERS_TURN_SECONDS)
    }

    fn start(&mut self, shell: &mut dyn GameShell) {
        *self = Self::new();
        self.paint(shell);
    }

    fn cell_pressed(&mut self, pt: Point, shell: &mut dyn GameShell) -> Outcome {
        let player = self.to_move();

        if let Stage::Chain { head, jumps, .. } = &self.stage {
            if pt == *head {
                debug!(?pt, "chain ended early");
                return self.end_turn(shell);
            }
            let Some(mv) = jumps.iter().find(|mv| mv.to == pt).copied() else {
                return Outcome::Denied(MoveError::ChainPending);
            };
            return self.play(mv, shell);
        }

        if self.board.get(pt).owner() == Some(player) {
            let moves = moves_from(&self.board, pt, None, false);
            let outcome = if moves.is_empty() {
                self.stage = Stage::AwaitingPiece;
                Outcome::Ignored
            } else {
                self.stage = Stage::Selected { from: pt, moves };
                Outcome::Continue
            };
            self.paint(shell);
            return outcome;
        }

        let chosen = match &self.stage {
            Stage::Selected { moves, .. } => moves.iter().find(|mv| mv.to == pt).copied(),
            _ => return Outcome::Ignored,
        };
        match chosen {
            Some(mv) => self.play(mv, shell),
            None => Outcome::Denied(MoveError::IllegalDestination),
        }
    }

    fn board(&self) -> &Board {
        &self.board
    }

    fn turn(&self) -> u32 {
        self.turn
    }
}
