//! Straight Edge: four in a row on a 7x6 upright grid.

use tracing::debug;

use crate::board::{Board, Cell, Player, Point};
use crate::constants::{STRAIGHT_EDGE_COLS, STRAIGHT_EDGE_LINE, STRAIGHT_EDGE_ROWS};
use crate::session::{Game, MoveError, Outcome, Verdict};
use crate::shell::{Color, GameShell};

/// Line directions through a disc; the opposite halves are walked too.
const LINES: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Lowest empty row of column `x`, if any. Row 0 is the top.
pub fn landing_row(board: &Board, x: usize) -> Option<usize> {
    (0..board.height()).rev().find(|&y| board.get((x, y)).is_empty())
}

/// Longest run of `pt`'s owner along any line through `pt`.
pub fn longest_line(board: &Board, pt: Point) -> usize {
    let Some(owner) = board.get(pt).owner() else {
        return 0;
    };
    let run = |dx: isize, dy: isize| {
        let mut n = 0;
        let mut at = pt;
        while let Some(next) = board.offset(at, dx, dy) {
            if board.get(next).owner() != Some(owner) {
                break;
            }
            n += 1;
            at = next;
        }
        n
    };
    LINES
        .iter()
        .map(|&(dx, dy)| 1 + run(dx, dy) + run(-dx, -dy))
        .max()
        .unwrap_or(1)
}

pub struct StraightEdge {
    board: Board,
    turn: u32,
}

impl Default for StraightEdge {
    fn default() -> Self {
        Self::new()
    }
}

impl StraightEdge {
    pub fn new() -> Self {
        Self::from_board(Board::new(STRAIGHT_EDGE_COLS, STRAIGHT_EDGE_ROWS), 0)
    }

    pub fn from_board(board: Board, turn: u32) -> Self {
        Self { board, turn }
    }

    pub fn to_move(&self) -> Player {
        Player::from_turn(self.turn)
    }
}

impl Game for StraightEdge {
    fn name(&self) -> &'static str {
        "straight-edge"
    }

    fn dimensions(&self) -> (usize, usize) {
        (STRAIGHT_EDGE_COLS, STRAIGHT_EDGE_ROWS)
    }

    fn start(&mut self, shell: &mut dyn GameShell) {
        *self = Self::new();
        shell.illuminate_board(Color::Off);
    }

    fn cell_pressed(&mut self, (x, _): Point, shell: &mut dyn GameShell) -> Outcome {
        let Some(y) = landing_row(&self.board, x) else {
            return Outcome::Denied(MoveError::ColumnFull);
        };
        let player = self.to_move();
        self.board.set((x, y), Cell::man(player));
        shell.set_cell_color((x, y), Color::of(player));
        self.turn += 1;

        let line = longest_line(&self.board, (x, y));
        debug!(%player, x, y, line, "disc dropped");
        if line >= STRAIGHT_EDGE_LINE {
            Outcome::Finished(Verdict::Winner(player))
        } else if self.board.count(Cell::is_empty) == 0 {
            Outcome::Finished(Verdict::Tie)
        } else {
            Outcome::TurnPassed {
                to: player.opponent(),
            }
        }
    }

    fn board(&self) -> &Board {
        &self.board
    }

    fn turn(&self) -> u32 {
        self.turn
    }
}
