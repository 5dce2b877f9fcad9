//! Checkers on the 8x8 grid.
//!
//! Player One starts on the bottom three rows and moves up; Player Two
//! starts on the top three rows and moves down. Captures are mandatory:
//! while any piece of the player to move can jump, no simple move is
//! offered. A jump that leaves the same piece able to jump again keeps the
//! turn open until the chain is exhausted.

use tracing::debug;

use crate::board::{Board, Cell, Player, Point, Rank};
use crate::constants::{
    CHECKERS_P1_ROWS, CHECKERS_P2_ROWS, CHECKERS_SIZE, CHECKERS_TURN_SECONDS,
    DIAGONAL,
};
use crate::session::{Game, MoveError, Outcome, Verdict};
use crate::shell::{Color, GameShell};

const FORWARD_ONE: [(isize, isize); 2] = [(-1, -1), (1, -1)];
const FORWARD_TWO: [(isize, isize); 2] = [(-1, 1), (1, 1)];

/// A single step or jump of one piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Point,
    pub to: Point,
    /// The jumped-over piece, for jumps.
    pub capture: Option<Point>,
}

impl Move {
    pub fn is_jump(&self) -> bool {
        self.capture.is_some()
    }
}

/// What applying a move changed besides the moving piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveEffect {
    pub captured: Option<Cell>,
    pub promoted: bool,
}

/// Directions a piece may travel in: forward only for men, all four
/// diagonals for kings.
fn directions(cell: Cell) -> &'static [(isize, isize)] {
    match cell {
        Cell::Empty => &[],
        Cell::Piece {
            rank: Rank::King, ..
        } => &DIAGONAL,
        Cell::Piece {
            owner: Player::One, ..
        } => &FORWARD_ONE,
        Cell::Piece {
            owner: Player::Two, ..
        } => &FORWARD_TWO,
    }
}

/// Row on which a man of `player` is crowned.
pub fn promotion_row(player: Player) -> usize {
    match player {
        Player::One => 0,
        Player::Two => CHECKERS_SIZE - 1,
    }
}

/// Jumps available to the piece on `from`.
pub fn jumps_from(board: &Board, from: Point) -> Vec<Move> {
    let cell = board.get(from);
    let Some(owner) = cell.owner() else {
        return Vec::new();
    };
    directions(cell)
        .iter()
        .filter_map(|&(dx, dy)| {
            let over = board.offset(from, dx, dy)?;
            let to = board.offset(from, 2 * dx, 2 * dy)?;
            let jumpable =
                board.get(over).owner() == Some(owner.opponent()) && board.get(to).is_empty();
            jumpable.then_some(Move {
                from,
                to,
                capture: Some(over),
            })
        })
        .collect()
}

/// Simple (non-capturing) moves available to the piece on `from`.
pub fn steps_from(board: &Board, from: Point) -> Vec<Move> {
    directions(board.get(from))
        .iter()
        .filter_map(|&(dx, dy)| {
            let to = board.offset(from, dx, dy)?;
            board.get(to).is_empty().then_some(Move {
                from,
                to,
                capture: None,
            })
        })
        .collect()
}

/// True when any piece of `player` has a jump somewhere on the board.
pub fn has_jump(board: &Board, player: Player) -> bool {
    board
        .points()
        .any(|pt| board.get(pt).owner() == Some(player) && !jumps_from(board, pt).is_empty())
}

/// Destinations offered for the piece on `from` when `player` is to move.
///
/// Only jumps are returned while any of the player's pieces can jump.
pub fn legal_moves(board: &Board, from: Point, player: Player) -> Vec<Move> {
    if board.get(from).owner() != Some(player) {
        return Vec::new();
    }
    let jumps = jumps_from(board, from);
    if !jumps.is_empty() || has_jump(board, player) {
        return jumps;
    }
    steps_from(board, from)
}

/// True when `player` can move at all.
pub fn has_any_move(board: &Board, player: Player) -> bool {
    board.points().any(|pt| {
        board.get(pt).owner() == Some(player)
            && (!jumps_from(board, pt).is_empty() || !steps_from(board, pt).is_empty())
    })
}

/// Move a piece, removing any jumped piece and crowning on the far row.
pub fn apply_move(board: &mut Board, mv: Move) -> MoveEffect {
    let piece = board.get(mv.from);
    board.set(mv.from, Cell::Empty);

    let captured = mv.capture.map(|over| {
        let taken = board.get(over);
        board.set(over, Cell::Empty);
        taken
    });

    let promoted = match piece {
        Cell::Piece {
            owner,
            rank: Rank::Man,
        } => mv.to.1 == promotion_row(owner),
        _ => false,
    };
    let landed = match (piece.owner(), promoted) {
        (Some(owner), true) => Cell::king(owner),
        _ => piece,
    };
    board.set(mv.to, landed);

    MoveEffect { captured, promoted }
}

/// Where the player is within a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Stage {
    AwaitingPiece,
    Selected { from: Point, moves: Vec<Move> },
    /// The piece on `head` jumped and must keep jumping.
    Chain { head: Point, jumps: Vec<Move> },
}

pub struct Checkers {
    board: Board,
    turn: u32,
    stage: Stage,
    /// Opponent pieces taken by each player.
    captures: [u32; 2],
}

impl Default for Checkers {
    fn default() -> Self {
        Self::new()
    }
}

impl Checkers {
    pub fn new() -> Self {
        Self::from_position(Self::starting_board(), 0)
    }

    /// Resume from an arbitrary position with `turn` turns already played.
    pub fn from_position(board: Board, turn: u32) -> Self {
        Self {
            board,
            turn,
            stage: Stage::AwaitingPiece,
            captures: [0; 2],
        }
    }

    /// Twelve men per side on the dark squares (`x + y` odd).
    pub fn starting_board() -> Board {
        let mut board = Board::square(CHECKERS_SIZE);
        for (rows, player) in [
            (CHECKERS_P1_ROWS, Player::One),
            (CHECKERS_P2_ROWS, Player::Two),
        ] {
            for y in rows {
                for x in (0..CHECKERS_SIZE).filter(|x| (x + y) % 2 == 1) {
                    board.set((x, y), Cell::man(player));
                }
            }
        }
        board
    }

    pub fn to_move(&self) -> Player {
        Player::from_turn(self.turn)
    }

    /// Destinations currently highlighted.
    pub fn offered(&self) -> &[Move] {
        match &self.stage {
            Stage::AwaitingPiece => &[],
            Stage::Selected { moves, .. } => moves,
            Stage::Chain { jumps, .. } => jumps,
        }
    }

    /// The selected piece, if any.
    pub fn selected(&self) -> Option<Point> {
        match self.stage {
            Stage::AwaitingPiece => None,
            Stage::Selected { from, .. } => Some(from),
            Stage::Chain { head, .. } => Some(head),
        }
    }

    /// The piece that is in the middle of a multi-jump.
    pub fn chain_head(&self) -> Option<Point> {
        match self.stage {
            Stage::Chain { head, .. } => Some(head),
            _ => None,
        }
    }

    fn piece_color(cell: Cell) -> Color {
        match cell {
            Cell::Empty => Color::Off,
            Cell::Piece {
                owner: Player::One,
                rank: Rank::Man,
            } => Color::Red,
            Cell::Piece {
                owner: Player::One,
                rank: Rank::King,
            } => Color::Orange,
            Cell::Piece {
                owner: Player::Two,
                rank: Rank::Man,
            } => Color::Blue,
            Cell::Piece {
                owner: Player::Two,
                rank: Rank::King,
            } => Color::Purple,
        }
    }

    fn paint(&self, shell: &mut dyn GameShell) {
        for pt in self.board.points() {
            shell.set_cell_color(pt, Self::piece_color(self.board.get(pt)));
        }
        let highlight = match self.stage {
            Stage::Chain { .. } => Color::Pink,
            _ => Color::Yellow,
        };
        for mv in self.offered() {
            shell.set_cell_color(mv.to, highlight);
        }
    }

    /// Pieces taken by `player` so far.
    pub fn captures(&self, player: Player) -> u32 {
        self.captures[player.index()]
    }

    fn play(&mut self, mv: Move, shell: &mut dyn GameShell) -> Outcome {
        let player = self.to_move();
        let effect = apply_move(&mut self.board, mv);
        if let Some(taken) = effect.captured {
            debug!(?mv, ?taken, "piece captured");
            self.captures[player.index()] += 1;
            shell.set_score(player, self.captures[player.index()]);
        }
        if effect.promoted {
            debug!(at = ?mv.to, %player, "piece crowned");
        }

        let opponent = player.opponent();
        if self.board.pieces(opponent) == 0 {
            self.stage = Stage::AwaitingPiece;
            self.paint(shell);
            return Outcome::Finished(Verdict::Winner(player));
        }

        if mv.is_jump() {
            let jumps = jumps_from(&self.board, mv.to);
            if !jumps.is_empty() {
                self.stage = Stage::Chain { head: mv.to, jumps };
                self.paint(shell);
                return Outcome::Continue;
            }
        }

        self.stage = Stage::AwaitingPiece;
        self.turn += 1;
        self.paint(shell);

        if !has_any_move(&self.board, opponent) {
            debug!(%opponent, "no legal move left");
            return Outcome::Finished(Verdict::Winner(player));
        }
        Outcome::TurnPassed { to: opponent }
    }
}

impl Game for Checkers {
    fn name(&self) -> &'static str {
        "checkers"
    }

    fn dimensions(&self) -> (usize, usize) {
        (CHECKERS_SIZE, CHECKERS_SIZE)
    }

    fn turn_seconds(&self) -> Option<u32> {
        Some(CHECKERS_TURN_SECONDS)
    }

    fn start(&mut self, shell: &mut dyn GameShell) {
        *self = Self::new();
        self.paint(shell);
    }

    fn cell_pressed(&mut self, pt: Point, shell: &mut dyn GameShell) -> Outcome {
        let player = self.to_move();

        if let Stage::Chain { jumps, .. } = &self.stage {
            let Some(mv) = jumps.iter().find(|mv| mv.to == pt).copied() else {
                return Outcome::Denied(MoveError::ChainPending);
            };
            return self.play(mv, shell);
        }

        if self.board.get(pt).owner() == Some(player) {
            let moves = legal_moves(&self.board, pt, player);
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
