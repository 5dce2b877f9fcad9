//! Go on a 9x9 grid.
//!
//! Stones are placed on empty points. Opponent strings left without
//! liberties are removed and counted as captures. Suicide is refused, as is
//! the immediate retake of a single-stone ko. Two passes in a row end the
//! game; each side then adds the empty regions only it surrounds.

use std::collections::VecDeque;

use tracing::debug;

use crate::board::{Board, Cell, Player, Point};
use crate::constants::{GO_PASSES_TO_END, GO_SIZE, GO_TURN_SECONDS};
use crate::session::{AuxButton, Game, MoveError, Outcome, Verdict};
use crate::shell::{Color, GameShell};

/// All stones orthogonally connected to `start` with the same owner,
/// collected breadth-first.
pub fn collect_string(board: &Board, start: Point) -> Vec<Point> {
    let owner = board.get(start).owner();
    let mut visited = vec![false; board.cell_count()];
    let mut frontier = VecDeque::from([start]);
    visited[board.flat_index(start)] = true;
    let mut stones = Vec::new();

    while let Some(pt) = frontier.pop_front() {
        stones.push(pt);
        for n in board.orthogonal_neighbors(pt) {
            let i = board.flat_index(n);
            if !visited[i] && board.get(n).owner() == owner {
                visited[i] = true;
                frontier.push_back(n);
            }
        }
    }
    stones
}

/// Number of distinct empty points touching any of `stones`.
pub fn liberties(board: &Board, stones: &[Point]) -> usize {
    let mut seen = vec![false; board.cell_count()];
    let mut count = 0;
    for &pt in stones {
        for n in board.orthogonal_neighbors(pt) {
            let i = board.flat_index(n);
            if !seen[i] && board.get(n).is_empty() {
                seen[i] = true;
                count += 1;
            }
        }
    }
    count
}

/// Empty region containing `start`, and whether it borders a stone of
/// `rival`.
fn empty_region(board: &Board, start: Point, rival: Player) -> (Vec<Point>, bool) {
    let mut visited = vec![false; board.cell_count()];
    let mut frontier = VecDeque::from([start]);
    visited[board.flat_index(start)] = true;
    let mut region = Vec::new();
    let mut touches_rival = false;

    while let Some(pt) = frontier.pop_front() {
        region.push(pt);
        for n in board.orthogonal_neighbors(pt) {
            match board.get(n) {
                Cell::Empty => {
                    let i = board.flat_index(n);
                    if !visited[i] {
                        visited[i] = true;
                        frontier.push_back(n);
                    }
                }
                cell if cell.owner() == Some(rival) => touches_rival = true,
                _ => {}
            }
        }
    }
    (region, touches_rival)
}

pub struct Go {
    board: Board,
    turn: u32,
    passes: u8,
    scores: [u32; 2],
    /// Point the player to move may not play on.
    ko: Option<Point>,
}

impl Default for Go {
    fn default() -> Self {
        Self::new()
    }
}

impl Go {
    pub fn new() -> Self {
        Self::from_board(Board::square(GO_SIZE), 0)
    }

    pub fn from_board(board: Board, turn: u32) -> Self {
        Self {
            board,
            turn,
            passes: 0,
            scores: [0; 2],
            ko: None,
        }
    }

    pub fn to_move(&self) -> Player {
        Player::from_turn(self.turn)
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    pub fn ko(&self) -> Option<Point> {
        self.ko
    }

    pub fn passes(&self) -> u8 {
        self.passes
    }

    /// Place a stone for the player to move and resolve captures. Returns
    /// the captured points. The board is untouched on error.
    pub fn place_stone(&mut self, pt: Point) -> Result<Vec<Point>, MoveError> {
        if !self.board.get(pt).is_empty() {
            return Err(MoveError::Occupied);
        }
        if self.ko == Some(pt) {
            return Err(MoveError::Ko);
        }

        let player = self.to_move();
        let rival = player.opponent();
        self.board.set(pt, Cell::man(player));

        let mut captured = Vec::new();
        let neighbors: Vec<Point> = self.board.orthogonal_neighbors(pt).collect();
        for n in neighbors {
            // Strings already removed through another neighbor read as empty.
            if self.board.get(n).owner() != Some(rival) {
                continue;
            }
            let string = collect_string(&self.board, n);
            if liberties(&self.board, &string) == 0 {
                for &stone in &string {
                    self.board.set(stone, Cell::Empty);
                }
                captured.extend(string);
            }
        }

        let own = collect_string(&self.board, pt);
        let own_liberties = liberties(&self.board, &own);
        if captured.is_empty() && own_liberties == 0 {
            self.board.set(pt, Cell::Empty);
            return Err(MoveError::Suicide);
        }

        self.ko = if captured.len() == 1 && own.len() == 1 && own_liberties == 1 {
            Some(captured[0])
        } else {
            None
        };
        self.scores[player.index()] += captured.len() as u32;
        if !captured.is_empty() {
            debug!(%player, stones = captured.len(), ko = ?self.ko, "captured");
        }
        Ok(captured)
    }

    /// Territory for `player`: empty regions next to its stones that touch
    /// no rival stone. Each region is claimed once per player.
    pub fn territory(&self, player: Player) -> Vec<Point> {
        let mut claimed = vec![false; self.board.cell_count()];
        let mut territory = Vec::new();
        for pt in self.board.points() {
            if self.board.get(pt).owner() != Some(player) {
                continue;
            }
            for n in self.board.orthogonal_neighbors(pt) {
                if !self.board.get(n).is_empty() || claimed[self.board.flat_index(n)] {
                    continue;
                }
                let (region, touches_rival) = empty_region(&self.board, n, player.opponent());
                for &cell in &region {
                    claimed[self.board.flat_index(cell)] = true;
                }
                if !touches_rival {
                    territory.extend(region);
                }
            }
        }
        territory
    }

    fn count_territory(&mut self, shell: &mut dyn GameShell) -> Verdict {
        for player in [Player::One, Player::Two] {
            let territory = self.territory(player);
            let shade = match player {
                Player::One => Color::DarkRed,
                Player::Two => Color::DarkBlue,
            };
            for &pt in &territory {
                shell.set_cell_color(pt, shade);
            }
            self.scores[player.index()] += territory.len() as u32;
            shell.set_score(player, self.score(player));
        }

        let [one, two] = self.scores;
        debug!(one, two, "final score");
        match one.cmp(&two) {
            std::cmp::Ordering::Greater => Verdict::Winner(Player::One),
            std::cmp::Ordering::Less => Verdict::Winner(Player::Two),
            std::cmp::Ordering::Equal => Verdict::Tie,
        }
    }
}

impl Game for Go {
    fn name(&self) -> &'static str {
        "go"
    }

    fn dimensions(&self) -> (usize, usize) {
        (GO_SIZE, GO_SIZE)
    }

    fn turn_seconds(&self) -> Option<u32> {
        Some(GO_TURN_SECONDS)
    }

    fn start(&mut self, shell: &mut dyn GameShell) {
        *self = Self::new();
        shell.illuminate_board(Color::Off);
    }

    fn cell_pressed(&mut self, pt: Point, shell: &mut dyn GameShell) -> Outcome {
        let player = self.to_move();
        let captured = match self.place_stone(pt) {
            Ok(captured) => captured,
            Err(err) => return Outcome::Denied(err),
        };

        shell.set_cell_color(pt, Color::of(player));
        for &stone in &captured {
            shell.set_cell_color(stone, Color::Off);
        }
        if !captured.is_empty() {
            shell.set_score(player, self.score(player));
        }

        self.passes = 0;
        self.turn += 1;
        Outcome::TurnPassed {
            to: player.opponent(),
        }
    }

    fn aux_pressed(&mut self, button: AuxButton, shell: &mut dyn GameShell) -> Outcome {
        match button {
            AuxButton::Pass => {
                let player = self.to_move();
                self.passes += 1;
                self.turn += 1;
                self.ko = None;
                debug!(%player, passes = self.passes, "pass");
                if self.passes >= GO_PASSES_TO_END {
                    return Outcome::Finished(self.count_territory(shell));
                }
                Outcome::TurnPassed {
                    to: player.opponent(),
                }
            }
            AuxButton::Replay => Outcome::Denied(MoveError::Unsupported),
        }
    }

    fn board(&self) -> &Board {
        &self.board
    }

    fn turn(&self) -> u32 {
        self.turn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MemoryShell;

    fn shell() -> MemoryShell {
        let mut shell = MemoryShell::new();
        shell.set_board_dimensions(GO_SIZE, GO_SIZE);
        shell
    }

    /// Alternate presses starting with Player One.
    fn play(game: &mut Go, shell: &mut MemoryShell, moves: &[Point]) {
        for &pt in moves {
            let outcome = game.cell_pressed(pt, shell);
            assert!(
                matches!(outcome, Outcome::TurnPassed { .. }),
                "{pt:?} was refused: {outcome:?}"
            );
        }
    }

    #[test]
    fn test_collect_string_and_liberties() {
        let mut board = Board::square(GO_SIZE);
        for pt in [(0, 0), (1, 0), (1, 1)] {
            board.set(pt, Cell::man(Player::One));
        }
        board.set((2, 0), Cell::man(Player::Two));
        let mut string = collect_string(&board, (0, 0));
        string.sort();
        assert_eq!(string, vec![(0, 0), (1, 0), (1, 1)]);
        // (0, 1), (2, 1) and (1, 2); (0, 1) borders two stones but counts once.
        assert_eq!(liberties(&board, &string), 3);
    }

    #[test]
    fn test_occupied_is_denied() {
        let mut game = Go::new();
        let mut shell = shell();
        play(&mut game, &mut shell, &[(4, 4)]);
        assert_eq!(
            game.cell_pressed((4, 4), &mut shell),
            Outcome::Denied(MoveError::Occupied)
        );
        assert_eq!(game.turn(), 1);
    }

    #[test]
    fn test_single_stone_capture() {
        let mut game = Go::new();
        let mut shell = shell();
        play(
            &mut game,
            &mut shell,
            &[
                (4, 4),
                (3, 4),
                (0, 0),
                (5, 4),
                (0, 8),
                (4, 3),
                (8, 0),
                (4, 5),
            ],
        );
        assert!(game.board().get((4, 4)).is_empty());
        assert_eq!(game.score(Player::Two), 1);
        assert_eq!(shell.scores, [0, 1]);
        assert_eq!(shell.cell_color((4, 4)), Color::Off);
        assert_eq!(shell.cell_color((4, 5)), Color::Blue);
    }

    #[test]
    fn test_capture_string_counts_every_stone() {
        let mut board = Board::square(GO_SIZE);
        for pt in [(0, 0), (1, 0)] {
            board.set(pt, Cell::man(Player::Two));
        }
        for pt in [(0, 1), (1, 1)] {
            board.set(pt, Cell::man(Player::One));
        }
        let mut game = Go::from_board(board, 0);
        let captured = game.place_stone((2, 0)).unwrap();
        assert_eq!(captured.len(), 2);
        assert_eq!(game.score(Player::One), 2);
        assert_eq!(game.ko(), None);
    }

    #[test]
    fn test_suicide_is_denied() {
        let mut game = Go::new();
        let mut shell = shell();
        play(&mut game, &mut shell, &[(8, 8), (1, 0), (8, 7), (0, 1)]);
        let before = game.board().clone();
        assert_eq!(
            game.cell_pressed((0, 0), &mut shell),
            Outcome::Denied(MoveError::Suicide)
        );
        assert_eq!(game.board(), &before);
        assert_eq!(game.turn(), 4);
    }

    #[test]
    fn test_capture_beats_suicide() {
        let mut board = Board::square(GO_SIZE);
        board.set((0, 0), Cell::man(Player::Two));
        board.set((0, 1), Cell::man(Player::One));
        board.set((2, 0), Cell::man(Player::Two));
        board.set((1, 1), Cell::man(Player::Two));
        // One plays (1, 0): no liberties of its own, but it takes (0, 0).
        let mut game = Go::from_board(board, 0);
        let captured = game.place_stone((1, 0)).unwrap();
        assert_eq!(captured, vec![(0, 0)]);
        assert_eq!(game.ko(), Some((0, 0)));
    }

    #[test]
    fn test_ko_retake_waits_one_move_pair() {
        let mut game = Go::new();
        let mut shell = shell();
        play(
            &mut game,
            &mut shell,
            &[
                (1, 0),
                (2, 0),
                (0, 1),
                (1, 1),
                (1, 2),
                (3, 1),
                (8, 8),
                (2, 2),
                (2, 1),
            ],
        );
        assert!(game.board().get((1, 1)).is_empty());
        assert_eq!(game.ko(), Some((1, 1)));

        assert_eq!(
            game.cell_pressed((1, 1), &mut shell),
            Outcome::Denied(MoveError::Ko)
        );
        assert_eq!(game.to_move(), Player::Two);

        play(&mut game, &mut shell, &[(7, 7), (6, 6), (1, 1)]);
        assert!(game.board().get((2, 1)).is_empty());
        assert_eq!(game.score(Player::Two), 1);
    }

    #[test]
    fn test_pass_clears_ko() {
        let mut game = Go::new();
        let mut shell = shell();
        play(
            &mut game,
            &mut shell,
            &[
                (1, 0),
                (2, 0),
                (0, 1),
                (1, 1),
                (1, 2),
                (3, 1),
                (8, 8),
                (2, 2),
                (2, 1),
            ],
        );
        assert_eq!(
            game.aux_pressed(AuxButton::Pass, &mut shell),
            Outcome::TurnPassed { to: Player::One }
        );
        assert_eq!(game.ko(), None);
        assert_eq!(game.passes(), 1);
        play(&mut game, &mut shell, &[(6, 6)]);
        assert_eq!(game.passes(), 0);
    }

    #[test]
    fn test_two_passes_on_empty_board_tie() {
        let mut game = Go::new();
        let mut shell = shell();
        game.aux_pressed(AuxButton::Pass, &mut shell);
        assert_eq!(
            game.aux_pressed(AuxButton::Pass, &mut shell),
            Outcome::Finished(Verdict::Tie)
        );
    }

    #[test]
    fn test_territory_needs_single_owner() {
        let mut board = Board::square(GO_SIZE);
        for y in 0..GO_SIZE {
            board.set((1, y), Cell::man(Player::One));
        }
        board.set((5, 5), Cell::man(Player::Two));
        let mut game = Go::from_board(board, 0);
        let mut shell = shell();

        assert_eq!(game.territory(Player::One).len(), 9);
        assert!(game.territory(Player::Two).is_empty());

        game.aux_pressed(AuxButton::Pass, &mut shell);
        assert_eq!(
            game.aux_pressed(AuxButton::Pass, &mut shell),
            Outcome::Finished(Verdict::Winner(Player::One))
        );
        assert_eq!(shell.scores, [9, 0]);
        assert_eq!(shell.cell_color((0, 4)), Color::DarkRed);
        assert_eq!(shell.cell_color((4, 4)), Color::Off);
    }

    #[test]
    fn test_territory_adds_to_captures() {
        let mut board = Board::square(GO_SIZE);
        for x in 0..GO_SIZE {
            board.set((x, 7), Cell::man(Player::Two));
        }
        board.set((4, 3), Cell::man(Player::One));
        let mut game = Go::from_board(board, 0);
        game.scores = [3, 0];
        let mut shell = shell();
        game.aux_pressed(AuxButton::Pass, &mut shell);
        // Row 8 is Blue's: 9 points against Red's 3 captures.
        assert_eq!(
            game.aux_pressed(AuxButton::Pass, &mut shell),
            Outcome::Finished(Verdict::Winner(Player::Two))
        );
        assert_eq!(shell.scores, [3, 9]);
    }
}
