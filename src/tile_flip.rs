//! Tile Flip, the single-player lights-out puzzle.
//!
//! Pressing a tile toggles it and its orthogonal neighbors. The puzzle is
//! solved once every tile is lit. Scrambles are made of real presses so a
//! solution always exists.
//!
//! Crazy Tile Flip is the same puzzle on a fixed 5x5 board with no setup
//! options. A short scramble starts it, random presses land every ten
//! seconds, and the score counts down from 1000 with each press.

use fastrand::Rng;
use tracing::{debug, info};

use crate::board::{Board, Player, Point};
use crate::constants::{
    CRAZY_TILE_FLIP_BURST, CRAZY_TILE_FLIP_MAX_SCRAMBLE, CRAZY_TILE_FLIP_SIZE,
    CRAZY_TILE_FLIP_START_SCORE, TILE_FLIP_DEFAULT_SIZE, TILE_FLIP_MAX_SIZE, TILE_FLIP_MIN_SIZE, TILE_FLIP_RANDOM_BURST,
    TILE_FLIP_RANDOM_PERIOD_MS, TILE_FLIP_RANDOM_TIMER, TILE_FLIP_RANDOMNESS,
};
use crate::session::{Game, Outcome, Verdict};
use crate::shell::{
    Color, CountMode, GameShell, MenuEntry, MenuLabel, MenuParam, Message, Sound,
};

pub const SLOT_BOARD_SIZE: u8 = 2;
pub const SLOT_RANDOM_START: u8 = 3;
pub const SLOT_RANDOM_MOVES: u8 = 4;

/// Menu text for each entry of `TILE_FLIP_RANDOMNESS`.
const RANDOMNESS_NAMES: [&str; 4] = ["off", "low", "medium", "high"];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Variant {
    Classic,
    Crazy,
}

pub struct TileFlip {
    variant: Variant,
    /// Always empty; gives the grid its bounds.
    board: Board,
    /// Row-major lit flags, indexed by `board.flat_index`.
    lit: Vec<bool>,
    size: usize,
    randomness: usize,
    random_moves: bool,
    presses: u32,
    scramble: Vec<Point>,
    rng: Rng,
}

impl Default for TileFlip {
    fn default() -> Self {
        Self::new()
    }
}

impl TileFlip {
    pub fn new() -> Self {
        Self::with_rng(Rng::new())
    }

    /// A puzzle whose scrambles and random moves replay for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Rng::with_seed(seed))
    }

    /// Crazy Tile Flip.
    pub fn crazy() -> Self {
        Self::crazy_with_rng(Rng::new())
    }

    pub fn crazy_with_seed(seed: u64) -> Self {
        Self::crazy_with_rng(Rng::with_seed(seed))
    }

    fn crazy_with_rng(rng: Rng) -> Self {
        let mut game = Self::with_rng(rng);
        game.variant = Variant::Crazy;
        game.resize(CRAZY_TILE_FLIP_SIZE);
        game.random_moves = true;
        game
    }

    fn with_rng(rng: Rng) -> Self {
        Self {
            variant: Variant::Classic,
            board: Board::square(TILE_FLIP_DEFAULT_SIZE),
            lit: vec![false; TILE_FLIP_DEFAULT_SIZE * TILE_FLIP_DEFAULT_SIZE],
            size: TILE_FLIP_DEFAULT_SIZE,
            randomness: 0,
            random_moves: false,
            presses: 0,
            scramble: Vec::new(),
            rng,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Random presses per scramble will fall in `[r, 2r]` for this `r`.
    pub fn randomness(&self) -> usize {
        TILE_FLIP_RANDOMNESS[self.randomness]
    }

    pub fn random_moves(&self) -> bool {
        self.random_moves
    }

    /// Player presses since the start.
    pub fn presses(&self) -> u32 {
        self.presses
    }

    /// Presses the scramble made before the player took over.
    pub fn scramble(&self) -> &[Point] {
        &self.scramble
    }

    pub fn is_crazy(&self) -> bool {
        self.variant == Variant::Crazy
    }

    pub fn is_lit(&self, pt: Point) -> bool {
        self.lit[self.board.flat_index(pt)]
    }

    pub fn lit_count(&self) -> usize {
        self.lit.iter().filter(|&&on| on).count()
    }

    pub fn solved(&self) -> bool {
        self.lit.iter().all(|&on| on)
    }

    /// Value shown on the LCD score.
    pub fn score(&self) -> u32 {
        match self.variant {
            Variant::Classic => self.presses,
            Variant::Crazy => CRAZY_TILE_FLIP_START_SCORE.saturating_sub(self.presses),
        }
    }

    fn resize(&mut self, size: usize) {
        self.size = size;
        self.board = Board::square(size);
        self.lit = vec![false; size * size];
    }

    fn lit_color(&self) -> Color {
        match self.variant {
            Variant::Classic => Color::White,
            Variant::Crazy => Color::Pink,
        }
    }

    fn flip(&mut self, pt: Point, shell: &mut dyn GameShell) {
        let on = self.lit_color();
        let mut cells = vec![pt];
        cells.extend(self.board.orthogonal_neighbors(pt));
        for cell in cells {
            let i = self.board.flat_index(cell);
            self.lit[i] = !self.lit[i];
            shell.set_cell_color(cell, if self.lit[i] { on } else { Color::Off });
        }
    }

    fn random_point(&mut self) -> Point {
        (self.rng.usize(..self.size), self.rng.usize(..self.size))
    }

    /// Presses in a fresh scramble.
    fn scramble_len(&mut self) -> usize {
        match self.variant {
            Variant::Classic => {
                let r = self.randomness();
                self.rng.usize(r..=2 * r)
            }
            Variant::Crazy => self.rng.usize(..=CRAZY_TILE_FLIP_MAX_SCRAMBLE),
        }
    }

    /// Presses made by one random-moves tick.
    fn burst_len(&mut self) -> usize {
        match self.variant {
            Variant::Classic => self.rng.usize(..TILE_FLIP_RANDOM_BURST),
            Variant::Crazy => CRAZY_TILE_FLIP_BURST,
        }
    }

    fn celebrate(&mut self, shell: &mut dyn GameShell) -> Outcome {
        let sound = if self.size == TILE_FLIP_MAX_SIZE {
            Sound::MajorVictory
        } else {
            Sound::Victory
        };
        shell.play_sound(sound);
        shell.illuminate_board(Color::Yellow);
        info!(size = self.size, presses = self.presses, "puzzle solved");
        Outcome::Finished(Verdict::Solved)
    }
}

impl Game for TileFlip {
    fn name(&self) -> &'static str {
        match self.variant {
            Variant::Classic => "tile-flip",
            Variant::Crazy => "crazy-tile-flip",
        }
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.size, self.size)
    }

    fn setup_options(&self) -> Vec<MenuEntry> {
        if self.is_crazy() {
            return Vec::new();
        }
        vec![
            MenuEntry::new(
                SLOT_BOARD_SIZE,
                MenuLabel::BoardSize,
                MenuParam::Int(self.size as i32),
            ),
            MenuEntry::new(
                SLOT_RANDOM_START,
                MenuLabel::RandomStart,
                MenuParam::Text(RANDOMNESS_NAMES[self.randomness]),
            ),
            MenuEntry::new(
                SLOT_RANDOM_MOVES,
                MenuLabel::RandomMoves,
                MenuParam::switch(self.random_moves),
            ),
        ]
    }

    fn configure(&mut self, slot: u8) -> bool {
        if self.is_crazy() {
            return false;
        }
        match slot {
            SLOT_BOARD_SIZE => {
                let size = if self.size >= TILE_FLIP_MAX_SIZE {
                    TILE_FLIP_MIN_SIZE
                } else {
                    self.size + 1
                };
                self.resize(size);
            }
            SLOT_RANDOM_START => {
                self.randomness = (self.randomness + 1) % TILE_FLIP_RANDOMNESS.len();
            }
            SLOT_RANDOM_MOVES => self.random_moves = !self.random_moves,
            _ => return false,
        }
        true
    }

    fn start(&mut self, shell: &mut dyn GameShell) {
        self.resize(self.size);
        self.presses = 0;
        self.scramble.clear();
        shell.illuminate_board(Color::Off);
        shell.set_countdown(Player::One, 0);
        shell.set_countdown_mode(Player::One, CountMode::CountUp);

        let count = self.scramble_len();
        for _ in 0..count {
            let pt = self.random_point();
            self.flip(pt, shell);
            self.scramble.push(pt);
        }
        debug!(count, size = self.size, "scrambled");

        shell.set_score(Player::One, self.score());
        if self.random_moves {
            shell.start_timer(TILE_FLIP_RANDOM_TIMER, TILE_FLIP_RANDOM_PERIOD_MS, true);
        }
    }

    fn suspend(&mut self, shell: &mut dyn GameShell) {
        shell.set_countdown_mode(Player::One, CountMode::Paused);
        shell.kill_timer(TILE_FLIP_RANDOM_TIMER);
    }

    fn cell_pressed(&mut self, pt: Point, shell: &mut dyn GameShell) -> Outcome {
        self.flip(pt, shell);
        self.presses += 1;
        shell.set_score(Player::One, self.score());
        shell.play_sound(Sound::Flip);
        shell.set_message(Message::TileFlipped);

        if self.solved() {
            return self.celebrate(shell);
        }
        Outcome::Continue
    }

    fn timer_fired(&mut self, id: u8, shell: &mut dyn GameShell) -> Outcome {
        if id != TILE_FLIP_RANDOM_TIMER || !self.random_moves {
            return Outcome::Ignored;
        }
        let burst = self.burst_len();
        debug!(burst, "random moves");
        for _ in 0..burst {
            let pt = self.random_point();
            self.flip(pt, shell);
        }
        if burst == 0 {
            return Outcome::Ignored;
        }
        shell.play_sound(Sound::Flip);
        if self.solved() {
            return self.celebrate(shell);
        }
        Outcome::Continue
    }

    fn board(&self) -> &Board {
        &self.board
    }

    fn turn(&self) -> u32 {
        self.presses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{HostTimer, MemoryShell};

    fn started(mut game: TileFlip) -> (TileFlip, MemoryShell) {
        let mut shell = MemoryShell::new();
        shell.set_board_dimensions(game.size(), game.size());
        game.start(&mut shell);
        (game, shell)
    }

    fn lit(game: &TileFlip) -> usize {
        game.board().points().filter(|&pt| game.is_lit(pt)).count()
    }

    fn small() -> TileFlip {
        let mut game = TileFlip::with_seed(7);
        // 5 -> 6 -> 7 -> 8 -> 9 -> 3
        for _ in 0..5 {
            game.configure(SLOT_BOARD_SIZE);
        }
        assert_eq!(game.size(), 3);
        game
    }

    #[test]
    fn test_press_toggles_plus_shape() {
        let (mut game, mut shell) = started(TileFlip::with_seed(1));
        assert_eq!(game.cell_pressed((2, 2), &mut shell), Outcome::Continue);
        assert_eq!(lit(&game), 5);
        assert!(game.is_lit((2, 1)));
        assert!(!game.is_lit((1, 1)));
        assert_eq!(shell.cell_color((3, 2)), Color::White);

        game.cell_pressed((0, 0), &mut shell);
        assert_eq!(lit(&game), 8);
        game.cell_pressed((2, 2), &mut shell);
        assert_eq!(lit(&game), 3);
        assert_eq!(shell.scores[0], 3);
        assert_eq!(shell.message, Some(Message::TileFlipped));
        assert_eq!(shell.last_sound(), Some(Sound::Flip));
    }

    #[test]
    fn test_size_cycles_through_range() {
        let mut game = TileFlip::new();
        let mut seen = Vec::new();
        for _ in 0..7 {
            game.configure(SLOT_BOARD_SIZE);
            seen.push(game.size());
        }
        assert_eq!(seen, vec![6, 7, 8, 9, 3, 4, 5]);
        assert!(!game.configure(9));
    }

    #[test]
    fn test_setup_options_reflect_configuration() {
        let mut game = TileFlip::new();
        game.configure(SLOT_RANDOM_START);
        game.configure(SLOT_RANDOM_START);
        game.configure(SLOT_RANDOM_MOVES);
        let options = game.setup_options();
        assert_eq!(options[0].param, MenuParam::Int(5));
        assert_eq!(options[1].param, MenuParam::Text("medium"));
        assert_eq!(options[2].param, MenuParam::switch(true));
        assert_eq!(game.randomness(), 20);
    }

    #[test]
    fn test_solving_three_by_three() {
        let (mut game, mut shell) = started(small());
        assert!(game.scramble().is_empty());
        // Corners and center light every tile of an empty 3x3 grid.
        for pt in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            assert_eq!(game.cell_pressed(pt, &mut shell), Outcome::Continue);
        }
        assert_eq!(
            game.cell_pressed((1, 1), &mut shell),
            Outcome::Finished(Verdict::Solved)
        );
        assert_eq!(shell.lit(Color::Yellow), 9);
        assert_eq!(shell.last_sound(), Some(Sound::Victory));
        assert_eq!(game.presses(), 5);
    }

    #[test]
    fn test_seeded_scramble_replays() {
        let mut a = small();
        let mut b = small();
        for game in [&mut a, &mut b] {
            for _ in 0..3 {
                game.configure(SLOT_RANDOM_START);
            }
        }
        let (a, _) = started(a);
        let (mut b, mut shell) = started(b);
        assert_eq!(a.scramble(), b.scramble());
        assert!(a.scramble().len() >= 30 && a.scramble().len() <= 60);

        // Presses commute and cancel in pairs. Undo the scramble by parity,
        // then add the corners-and-center solution.
        let mut pending = vec![false; 9];
        for &(x, y) in b.scramble() {
            pending[y * 3 + x] ^= true;
        }
        for (x, y) in [(0, 0), (2, 0), (0, 2), (2, 2), (1, 1)] {
            pending[y * 3 + x] ^= true;
        }
        let presses: Vec<Point> = b
            .board()
            .points()
            .filter(|&(x, y)| pending[y * 3 + x])
            .collect();
        if presses.is_empty() {
            assert!(b.solved());
            return;
        }
        let (last, rest) = presses.split_last().unwrap();
        for &pt in rest {
            assert_eq!(b.cell_pressed(pt, &mut shell), Outcome::Continue);
        }
        assert_eq!(
            b.cell_pressed(*last, &mut shell),
            Outcome::Finished(Verdict::Solved)
        );
    }

    #[test]
    fn test_random_moves_timer() {
        let mut game = TileFlip::with_seed(3);
        game.configure(SLOT_RANDOM_MOVES);
        let (mut game, mut shell) = started(game);
        assert_eq!(
            shell.timers.get(&TILE_FLIP_RANDOM_TIMER).map(|t| t.repeating),
            Some(true)
        );
        assert_eq!(shell.countdown_modes[0], CountMode::CountUp);

        for _ in 0..5 {
            game.timer_fired(TILE_FLIP_RANDOM_TIMER, &mut shell);
        }
        assert_eq!(game.presses(), 0);
        assert_eq!(game.timer_fired(9, &mut shell), Outcome::Ignored);

        game.suspend(&mut shell);
        assert!(shell.timers.is_empty());
        assert_eq!(shell.countdown_modes[0], CountMode::Paused);
    }

    #[test]
    fn test_random_moves_off_ignores_timer() {
        let (mut game, mut shell) = started(TileFlip::with_seed(3));
        assert!(shell.timers.is_empty());
        assert_eq!(
            game.timer_fired(TILE_FLIP_RANDOM_TIMER, &mut shell),
            Outcome::Ignored
        );
        assert_eq!(lit(&game), 0);
    }

    #[test]
    fn test_lit_tiles_stay_off_the_piece_board() {
        let (mut game, mut shell) = started(TileFlip::with_seed(1));
        game.cell_pressed((0, 0), &mut shell);
        assert_eq!(game.lit_count(), 3);
        assert_eq!(lit(&game), 3);
        assert!(game.board().pieces(Player::One) == 0 && game.board().pieces(Player::Two) == 0);
    }

    #[test]
    fn test_crazy_start() {
        let (game, shell) = started(TileFlip::crazy_with_seed(5));
        assert_eq!(game.name(), "crazy-tile-flip");
        assert_eq!(game.size(), 5);
        assert!(game.setup_options().is_empty());
        assert!(game.scramble().len() <= 9);
        assert_eq!(shell.scores[0], 1000);
        assert_eq!(
            shell.timers.get(&TILE_FLIP_RANDOM_TIMER).copied(),
            Some(HostTimer {
                period_ms: 10_000,
                repeating: true
            })
        );
        // Scrambled tiles show pink.
        assert_eq!(shell.lit(Color::Pink), game.lit_count());
    }

    #[test]
    fn test_crazy_ignores_configuration() {
        let mut game = TileFlip::crazy();
        assert!(!game.configure(SLOT_BOARD_SIZE));
        assert!(!game.configure(SLOT_RANDOM_MOVES));
        assert_eq!(game.size(), 5);
        assert!(game.random_moves());
    }

    #[test]
    fn test_crazy_presses_cost_points() {
        let (mut game, mut shell) = started(TileFlip::crazy_with_seed(5));
        let before = game.lit_count();
        for _ in 0..2 {
            game.cell_pressed((4, 4), &mut shell);
        }
        assert_eq!(game.lit_count(), before);
        assert_eq!(shell.scores[0], 998);
        assert_eq!(game.score(), 998);
    }

    #[test]
    fn test_crazy_tick_presses_twice() {
        let (mut game, mut shell) = started(TileFlip::crazy_with_seed(11));
        let before: Vec<bool> = game.lit.clone();
        let outcome = game.timer_fired(TILE_FLIP_RANDOM_TIMER, &mut shell);
        assert!(matches!(
            outcome,
            Outcome::Continue | Outcome::Finished(Verdict::Solved)
        ));
        // Two presses flip at least one tile unless the second undoes the first.
        let changed = before.iter().zip(&game.lit).filter(|(a, b)| a != b).count();
        assert!(changed == 0 || changed >= 2, "{changed}");
        assert_eq!(game.presses(), 0);
        assert_eq!(shell.scores[0], 1000);
    }
}
