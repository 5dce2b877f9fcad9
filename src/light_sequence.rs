//! Light Sequence, a single-player memory game.
//!
//! The console lights a sequence of cells one at a time and the player
//! presses them back in the same order. Each repeated sequence comes back
//! one light longer. The sequence is drawn from a stored seed, so showing it
//! and checking the player's presses replay the same cells.
//!
//! Three host timers drive the game: a repeating timer that alternately
//! lights and clears cells while the sequence is shown, a one-shot timer
//! that clears the player's last press, and a one-shot intermission before
//! the next, longer sequence.

use fastrand::Rng;
use tracing::{debug, info};

use crate::board::{Board, Player, Point};
use crate::constants::{
    LIGHT_SEQUENCE_CLEAR_TIMER, LIGHT_SEQUENCE_DEFAULT_DELAY_MS, LIGHT_SEQUENCE_DELAY_STEP_MS,
    LIGHT_SEQUENCE_INTERMISSION_MS, LIGHT_SEQUENCE_INTERMISSION_TIMER,
    LIGHT_SEQUENCE_MAX_CLEAR_MS, LIGHT_SEQUENCE_MAX_DELAY_MS, LIGHT_SEQUENCE_MIN_DELAY_MS,
    LIGHT_SEQUENCE_SHOW_TIMER, LIGHT_SEQUENCE_SIZES, LIGHT_SEQUENCE_START_LENGTH,
};
use crate::session::{AuxButton, Game, MoveError, Outcome, Verdict};
use crate::shell::{Color, CountMode, GameShell, MenuEntry, MenuLabel, MenuParam, Sound};

pub const SLOT_DIFFICULTY: u8 = 2;
pub const SLOT_ALLOW_REPEATS: u8 = 3;
pub const SLOT_DELAY: u8 = 4;

const DIFFICULTY_NAMES: [&str; 2] = ["low", "high"];

/// Each cell keeps its own color, row-major.
const PALETTE: [Color; 9] = [
    Color::Red,
    Color::Blue,
    Color::Orange,
    Color::Purple,
    Color::Pink,
    Color::Yellow,
    Color::White,
    Color::DarkRed,
    Color::DarkBlue,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Stage {
    /// The sequence is on display; `shown` lights so far.
    Showing { shown: u32 },
    /// The player is repeating it; `matched` presses were right.
    Input { matched: u32 },
    /// Repeated in full. The intermission timer starts the next sequence.
    Intermission,
}

/// Cell number `i` of a `size` x `size` grid.
fn cell(i: usize, size: usize) -> Point {
    (i % size, i / size)
}

fn next_cell(rng: &mut Rng, size: usize) -> Point {
    cell(rng.usize(..size * size), size)
}

pub struct LightSequence {
    /// Always empty; gives the grid its bounds.
    board: Board,
    difficulty: usize,
    allow_repeats: bool,
    delay_ms: u32,
    stage: Stage,
    length: u32,
    seed: u64,
    replay: Rng,
    lit: Option<Point>,
    presses: u32,
    rng: Rng,
}

impl Default for LightSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl LightSequence {
    pub fn new() -> Self {
        Self::with_rng(Rng::new())
    }

    /// A game whose sequences replay for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Rng::with_seed(seed))
    }

    fn with_rng(rng: Rng) -> Self {
        Self {
            board: Board::square(LIGHT_SEQUENCE_SIZES[0]),
            difficulty: 0,
            allow_repeats: false,
            delay_ms: LIGHT_SEQUENCE_DEFAULT_DELAY_MS,
            stage: Stage::Input { matched: 0 },
            length: LIGHT_SEQUENCE_START_LENGTH,
            seed: 0,
            replay: Rng::with_seed(0),
            lit: None,
            presses: 0,
            rng,
        }
    }

    pub fn size(&self) -> usize {
        LIGHT_SEQUENCE_SIZES[self.difficulty]
    }

    pub fn allow_repeats(&self) -> bool {
        self.allow_repeats
    }

    /// Wait between sequence lights in milliseconds.
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Lights in the sequence the player is working on.
    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn awaiting_input(&self) -> bool {
        matches!(self.stage, Stage::Input { .. })
    }

    /// The cell currently lit, if any.
    pub fn lit(&self) -> Option<Point> {
        self.lit
    }

    /// The current sequence in order.
    pub fn sequence(&self) -> Vec<Point> {
        let mut rng = Rng::with_seed(self.seed);
        (0..self.length)
            .map(|_| next_cell(&mut rng, self.size()))
            .collect()
    }

    fn color_of(&self, (x, y): Point) -> Color {
        PALETTE[y * self.size() + x]
    }

    /// Light `pt` and put out the previous light.
    fn display(&mut self, pt: Option<Point>, shell: &mut dyn GameShell) {
        if let Some(pt) = pt {
            shell.set_cell_color(pt, self.color_of(pt));
        }
        if let Some(last) = self.lit.filter(|&last| Some(last) != pt) {
            shell.set_cell_color(last, Color::Off);
        }
        self.lit = pt;
    }

    fn show_sequence(&mut self, shell: &mut dyn GameShell) {
        shell.kill_timer(LIGHT_SEQUENCE_CLEAR_TIMER);
        self.display(None, shell);
        self.replay = Rng::with_seed(self.seed);
        self.stage = Stage::Showing { shown: 0 };
        shell.start_timer(LIGHT_SEQUENCE_SHOW_TIMER, self.delay_ms / 2, true);
        debug!(length = self.length, "showing sequence");
    }

    fn show_tick(&mut self, shell: &mut dyn GameShell) -> Outcome {
        let Stage::Showing { shown } = self.stage else {
            return Outcome::Ignored;
        };
        if self.lit.is_some() {
            self.display(None, shell);
            if shown >= self.length {
                shell.kill_timer(LIGHT_SEQUENCE_SHOW_TIMER);
                self.replay = Rng::with_seed(self.seed);
                self.stage = Stage::Input { matched: 0 };
                debug!(length = self.length, "waiting for the player");
            }
        } else {
            let size = self.size();
            let pt = next_cell(&mut self.replay, size);
            self.display(Some(pt), shell);
            shell.play_sound(Sound::GameStart);
            self.stage = Stage::Showing { shown: shown + 1 };
        }
        Outcome::Continue
    }
}

impl Game for LightSequence {
    fn name(&self) -> &'static str {
        "light-sequence"
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.size(), self.size())
    }

    fn setup_options(&self) -> Vec<MenuEntry> {
        vec![
            MenuEntry::new(
                SLOT_DIFFICULTY,
                MenuLabel::Difficulty,
                MenuParam::Text(DIFFICULTY_NAMES[self.difficulty]),
            ),
            MenuEntry::new(
                SLOT_ALLOW_REPEATS,
                MenuLabel::AllowRepeats,
                MenuParam::switch(self.allow_repeats),
            ),
            MenuEntry::new(
                SLOT_DELAY,
                MenuLabel::WaitDuration,
                MenuParam::Int(self.delay_ms as i32),
            ),
        ]
    }

    fn configure(&mut self, slot: u8) -> bool {
        match slot {
            SLOT_DIFFICULTY => {
                self.difficulty = (self.difficulty + 1) % LIGHT_SEQUENCE_SIZES.len();
                self.board = Board::square(self.size());
            }
            SLOT_ALLOW_REPEATS => self.allow_repeats = !self.allow_repeats,
            SLOT_DELAY => {
                self.delay_ms = if self.delay_ms >= LIGHT_SEQUENCE_MAX_DELAY_MS {
                    LIGHT_SEQUENCE_MIN_DELAY_MS
                } else {
                    self.delay_ms + LIGHT_SEQUENCE_DELAY_STEP_MS
                };
            }
            _ => return false,
        }
        true
    }

    fn start(&mut self, shell: &mut dyn GameShell) {
        self.board = Board::square(self.size());
        self.seed = self.rng.u64(..);
        self.length = LIGHT_SEQUENCE_START_LENGTH;
        self.presses = 0;
        self.lit = None;
        shell.set_countdown_mode(Player::One, CountMode::Paused);
        shell.set_score(Player::One, self.length);
        self.show_sequence(shell);
    }

    fn suspend(&mut self, shell: &mut dyn GameShell) {
        shell.kill_timer(LIGHT_SEQUENCE_SHOW_TIMER);
        shell.kill_timer(LIGHT_SEQUENCE_CLEAR_TIMER);
        shell.kill_timer(LIGHT_SEQUENCE_INTERMISSION_TIMER);
    }

    fn cell_pressed(&mut self, pt: Point, shell: &mut dyn GameShell) -> Outcome {
        let Stage::Input { matched } = self.stage else {
            return Outcome::Denied(MoveError::SequencePlaying);
        };
        let size = self.size();
        let expected = next_cell(&mut self.replay, size);
        self.presses += 1;

        if pt != expected {
            info!(length = self.length, matched, "wrong light");
            shell.play_sound(Sound::Failure);
            return Outcome::Finished(Verdict::Failed);
        }

        self.display(Some(pt), shell);
        let matched = matched + 1;
        if matched < self.length {
            self.stage = Stage::Input { matched };
            shell.start_timer(LIGHT_SEQUENCE_CLEAR_TIMER, self.delay_ms / 2, false);
            shell.play_sound(Sound::Victory);
            return Outcome::Continue;
        }

        self.length += 1;
        info!(length = self.length, "sequence repeated");
        shell.set_score(Player::One, self.length);
        shell.play_sound(Sound::MajorVictory);
        self.stage = Stage::Intermission;
        shell.start_timer(
            LIGHT_SEQUENCE_INTERMISSION_TIMER,
            LIGHT_SEQUENCE_INTERMISSION_MS,
            false,
        );
        shell.start_timer(
            LIGHT_SEQUENCE_CLEAR_TIMER,
            self.delay_ms.min(LIGHT_SEQUENCE_MAX_CLEAR_MS),
            false,
        );
        Outcome::Continue
    }

    fn aux_pressed(&mut self, button: AuxButton, shell: &mut dyn GameShell) -> Outcome {
        match button {
            AuxButton::Pass => Outcome::Denied(MoveError::Unsupported),
            AuxButton::Replay if !self.allow_repeats => Outcome::Ignored,
            AuxButton::Replay if !self.awaiting_input() => {
                Outcome::Denied(MoveError::SequencePlaying)
            }
            AuxButton::Replay => {
                self.show_sequence(shell);
                Outcome::Continue
            }
        }
    }

    fn timer_fired(&mut self, id: u8, shell: &mut dyn GameShell) -> Outcome {
        match id {
            LIGHT_SEQUENCE_SHOW_TIMER => self.show_tick(shell),
            LIGHT_SEQUENCE_CLEAR_TIMER => {
                shell.kill_timer(id);
                if self.lit.is_none() {
                    return Outcome::Ignored;
                }
                self.display(None, shell);
                Outcome::Continue
            }
            LIGHT_SEQUENCE_INTERMISSION_TIMER => {
                shell.kill_timer(id);
                if self.stage != Stage::Intermission {
                    return Outcome::Ignored;
                }
                self.show_sequence(shell);
                Outcome::Continue
            }
            _ => Outcome::Ignored,
        }
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

    fn started(mut game: LightSequence) -> (LightSequence, MemoryShell) {
        let mut shell = MemoryShell::new();
        shell.set_board_dimensions(game.size(), game.size());
        game.start(&mut shell);
        (game, shell)
    }

    /// Fire the show timer until the player is up; returns the cells lit.
    fn watch(game: &mut LightSequence, shell: &mut MemoryShell) -> Vec<Point> {
        let mut shown = Vec::new();
        for _ in 0..100 {
            if game.awaiting_input() {
                break;
            }
            assert_eq!(
                game.timer_fired(LIGHT_SEQUENCE_SHOW_TIMER, shell),
                Outcome::Continue
            );
            if let Some(pt) = game.lit() {
                assert_eq!(shell.cell_color(pt), game.color_of(pt));
                shown.push(pt);
            }
        }
        shown
    }

    /// Press every cell of the current sequence.
    fn repeat(game: &mut LightSequence, shell: &mut MemoryShell) -> Outcome {
        let mut last = Outcome::Ignored;
        for pt in game.sequence() {
            last = game.cell_pressed(pt, shell);
        }
        last
    }

    #[test]
    fn test_start_shows_three_lights() {
        let (mut game, mut shell) = started(LightSequence::with_seed(1));
        assert_eq!(shell.scores[0], 3);
        assert_eq!(
            shell.timers[&LIGHT_SEQUENCE_SHOW_TIMER],
            HostTimer {
                period_ms: 500,
                repeating: true
            }
        );

        let shown = watch(&mut game, &mut shell);
        assert_eq!(shown, game.sequence());
        assert_eq!(shown.len(), 3);
        assert!(!shell.timers.contains_key(&LIGHT_SEQUENCE_SHOW_TIMER));
        assert_eq!(shell.lit(Color::Off), 4);
        assert_eq!(game.lit(), None);
    }

    #[test]
    fn test_press_during_display_denied() {
        let (mut game, mut shell) = started(LightSequence::with_seed(1));
        game.timer_fired(LIGHT_SEQUENCE_SHOW_TIMER, &mut shell);
        assert_eq!(
            game.cell_pressed((0, 0), &mut shell),
            Outcome::Denied(MoveError::SequencePlaying)
        );
        assert_eq!(game.turn(), 0);
    }

    #[test]
    fn test_repeated_sequence_grows() {
        let (mut game, mut shell) = started(LightSequence::with_seed(2));
        watch(&mut game, &mut shell);
        let first = game.sequence();

        assert_eq!(game.cell_pressed(first[0], &mut shell), Outcome::Continue);
        assert_eq!(shell.last_sound(), Some(Sound::Victory));
        assert_eq!(
            shell.timers[&LIGHT_SEQUENCE_CLEAR_TIMER],
            HostTimer {
                period_ms: 500,
                repeating: false
            }
        );
        game.cell_pressed(first[1], &mut shell);
        assert_eq!(game.cell_pressed(first[2], &mut shell), Outcome::Continue);
        assert_eq!(shell.last_sound(), Some(Sound::MajorVictory));
        assert_eq!(shell.scores[0], 4);
        assert_eq!(game.length(), 4);
        assert_eq!(
            shell.timers[&LIGHT_SEQUENCE_INTERMISSION_TIMER].period_ms,
            2000
        );
        assert_eq!(shell.timers[&LIGHT_SEQUENCE_CLEAR_TIMER].period_ms, 1000);

        // Nothing is accepted during the intermission.
        assert_eq!(
            game.cell_pressed(first[0], &mut shell),
            Outcome::Denied(MoveError::SequencePlaying)
        );

        assert_eq!(
            game.timer_fired(LIGHT_SEQUENCE_CLEAR_TIMER, &mut shell),
            Outcome::Continue
        );
        assert_eq!(shell.lit(Color::Off), 4);
        assert_eq!(
            game.timer_fired(LIGHT_SEQUENCE_INTERMISSION_TIMER, &mut shell),
            Outcome::Continue
        );
        assert!(shell.timers.contains_key(&LIGHT_SEQUENCE_SHOW_TIMER));

        // The longer sequence starts with the one just repeated.
        let second = watch(&mut game, &mut shell);
        assert_eq!(second.len(), 4);
        assert_eq!(&second[..3], &first[..]);
        assert_eq!(repeat(&mut game, &mut shell), Outcome::Continue);
        assert_eq!(game.length(), 5);
    }

    #[test]
    fn test_wrong_press_fails() {
        let (mut game, mut shell) = started(LightSequence::with_seed(3));
        watch(&mut game, &mut shell);
        let first = game.sequence()[0];
        let wrong = game
            .board()
            .points()
            .find(|&pt| pt != first)
            .unwrap();
        assert_eq!(
            game.cell_pressed(wrong, &mut shell),
            Outcome::Finished(Verdict::Failed)
        );
        assert_eq!(shell.last_sound(), Some(Sound::Failure));

        game.suspend(&mut shell);
        assert!(shell.timers.is_empty());
    }

    #[test]
    fn test_seeded_games_replay() {
        let (a, _) = started(LightSequence::with_seed(9));
        let (b, _) = started(LightSequence::with_seed(9));
        assert_eq!(a.sequence(), b.sequence());
    }

    #[test]
    fn test_setup_options_cycle() {
        let mut game = LightSequence::new();
        assert_eq!(game.dimensions(), (2, 2));
        game.configure(SLOT_DIFFICULTY);
        assert_eq!(game.dimensions(), (3, 3));
        assert_eq!(game.board().cell_count(), 9);

        let mut delays = Vec::new();
        for _ in 0..10 {
            game.configure(SLOT_DELAY);
            delays.push(game.delay_ms());
        }
        assert_eq!(
            delays,
            vec![1250, 1500, 1750, 2000, 2250, 2500, 2750, 3000, 500, 750]
        );

        game.configure(SLOT_ALLOW_REPEATS);
        let options = game.setup_options();
        assert_eq!(options[0].param, MenuParam::Text("high"));
        assert_eq!(options[1].param, MenuParam::switch(true));
        assert_eq!(options[2].param, MenuParam::Int(750));
        assert!(!game.configure(7));
    }

    #[test]
    fn test_replay_button() {
        let (mut game, mut shell) = started(LightSequence::with_seed(4));
        watch(&mut game, &mut shell);
        assert_eq!(
            game.aux_pressed(AuxButton::Replay, &mut shell),
            Outcome::Ignored
        );

        game.configure(SLOT_ALLOW_REPEATS);
        let first = game.sequence()[0];
        game.cell_pressed(first, &mut shell);
        assert_eq!(
            game.aux_pressed(AuxButton::Replay, &mut shell),
            Outcome::Continue
        );
        // The pending clear is dropped and the sequence plays from the top.
        assert!(!shell.timers.contains_key(&LIGHT_SEQUENCE_CLEAR_TIMER));
        assert_eq!(
            game.aux_pressed(AuxButton::Replay, &mut shell),
            Outcome::Denied(MoveError::SequencePlaying)
        );
        assert_eq!(watch(&mut game, &mut shell), game.sequence());
        assert_eq!(repeat(&mut game, &mut shell), Outcome::Continue);
        assert_eq!(game.length(), 4);
    }

    #[test]
    fn test_pass_is_unsupported() {
        let (mut game, mut shell) = started(LightSequence::with_seed(4));
        assert_eq!(
            game.aux_pressed(AuxButton::Pass, &mut shell),
            Outcome::Denied(MoveError::Unsupported)
        );
    }
}
