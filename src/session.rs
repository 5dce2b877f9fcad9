//! Cartridge lifecycle shared by every game.
//!
//! A [`Session`] owns one game and the host it paints on. It tracks the
//! setup/playing phase, builds the menus, switches the per-player countdown
//! clocks when a turn ends, plays the deny cue for rejected input and puts
//! the victory message up when a game finishes. The rules themselves live
//! behind the [`Game`] trait.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::board::{Board, Player, Point};
use crate::shell::{
    Color, CountMode, GameShell, MenuEntry, MenuLabel, MenuParam, Message, Sound,
};

/// Why an input was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game has not started")]
    Setup,
    #[error("point is outside the board")]
    OutOfBounds,
    #[error("point is not empty")]
    Occupied,
    #[error("move retakes ko")]
    Ko,
    #[error("move would be suicide")]
    Suicide,
    #[error("not a legal destination")]
    IllegalDestination,
    #[error("the jumping piece must keep jumping")]
    ChainPending,
    #[error("column is full")]
    ColumnFull,
    #[error("wait for the sequence to finish")]
    SequencePlaying,
    #[error("not supported by this game")]
    Unsupported,
}

/// How a finished game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Winner(Player),
    Tie,
    /// A single-player puzzle was completed.
    Solved,
    /// A single-player game was lost.
    Failed,
}

/// Result of handing one input event to a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Accepted; the same player keeps acting (selection, chain step).
    Continue,
    /// Ignored without feedback.
    Ignored,
    Denied(MoveError),
    /// The turn is over and `to` moves next.
    TurnPassed { to: Player },
    Finished(Verdict),
}

/// Auxiliary LCD buttons.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AuxButton {
    Pass,
    /// Show the current sequence again.
    Replay,
}

/// Rules of one cartridge.
///
/// Every callback gets the host so the game can repaint. Games never play
/// the deny sound themselves; they return [`Outcome::Denied`].
pub trait Game {
    fn name(&self) -> &'static str;

    /// Grid size `(width, height)` for the next game phase.
    fn dimensions(&self) -> (usize, usize);

    /// Countdown length per player when turn timers are supported.
    fn turn_seconds(&self) -> Option<u32> {
        None
    }

    /// Game-specific setup menu entries (slots 2 and up).
    fn setup_options(&self) -> Vec<MenuEntry> {
        Vec::new()
    }

    /// Cycle the option in `slot`. Returns false for unknown slots.
    fn configure(&mut self, _slot: u8) -> bool {
        false
    }

    /// Reset to the starting position and paint it.
    fn start(&mut self, shell: &mut dyn GameShell);

    /// Called on the way back to setup. Cancel host timers here.
    fn suspend(&mut self, _shell: &mut dyn GameShell) {}

    fn cell_pressed(&mut self, pt: Point, shell: &mut dyn GameShell) -> Outcome;

    fn aux_pressed(&mut self, _button: AuxButton, _shell: &mut dyn GameShell) -> Outcome {
        Outcome::Denied(MoveError::Unsupported)
    }

    fn timer_fired(&mut self, _id: u8, _shell: &mut dyn GameShell) -> Outcome {
        Outcome::Ignored
    }

    fn board(&self) -> &Board;

    /// Completed turns (or player presses for single-player games).
    fn turn(&self) -> u32;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Playing,
}

/// Menu slots shared by every cartridge.
pub const SLOT_START: u8 = 0;
pub const SLOT_TURN_TIMERS: u8 = 1;
pub const SLOT_RESTART: u8 = 0;
pub const SLOT_RECONFIGURE: u8 = 1;

pub struct Session<G: Game + ?Sized, S: GameShell> {
    game: Box<G>,
    shell: S,
    phase: Phase,
    turn_timers: bool,
}

impl<G: Game + ?Sized, S: GameShell> Session<G, S> {
    pub fn new(game: Box<G>, shell: S) -> Self {
        Self {
            game,
            shell,
            phase: Phase::Setup,
            turn_timers: false,
        }
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn_timers(&self) -> bool {
        self.turn_timers
    }

    /// Turn the per-player countdowns on or off before a game starts.
    pub fn set_turn_timers(&mut self, enabled: bool) {
        self.turn_timers = enabled && self.game.turn_seconds().is_some();
        if self.phase == Phase::Setup {
            self.register_setup_options();
        }
    }

    /// The cartridge was loaded by the host.
    pub fn load(&mut self) {
        self.enter_setup(true);
    }

    fn enter_setup(&mut self, fresh: bool) {
        self.phase = Phase::Setup;

        if fresh {
            let (w, h) = self.game.dimensions();
            self.shell.set_board_dimensions(w, h);
            self.shell.illuminate_board(Color::Off);
            self.shell.set_message(Message::GenericSetup);
        } else {
            if self.turn_timers {
                self.shell.set_countdown_mode(Player::One, CountMode::Paused);
                self.shell.set_countdown_mode(Player::Two, CountMode::Paused);
            }
            self.game.suspend(&mut self.shell);
        }

        self.shell.clear_menu();
        let label = if fresh {
            MenuLabel::StartGame
        } else {
            MenuLabel::RestartGame
        };
        self.shell
            .set_menu_option(MenuEntry::new(SLOT_START, label, MenuParam::None));
        self.register_setup_options();
        info!(game = self.game.name(), fresh, "entered setup");
    }

    fn register_setup_options(&mut self) {
        if self.game.turn_seconds().is_some() {
            self.shell.set_menu_option(MenuEntry::new(
                SLOT_TURN_TIMERS,
                MenuLabel::TurnTimers,
                MenuParam::switch(self.turn_timers),
            ));
        }
        for entry in self.game.setup_options() {
            self.shell.set_menu_option(entry);
        }
    }

    fn enter_game(&mut self) {
        self.phase = Phase::Playing;
        self.shell.play_sound(Sound::GameStart);
        self.shell.set_score(Player::One, 0);
        self.shell.set_score(Player::Two, 0);
        self.shell.set_message(Message::GenericStart);

        let (w, h) = self.game.dimensions();
        self.shell.set_board_dimensions(w, h);
        self.shell.illuminate_board(Color::Off);
        self.game.start(&mut self.shell);

        if let (true, Some(seconds)) = (self.turn_timers, self.game.turn_seconds()) {
            self.shell.set_countdown(Player::One, seconds);
            self.shell.set_countdown(Player::Two, seconds);
            self.shell.set_countdown_mode(Player::One, CountMode::CountDown);
            self.shell.set_countdown_mode(Player::Two, CountMode::Paused);
        }

        self.shell.clear_menu();
        self.shell.set_menu_option(MenuEntry::new(
            SLOT_RESTART,
            MenuLabel::Restart,
            MenuParam::None,
        ));
        self.shell.set_menu_option(MenuEntry::new(
            SLOT_RECONFIGURE,
            MenuLabel::Reconfigure,
            MenuParam::None,
        ));
        info!(game = self.game.name(), "game started");
    }

    /// A grid button was pressed.
    pub fn press(&mut self, pt: Point) -> Outcome {
        let outcome = match self.phase {
            Phase::Setup => Outcome::Denied(MoveError::Setup),
            Phase::Playing if !self.game.board().contains(pt) => {
                warn!(?pt, "press outside the board");
                Outcome::Denied(MoveError::OutOfBounds)
            }
            Phase::Playing => self.game.cell_pressed(pt, &mut self.shell),
        };
        self.settle(outcome)
    }

    /// An auxiliary LCD button was pressed.
    pub fn aux(&mut self, button: AuxButton) -> Outcome {
        let outcome = match self.phase {
            Phase::Setup => Outcome::Denied(MoveError::Setup),
            Phase::Playing => self.game.aux_pressed(button, &mut self.shell),
        };
        self.settle(outcome)
    }

    /// A host timer started by the game fired.
    pub fn timer_fired(&mut self, id: u8) -> Outcome {
        let outcome = match self.phase {
            Phase::Setup => Outcome::Ignored,
            Phase::Playing => self.game.timer_fired(id, &mut self.shell),
        };
        self.settle(outcome)
    }

    /// A player's countdown clock hit zero; the other player wins.
    pub fn countdown_expired(&mut self, player: Player) -> Outcome {
        if self.phase != Phase::Playing || !self.turn_timers {
            return Outcome::Ignored;
        }
        info!(%player, "countdown expired");
        self.settle(Outcome::Finished(Verdict::Winner(player.opponent())))
    }

    /// A menu entry was selected.
    pub fn menu(&mut self, slot: u8) {
        match (self.phase, slot) {
            (Phase::Setup, SLOT_START) => self.enter_game(),
            (Phase::Setup, SLOT_TURN_TIMERS) if self.game.turn_seconds().is_some() => {
                self.turn_timers = !self.turn_timers;
                self.register_setup_options();
            }
            (Phase::Setup, _) => {
                if self.game.configure(slot) {
                    self.register_setup_options();
                } else {
                    warn!(slot, "unknown setup menu slot");
                }
            }
            (Phase::Playing, SLOT_RESTART) => self.enter_game(),
            (Phase::Playing, SLOT_RECONFIGURE) => {
                self.shell.set_message(Message::GenericSetup);
                self.enter_setup(false);
            }
            (Phase::Playing, _) => warn!(slot, "unknown game menu slot"),
        }
    }

    /// The host has not seen input for a long time.
    pub fn idle(&mut self) {
        debug!(game = self.game.name(), "idle");
    }

    /// Input arrived while idle.
    pub fn wake(&mut self) {
        debug!(game = self.game.name(), "wake");
    }

    fn settle(&mut self, outcome: Outcome) -> Outcome {
        match outcome {
            Outcome::Continue | Outcome::Ignored => {}
            Outcome::Denied(err) => {
                debug!(%err, "input denied");
                self.shell.play_sound(Sound::Deny);
            }
            Outcome::TurnPassed { to } => {
                if self.turn_timers {
                    self.shell.set_countdown_mode(to.opponent(), CountMode::Paused);
                    self.shell.set_countdown_mode(to, CountMode::CountDown);
                }
            }
            Outcome::Finished(verdict) => {
                info!(game = self.game.name(), ?verdict, "game over");
                // Single-player games pick their own sounds.
                let (message, fanfare) = match verdict {
                    Verdict::Winner(player) => (Message::victory(player), true),
                    Verdict::Tie => (Message::TieGame, true),
                    Verdict::Solved => (Message::TileFlipVictory, false),
                    Verdict::Failed => (Message::SequenceFailed, false),
                };
                if fanfare {
                    self.shell.play_sound(Sound::Victory);
                }
                self.shell.set_message(message);
                self.enter_setup(false);
            }
        }
        outcome
    }
}
