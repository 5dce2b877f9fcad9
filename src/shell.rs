//! The host API a cartridge drives: LED grid, sounds, LCD, menu and timers.
//!
//! [`GameShell`] mirrors the console's fixed callback surface. The engine
//! only ever talks to the host through it. [`MemoryShell`] keeps everything
//! in memory and is what the text console and the tests run against.

use std::collections::BTreeMap;
use std::fmt;

use crate::board::{Player, Point};

/// LED palette.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Color {
    /// Unlit cell (gray on the hardware).
    #[default]
    Off,
    White,
    Red,
    Blue,
    Orange,
    Purple,
    Pink,
    Yellow,
    DarkYellow,
    DarkRed,
    DarkBlue,
}

impl Color {
    /// Single-character glyph used when printing the grid.
    pub fn glyph(self) -> char {
        match self {
            Color::Off => '.',
            Color::White => 'w',
            Color::Red => 'r',
            Color::Blue => 'b',
            Color::Orange => 'R',
            Color::Purple => 'B',
            Color::Pink => '*',
            Color::Yellow => '+',
            Color::DarkYellow => '#',
            Color::DarkRed => '-',
            Color::DarkBlue => '~',
        }
    }

    /// Color of a player's plain piece.
    pub fn of(player: Player) -> Self {
        match player {
            Player::One => Color::Red,
            Player::Two => Color::Blue,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sound {
    GameStart,
    Deny,
    Flip,
    Victory,
    MajorVictory,
    Failure,
}

/// LCD status messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Message {
    GenericSetup,
    GenericStart,
    RedVictory,
    BlueVictory,
    TieGame,
    TileFlipped,
    TileFlipVictory,
    SequenceFailed,
}

impl Message {
    pub fn victory(player: Player) -> Self {
        match player {
            Player::One => Message::RedVictory,
            Player::Two => Message::BlueVictory,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Message::GenericSetup => "Configure the game, then start",
            Message::GenericStart => "Game on!",
            Message::RedVictory => "Red wins!",
            Message::BlueVictory => "Blue wins!",
            Message::TieGame => "Tie game",
            Message::TileFlipped => "Tile flipped",
            Message::TileFlipVictory => "Every tile is lit!",
            Message::SequenceFailed => "Wrong light! Sequence over",
        };
        f.write_str(text)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuLabel {
    StartGame,
    RestartGame,
    Restart,
    Reconfigure,
    TurnTimers,
    BoardSize,
    RandomStart,
    RandomMoves,
    Difficulty,
    AllowRepeats,
    WaitDuration,
}

/// Optional value shown next to a menu label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuParam {
    None,
    Text(&'static str),
    Int(i32),
}

impl MenuParam {
    pub fn switch(on: bool) -> Self {
        MenuParam::Text(if on { "on" } else { "off" })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub slot: u8,
    pub label: MenuLabel,
    pub param: MenuParam,
}

impl MenuEntry {
    pub fn new(slot: u8, label: MenuLabel, param: MenuParam) -> Self {
        Self { slot, label, param }
    }
}

/// How an LCD clock runs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CountMode {
    #[default]
    Paused,
    CountUp,
    CountDown,
}

/// Fixed host API.
pub trait GameShell {
    fn set_board_dimensions(&mut self, width: usize, height: usize);
    fn set_cell_color(&mut self, pt: Point, color: Color);
    fn cell_color(&self, pt: Point) -> Color;
    fn illuminate_board(&mut self, color: Color);
    fn play_sound(&mut self, sound: Sound);
    fn set_message(&mut self, message: Message);
    fn clear_menu(&mut self);
    fn set_menu_option(&mut self, entry: MenuEntry);
    fn set_score(&mut self, player: Player, value: u32);
    /// Set a player's LCD clock in seconds.
    fn set_countdown(&mut self, player: Player, seconds: u32);
    fn set_countdown_mode(&mut self, player: Player, mode: CountMode);
    /// Start a host timer that calls back with `id` after `period_ms`.
    fn start_timer(&mut self, id: u8, period_ms: u32, repeating: bool);
    fn kill_timer(&mut self, id: u8);
}

/// A host timer registered through [`GameShell::start_timer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HostTimer {
    pub period_ms: u32,
    pub repeating: bool,
}

/// In-memory host. Records everything the engine asks for.
#[derive(Clone, Debug, Default)]
pub struct MemoryShell {
    width: usize,
    height: usize,
    leds: Vec<Color>,
    /// Sounds played since the last [`MemoryShell::take_sounds`].
    pub sounds: Vec<Sound>,
    pub message: Option<Message>,
    pub menu: BTreeMap<u8, MenuEntry>,
    pub scores: [u32; 2],
    pub countdowns: [u32; 2],
    pub countdown_modes: [CountMode; 2],
    pub timers: BTreeMap<u8, HostTimer>,
}

impl MemoryShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Drain the sounds recorded so far.
    pub fn take_sounds(&mut self) -> Vec<Sound> {
        std::mem::take(&mut self.sounds)
    }

    pub fn last_sound(&self) -> Option<Sound> {
        self.sounds.last().copied()
    }

    /// Number of LEDs currently showing `color`.
    pub fn lit(&self, color: Color) -> usize {
        self.leds.iter().filter(|&&c| c == color).count()
    }
}

impl GameShell for MemoryShell {
    fn set_board_dimensions(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.leds = vec![Color::Off; width * height];
    }

    fn set_cell_color(&mut self, (x, y): Point, color: Color) {
        assert!(x < self.width && y < self.height, "LED ({x}, {y}) out of range");
        self.leds[y * self.width + x] = color;
    }

    fn cell_color(&self, (x, y): Point) -> Color {
        assert!(x < self.width && y < self.height, "LED ({x}, {y}) out of range");
        self.leds[y * self.width + x]
    }

    fn illuminate_board(&mut self, color: Color) {
        self.leds.fill(color);
    }

    fn play_sound(&mut self, sound: Sound) {
        self.sounds.push(sound);
    }

    fn set_message(&mut self, message: Message) {
        self.message = Some(message);
    }

    fn clear_menu(&mut self) {
        self.menu.clear();
    }

    fn set_menu_option(&mut self, entry: MenuEntry) {
        self.menu.insert(entry.slot, entry);
    }

    fn set_score(&mut self, player: Player, value: u32) {
        self.scores[player.index()] = value;
    }

    fn set_countdown(&mut self, player: Player, seconds: u32) {
        self.countdowns[player.index()] = seconds;
    }

    fn set_countdown_mode(&mut self, player: Player, mode: CountMode) {
        self.countdown_modes[player.index()] = mode;
    }

    fn start_timer(&mut self, id: u8, period_ms: u32, repeating: bool) {
        self.timers.insert(
            id,
            HostTimer {
                period_ms,
                repeating,
            },
        );
    }

    fn kill_timer(&mut self, id: u8) {
        self.timers.remove(&id);
    }
}

impl fmt::Display for MemoryShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{} ", self.cell_color((x, y)).glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_shell_leds() {
        let mut shell = MemoryShell::new();
        shell.set_board_dimensions(3, 2);
        shell.illuminate_board(Color::White);
        shell.set_cell_color((2, 1), Color::Red);
        assert_eq!(shell.cell_color((2, 1)), Color::Red);
        assert_eq!(shell.lit(Color::White), 5);
        assert_eq!(shell.to_string(), "w w w \nw w r \n");
    }

    #[test]
    fn test_memory_shell_timers() {
        let mut shell = MemoryShell::new();
        shell.start_timer(3, 500, true);
        assert!(shell.timers.contains_key(&3));
        shell.kill_timer(3);
        assert!(shell.timers.is_empty());
    }

    #[test]
    fn test_take_sounds_drains() {
        let mut shell = MemoryShell::new();
        shell.play_sound(Sound::Deny);
        assert_eq!(shell.last_sound(), Some(Sound::Deny));
        assert_eq!(shell.take_sounds(), vec![Sound::Deny]);
        assert!(shell.sounds.is_empty());
    }
}
