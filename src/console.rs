//! Line-oriented text console standing in for the LED-grid host.
//!
//! The protocol follows the shape of the Go Text Protocol: one command per
//! line, an optional numeric id in front, and a reply of `=id message` or
//! `?id message` followed by a blank line. Blank lines and `#` comments are
//! skipped.
//!
//! ## Commands
//!
//! - `name`, `version`, `list_commands`, `known_command <cmd>`, `quit`
//! - `show` - LED grid, LCD message, scores and menu
//! - `press <vertex>` or `press <x> <y>` - press a grid button
//! - `pass` - the auxiliary pass button
//! - `replay` - the auxiliary replay button
//! - `menu <slot>` - pick a menu entry
//! - `timer <id>` - fire a host timer
//! - `timeout <1|2>` - a player's countdown reached zero
//! - `idle`, `wake` - host idle notifications
//! - `score` - both LCD scores
//!
//! ## Example
//!
//! ```ignore
//! use lightgrid::console::{Console, GameKind};
//! let mut console = Console::new(GameKind::Go.build(None));
//! console.run(std::io::stdin().lock(), std::io::stdout())?;
//! ```

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};
use clap::ValueEnum;
use tracing::warn;

use crate::board::{Player, Point, column_name, parse_vertex, vertex_name};
use crate::checkers::Checkers;
use crate::chinese_checkers::ChineseCheckers;
use crate::go::Go;
use crate::light_sequence::LightSequence;
use crate::session::{AuxButton, Game, Outcome, Phase, Session, Verdict};
use crate::shell::{MemoryShell, MenuParam};
use crate::straight_edge::StraightEdge;
use crate::tile_flip::TileFlip;

/// The list of known console commands.
const KNOWN_COMMANDS: &[&str] = &[
    "idle",
    "known_command",
    "list_commands",
    "menu",
    "name",
    "pass",
    "press",
    "quit",
    "replay",
    "score",
    "show",
    "timeout",
    "timer",
    "version",
    "wake",
];

/// Cartridges the console can load.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum GameKind {
    Checkers,
    ChineseCheckers,
    Go,
    StraightEdge,
    TileFlip,
    CrazyTileFlip,
    LightSequence,
}

impl GameKind {
    /// Build a fresh cartridge. `seed` only matters for games that use
    /// randomness.
    pub fn build(self, seed: Option<u64>) -> Box<dyn Game> {
        match self {
            GameKind::Checkers => Box::new(Checkers::new()),
            GameKind::ChineseCheckers => Box::new(ChineseCheckers::new()),
            GameKind::Go => Box::new(Go::new()),
            GameKind::StraightEdge => Box::new(StraightEdge::new()),
            GameKind::TileFlip => Box::new(match seed {
                Some(seed) => TileFlip::with_seed(seed),
                None => TileFlip::new(),
            }),
            GameKind::CrazyTileFlip => Box::new(match seed {
                Some(seed) => TileFlip::crazy_with_seed(seed),
                None => TileFlip::crazy(),
            }),
            GameKind::LightSequence => Box::new(match seed {
                Some(seed) => LightSequence::with_seed(seed),
                None => LightSequence::new(),
            }),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            GameKind::Checkers => "8x8 checkers with kings and multi-jumps",
            GameKind::ChineseCheckers => "two-player Chinese checkers, 15 marbles each",
            GameKind::Go => "9x9 Go with captures, ko and territory",
            GameKind::StraightEdge => "four in a row on a 7x6 grid",
            GameKind::TileFlip => "single-player lights out",
            GameKind::CrazyTileFlip => "lights out on 5x5 with random presses every ten seconds",
            GameKind::LightSequence => "repeat a growing sequence of lights",
        }
    }
}

/// Console state: one session on an in-memory host.
pub struct Console {
    session: Session<dyn Game, MemoryShell>,
}

impl Console {
    /// Load `game` and show its setup menu.
    pub fn new(game: Box<dyn Game>) -> Self {
        let mut session = Session::new(game, MemoryShell::new());
        session.load();
        Self { session }
    }

    pub fn session(&self) -> &Session<dyn Game, MemoryShell> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<dyn Game, MemoryShell> {
        &mut self.session
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("reading command")?;

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (prefix, message) = match self.execute(&command, args) {
                Ok(message) => ('=', message),
                Err(err) => ('?', err.to_string()),
            };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            write!(output, "{prefix}{id_str} {message}\n\n").context("writing reply")?;
            output.flush().context("writing reply")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional numeric id from the front of a line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute one command and return the reply text.
    pub fn execute(&mut self, command: &str, args: &[&str]) -> Result<String> {
        match command {
            "name" => Ok(format!("lightgrid {}", self.session.game().name())),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let cmd = args.first().context("missing argument")?;
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                Ok(known.to_string())
            }

            "quit" => Ok(String::new()),

            "show" => Ok(self.show()),

            "score" => {
                let [one, two] = self.session.shell().scores;
                Ok(format!("{one} {two}"))
            }

            "press" => {
                let pt = self.parse_point(args)?;
                self.event(Some(pt), |session| session.press(pt))
            }

            "pass" => self.event(None, |session| session.aux(AuxButton::Pass)),

            "replay" => self.event(None, |session| session.aux(AuxButton::Replay)),

            "menu" => {
                let slot: u8 = parse_arg(args, "slot")?;
                self.event(None, |session| {
                    session.menu(slot);
                    Outcome::Continue
                })
            }

            "timer" => {
                let id: u8 = parse_arg(args, "timer id")?;
                self.event(None, |session| session.timer_fired(id))
            }

            "timeout" => {
                let player = match parse_arg::<u8>(args, "player")? {
                    1 => Player::One,
                    2 => Player::Two,
                    n => bail!("no player {n}"),
                };
                self.event(None, |session| session.countdown_expired(player))
            }

            "idle" => {
                self.session.idle();
                Ok(String::new())
            }

            "wake" => {
                self.session.wake();
                Ok(String::new())
            }

            _ => Err(anyhow!("unknown command: {command}")),
        }
    }

    /// Either a vertex such as `D4` or a raw `x y` pair.
    fn parse_point(&self, args: &[&str]) -> Result<Point> {
        match args {
            [vertex] => {
                let (_, height) = self.session.shell().dimensions();
                parse_vertex(vertex, height).with_context(|| format!("invalid vertex: {vertex}"))
            }
            [x, y] => {
                let x = x.parse().with_context(|| format!("invalid column: {x}"))?;
                let y = y.parse().with_context(|| format!("invalid row: {y}"))?;
                Ok((x, y))
            }
            _ => bail!("expected a vertex or two coordinates"),
        }
    }

    /// Run a host event and describe what it produced. `at` names the
    /// pressed cell in refusals.
    fn event(
        &mut self,
        at: Option<Point>,
        f: impl FnOnce(&mut Session<dyn Game, MemoryShell>) -> Outcome,
    ) -> Result<String> {
        let before = self.session.shell().message;
        let outcome = f(&mut self.session);
        let shell = self.session.shell_mut();
        let sounds = shell.take_sounds();
        let message = shell.message.filter(|&m| Some(m) != before);

        if let Outcome::Denied(err) = outcome {
            warn!(%err, "command denied");
            let (_, height) = shell.dimensions();
            match at.and_then(|pt| vertex_name(pt, height)) {
                Some(vertex) => bail!("illegal move at {vertex}: {err}"),
                None => bail!("illegal move: {err}"),
            }
        }

        let mut reply = match outcome {
            Outcome::Continue | Outcome::Denied(_) => String::from("ok"),
            Outcome::Ignored => String::from("ignored"),
            Outcome::TurnPassed { to } => format!("turn {to}"),
            Outcome::Finished(Verdict::Winner(player)) => format!("game over, {player} wins"),
            Outcome::Finished(Verdict::Tie) => String::from("game over, tie"),
            Outcome::Finished(Verdict::Solved) => String::from("game over, solved"),
            Outcome::Finished(Verdict::Failed) => String::from("game over, failed"),
        };
        if !sounds.is_empty() {
            let names: Vec<String> = sounds
                .iter()
                .map(|s| format!("{s:?}").to_lowercase())
                .collect();
            let _ = write!(reply, "; sounds {}", names.join(","));
        }
        if let Some(message) = message {
            let _ = write!(reply, "; \"{message}\"");
        }
        Ok(reply)
    }

    fn show(&self) -> String {
        let shell = self.session.shell();
        let (width, _) = shell.dimensions();
        let header: Vec<String> = (0..width)
            .map(|x| column_name(x).map_or_else(|| String::from("?"), String::from))
            .collect();
        let mut out = format!("{}\n{shell}", header.join(" "));
        let phase = match self.session.phase() {
            Phase::Setup => "setup",
            Phase::Playing => "playing",
        };
        let _ = writeln!(
            out,
            "{} {phase}, turn {}",
            self.session.game().name(),
            self.session.game().turn()
        );
        let _ = writeln!(out, "score {} {}", shell.scores[0], shell.scores[1]);
        if let Some(message) = shell.message {
            let _ = writeln!(out, "message \"{message}\"");
        }
        for entry in shell.menu.values() {
            let param = match &entry.param {
                MenuParam::None => String::new(),
                MenuParam::Text(text) => format!(" {text}"),
                MenuParam::Int(n) => format!(" {n}"),
            };
            let _ = writeln!(out, "menu {} {:?}{param}", entry.slot, entry.label);
        }
        out.trim_end().to_string()
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[&str], what: &str) -> Result<T> {
    let raw = args.first().with_context(|| format!("missing {what}"))?;
    raw.parse()
        .map_err(|_| anyhow!("invalid {what}: {raw}"))
}
