//! Lightgrid: board-game cartridges for an LED-grid game console.
//!
//! Each cartridge reacts to button presses on a light grid and drives the
//! console's LCD, sounds and timers through a fixed host API.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry and timer lengths
//! - [`board`] - Grid of cells shared by every game
//! - [`shell`] - The host API and an in-memory host
//! - [`session`] - Setup/playing lifecycle, menus and turn timers
//! - [`checkers`] - Checkers with kings and mandatory multi-jumps
//! - [`chinese_checkers`] - Two-player Chinese checkers
//! - [`go`] - 9x9 Go: captures, ko, suicide and territory
//! - [`straight_edge`] - Four in a row
//! - [`tile_flip`] - Single-player lights out and its Crazy variant
//! - [`light_sequence`] - Repeat a growing sequence of lights
//! - [`console`] - Text protocol that plays the part of the host
//!
//! ## Example
//!
//! ```
//! use lightgrid::go::Go;
//! use lightgrid::session::{Outcome, Session, SLOT_START};
//! use lightgrid::shell::MemoryShell;
//!
//! let mut session = Session::new(Box::new(Go::new()), MemoryShell::new());
//! session.load();
//! session.menu(SLOT_START);
//! assert!(matches!(session.press((4, 4)), Outcome::TurnPassed { .. }));
//! ```

pub mod board;
pub mod checkers;
pub mod chinese_checkers;
pub mod console;
pub mod constants;
pub mod go;
pub mod light_sequence;
pub mod session;
pub mod shell;
pub mod straight_edge;
pub mod tile_flip;
