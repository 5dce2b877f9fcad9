//! Lightgrid: LED-grid board games on a text console.
//!
//! ## Usage
//!
//! - `lightgrid` - Show a demo
//! - `lightgrid play <game>` - Load a cartridge and read console commands
//! - `lightgrid list` - List the cartridges
//! - `lightgrid demo` - Play a short scripted game

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use lightgrid::console::{Console, GameKind};

/// Lightgrid: board-game cartridges for an LED-grid console
#[derive(Parser)]
#[command(name = "lightgrid")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a cartridge and speak the console protocol on stdin/stdout
    Play {
        #[arg(value_enum)]
        game: GameKind,
        /// Start with per-player turn timers switched on
        #[arg(long)]
        turn_timers: bool,
        /// Seed for games that use randomness
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the available cartridges
    List,
    /// Play a short scripted game of Straight Edge
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Some(Commands::Play {
            game,
            turn_timers,
            seed,
        }) => {
            let mut console = Console::new(game.build(seed));
            console.session_mut().set_turn_timers(turn_timers);
            console.run(io::stdin().lock(), io::stdout())
        }
        Some(Commands::List) => {
            for kind in GameKind::value_variants() {
                if let Some(value) = kind.to_possible_value() {
                    println!("{:<18} {}", value.get_name(), kind.description());
                }
            }
            Ok(())
        }
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn run_demo() -> Result<()> {
    println!("Lightgrid: Straight Edge demo\n");

    let mut console = Console::new(GameKind::StraightEdge.build(None));
    let script: &[&[&str]] = &[
        &["menu", "0"],
        &["press", "0", "0"],
        &["press", "1", "0"],
        &["press", "0", "0"],
        &["press", "1", "0"],
        &["press", "0", "0"],
        &["press", "1", "0"],
        &["press", "0", "0"],
    ];
    for step in script {
        let Some((command, args)) = step.split_first() else {
            continue;
        };
        let reply = console.execute(command, args)?;
        println!("> {}", step.join(" "));
        println!("{reply}");
    }
    println!("\n{}", console.execute("show", &[])?);
    Ok(())
}
