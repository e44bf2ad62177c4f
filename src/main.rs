//! # Minuet - MPD Music Picker
//!
//! Minuet queues music on MPD through a rofi menu: pick an artist, album,
//! genre, track or playlist and it lands on the play queue. One invocation
//! runs one menu session.
//!
//! ## Architecture
//!
//! - `cli`: Command-line interface definitions
//! - `config`: Settings file and command-line overrides
//! - `library`: Cached artist/album/track index
//! - `menu`: The rofi front end
//! - `navigator`: The menu state machine
//! - `mpd_client`: MPD integration
//!
//! ## Usage
//!
//! ```bash
//! # Browse by artist (the default)
//! minuet
//!
//! # Browse albums across the collection on another host
//! minuet -b --host music.local
//!
//! # Flat track list with extra rofi arguments
//! minuet -t -r -theme dark
//! ```

use anyhow::Result;
use clap::{CommandFactory, Parser};
use log::{debug, info};
use minuet::navigator::RunOutcome;
use minuet::{cli, completion, config, menu, navigator};

/// Main entry point for the Minuet application.
///
/// Initializes logging, parses command-line arguments, assembles the
/// runtime configuration and drives one menu session. All operations
/// return Results for consistent error handling throughout the
/// application.
///
/// # Error Handling
///
/// Uses `anyhow::Result` for rich error context. Errors are automatically
/// propagated and displayed to the user with helpful context messages.
///
/// # Logging
///
/// Initializes environment logger which can be controlled via `RUST_LOG`:
/// - `RUST_LOG=debug minuet` - Enable debug logging
/// - `RUST_LOG=minuet::library=trace minuet -b` - Module-specific logging
fn main() -> Result<()> {
    // Initialize environment logger for debugging and monitoring
    env_logger::init();

    // Parse command-line arguments using Clap derive macros
    let args = cli::Args::parse();

    // Completion generation runs without settings or a daemon
    if let Some(shell) = args.completions {
        let mut cmd = cli::Args::command();
        completion::generate_completions(completion::shell_to_completion_shell(&shell), &mut cmd);
        return Ok(());
    }

    let settings = config::Settings::load()?;
    let runtime = config::Runtime::assemble(settings, args.overrides())?;
    let menu = menu::RofiMenu::new(runtime.case_sensitive, runtime.menu_args.clone());

    match navigator::run(&menu, &runtime, args.mode()) {
        Ok(RunOutcome::Completed) => {
            info!("Session completed");
            Ok(())
        }
        Ok(RunOutcome::Dismissed) => {
            debug!("Session dismissed without a terminal action");
            Ok(())
        }
        Err(e) => {
            eprintln!("Failed to run the menu session:");
            eprintln!("  {e:#}");
            eprintln!();
            eprintln!("This error typically means:");
            eprintln!("  1. MPD is not running or not reachable on the configured host");
            eprintln!("  2. rofi is not installed or not on PATH");
            eprintln!("  3. The music library is empty or has no entries for the chosen mode");
            eprintln!();
            eprintln!("To fix this:");
            eprintln!("  1. Start MPD: systemctl --user start mpd");
            eprintln!("  2. Check the settings file: ~/.config/minuet/config.toml");
            eprintln!("  3. Update the MPD database: mpc update");
            Err(e)
        }
    }
}
