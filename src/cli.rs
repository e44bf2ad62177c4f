//! # Command-Line Interface Module
//!
//! Defines the command-line surface with Clap derive macros. Minuet takes
//! no subcommands: one invocation runs one menu session, and flags pick
//! the starting menu plus a handful of overrides on top of the settings
//! file.
//!
//! ## Start modes
//!
//! - `-w`/`--artists`: browse by artist (the default)
//! - `-b`/`--albums`: every album across the collection
//! - `-t`/`--tracks`: one flat list of every track
//! - `-g`/`--genres`: browse by genre, queried live from the daemon
//! - `-l`/`--playlists`: load a stored playlist
//! - `-a`/`--all`: artists, albums and tracks in a single menu
//!
//! When several mode flags are given together the most specific one wins;
//! the order is tracks, albums, genres, playlists, all, artists.
//!
//! ## Examples
//!
//! ```bash
//! minuet
//! minuet -b --host music.local
//! minuet -t -r -theme dark
//! ```

use crate::config::Overrides;
use crate::navigator::StartMode;
use clap::{Parser, ValueEnum};

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
///
/// Uses Clap derive macros to automatically generate argument parsing,
/// help text, and validation. Every flag is optional; a bare `minuet`
/// runs the artist menu against the configured daemon.
#[derive(Parser, Debug)]
#[command(name = "minuet")]
#[command(about = "Minuet - queue music on MPD through a rofi menu")]
#[command(version)]
pub struct Args {
    /// Browse the library by artist (the default)
    #[arg(short = 'w', long)]
    pub artists: bool,

    /// Browse every album across the collection
    #[arg(short = 'b', long)]
    pub albums: bool,

    /// Pick from a flat list of every track
    #[arg(short = 't', long)]
    pub tracks: bool,

    /// Browse by genre, queried live from the daemon
    #[arg(short = 'g', long)]
    pub genres: bool,

    /// Load one of the daemon's stored playlists
    #[arg(short = 'l', long)]
    pub playlists: bool,

    /// Offer artists, albums and tracks in a single menu
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Connect to this host instead of the configured ones
    ///
    /// Skips the host menu entirely. Falls back to the MPD_HOST
    /// environment variable when the flag is absent.
    #[arg(short = 'c', long, env = "MPD_HOST", value_name = "HOST")]
    pub host: Option<String>,

    /// Connect on this port instead of the configured one
    #[arg(short = 'p', long, env = "MPD_PORT", value_name = "PORT")]
    pub port: Option<u16>,

    /// Library cache file to use instead of the default location
    #[arg(short = 'd', long, env = "MINUET_DATABASE", value_name = "FILE")]
    pub database: Option<String>,

    /// Match menu input case-sensitively
    #[arg(short = 'i', long)]
    pub case_sensitive: bool,

    /// Start playback once something has been queued
    #[arg(long, conflicts_with = "no_play")]
    pub play: bool,

    /// Never start playback, regardless of the settings file
    #[arg(long)]
    pub no_play: bool,

    /// Generate a completion script for the given shell and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,

    /// Extra arguments passed through to the menu program
    ///
    /// Everything after this flag goes to rofi verbatim, so give it last:
    /// `minuet -r -theme dark`.
    #[arg(
        short = 'r',
        long,
        num_args = 0..,
        allow_hyphen_values = true,
        value_name = "ARG"
    )]
    pub menu_args: Vec<String>,
}

impl Args {
    /// The start menu the flags ask for.
    #[must_use]
    pub fn mode(&self) -> StartMode {
        if self.tracks {
            StartMode::Tracks
        } else if self.albums {
            StartMode::Albums
        } else if self.genres {
            StartMode::Genres
        } else if self.playlists {
            StartMode::Playlists
        } else if self.all {
            StartMode::Everything
        } else {
            StartMode::Artists
        }
    }

    /// The settings overrides the flags carry.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            case_sensitive: self.case_sensitive,
            play: match (self.play, self.no_play) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            menu_args: self.menu_args.clone(),
        }
    }
}
