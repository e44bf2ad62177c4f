//! Interactive music picker for MPD, driven by a rofi menu.
//!
//! Core modules:
//! - [`navigator`] - The menu state machine driving one selection session
//! - [`library`] - Artist/album/track index and its JSON cache
//! - [`mpd_client`] - MPD integration
//! - [`menu`] - The rofi front end
//! - [`queue`] - Queue additions and the start-playback policy
//!
//! ### Supporting Modules
//!
//! - [`config`] - Settings file, command-line overrides, resolved paths
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`completion`] - Shell completion generation
//! - [`dates`] - Release date resolution for chronological album sorting
//! - [`disc_names`] - Disc subtitle lookup from audio file tags
//! - [`tags`] - Raw daemon records and the normalized track shape
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use minuet::config::{Runtime, Settings};
//! use minuet::menu::RofiMenu;
//! use minuet::navigator::{self, RunOutcome, StartMode};
//!
//! let settings = Settings::load()?;
//! let config = Runtime::assemble(settings, Default::default())?;
//! let menu = RofiMenu::new(config.case_sensitive, config.menu_args.clone());
//!
//! match navigator::run(&menu, &config, StartMode::Artists)? {
//!     RunOutcome::Completed => println!("Queued."),
//!     RunOutcome::Dismissed => println!("Nothing picked."),
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Session Flow
//!
//! One invocation runs one session: resolve which daemon to talk to,
//! connect, walk menus from the chosen start mode down to tracks, queue
//! what was picked, and optionally start playback. Dismissing a menu ends
//! the session; anything queued before that stays queued.
//!
//! Of the six start modes, four ([`navigator::StartMode::Artists`],
//! `Albums`, `Tracks`, `Everything`) read from the cached library index,
//! while `Genres` and `Playlists` query the daemon live on every run.
//!
//! ## Library Cache
//!
//! A full library listing is slow on large collections, so the index is
//! cached as JSON under the platform data directory and reused while it is
//! younger than the configured TTL (default 600 seconds). Delete the cache
//! file or pass a different one with `--database` to force a rebuild.
//!
//! ## Error Handling
//!
//! All public functions return `Result<T, anyhow::Error>`. Common error
//! scenarios include:
//!
//! - Daemon connection failures
//! - A missing menu program (rofi not installed)
//! - File system permission issues around config and cache
//! - An empty library or an empty menu level

pub mod cli;
pub mod completion;
pub mod config;
pub mod dates;
pub mod disc_names;
pub mod library;
pub mod menu;
pub mod mpd_client;
pub mod navigator;
pub mod queue;
pub mod tags;
