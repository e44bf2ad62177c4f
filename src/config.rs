//! # Configuration Module
//!
//! Minuet reads a TOML settings file from the platform config directory and
//! seeds it with defaults on first run, so a fresh install works against a
//! local MPD with zero setup.
//!
//! ## Locations
//!
//! - Settings: `<config_dir>/minuet/config.toml`
//!   (Linux: `~/.config/minuet/config.toml`)
//! - Library cache: `<data_dir>/minuet/library.json`
//!   (Linux: `~/.local/share/minuet/library.json`)
//!
//! Every settings key is optional. Absent keys take the defaults below, so a
//! partial file written by hand stays valid across upgrades.

use anyhow::{Context, Result};
use log::{debug, info};
use path_absolutize::Absolutize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Standard MPD port, used wherever an endpoint omits one.
pub const DEFAULT_PORT: u16 = 6600;

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// One MPD endpoint from the `[[hosts]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Host {
    /// `host:port` form accepted by the daemon connector and shown in the
    /// host menu.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// On-disk settings (`config.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the music collection, for reading disc subtitle tags.
    pub music_directory: String,
    /// Pass the menu program its case-sensitive matching mode.
    pub case_sensitive: bool,
    /// Read disc subtitles from file tags when listing discs.
    pub enable_disc_names: bool,
    /// Re-prompt the track menu after a track is queued.
    pub tracks_keep_open: bool,
    /// Re-prompt the disc menu after a disc is queued.
    pub discs_keep_open: bool,
    /// Start playback once something has been queued.
    pub play_on_add: bool,
    /// Library cache lifetime in seconds.
    pub cache_ttl: u64,
    pub hosts: Vec<Host>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_directory: "~/Music".to_string(),
            case_sensitive: false,
            enable_disc_names: true,
            tracks_keep_open: true,
            discs_keep_open: true,
            play_on_add: false,
            cache_ttl: 600,
            hosts: vec![Host {
                host: "localhost".to_string(),
                port: DEFAULT_PORT,
            }],
        }
    }
}

impl Settings {
    /// Load settings from the standard location, writing the defaults there
    /// first if no file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_or_create(&config_file_path()?)
    }

    /// Load settings from `path`, seeding it with defaults when absent.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file {}", path.display()))?;
            let settings = toml::from_str(&text)
                .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
            debug!("Loaded settings from {}", path.display());
            return Ok(settings);
        }

        let settings = Self::default();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create settings directory {}", dir.display())
            })?;
        }
        let text = toml::to_string(&settings).context("Failed to serialize default settings")?;
        fs::write(path, text)
            .with_context(|| format!("Failed to write default settings to {}", path.display()))?;
        info!("Wrote default settings to {}", path.display());
        Ok(settings)
    }
}

/// Command-line overrides applied on top of [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub case_sensitive: bool,
    /// `Some(true)` / `Some(false)` from the play flags, `None` to keep the
    /// configured behavior.
    pub play: Option<bool>,
    pub menu_args: Vec<String>,
}

/// Fully merged view of settings and overrides that the navigation flow
/// runs with.
#[derive(Debug, Clone)]
pub struct Runtime {
    pub music_directory: PathBuf,
    pub case_sensitive: bool,
    pub enable_disc_names: bool,
    pub tracks_keep_open: bool,
    pub discs_keep_open: bool,
    pub play_on_add: bool,
    pub cache_path: PathBuf,
    pub cache_ttl: u64,
    pub hosts: Vec<Host>,
    pub host_override: Option<String>,
    pub port_override: Option<u16>,
    pub menu_args: Vec<String>,
}

impl Runtime {
    /// Merge `overrides` over `settings` and resolve all paths.
    pub fn assemble(settings: Settings, overrides: Overrides) -> Result<Self> {
        Ok(Self {
            music_directory: expand_tilde(&settings.music_directory),
            case_sensitive: settings.case_sensitive || overrides.case_sensitive,
            enable_disc_names: settings.enable_disc_names,
            tracks_keep_open: settings.tracks_keep_open,
            discs_keep_open: settings.discs_keep_open,
            play_on_add: overrides.play.unwrap_or(settings.play_on_add),
            cache_path: resolve_cache_path(overrides.database.as_deref())?,
            cache_ttl: settings.cache_ttl,
            hosts: settings.hosts,
            host_override: overrides.host,
            port_override: overrides.port,
            menu_args: overrides.menu_args,
        })
    }
}

/// Path of the settings file inside the platform config directory.
pub fn config_file_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine the system configuration directory"))?;
    Ok(config_dir.join("minuet").join("config.toml"))
}

/// Default location of the library cache, creating the data directory on
/// the way.
pub fn default_cache_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine the system data directory"))?;

    let minuet_dir = data_dir.join("minuet");
    fs::create_dir_all(&minuet_dir).with_context(|| {
        format!("Failed to create data directory at {}", minuet_dir.display())
    })?;

    Ok(minuet_dir.join("library.json"))
}

/// Resolve the cache location, preferring a user-supplied override.
///
/// Overrides go through tilde expansion and are absolutized so a relative
/// path keeps meaning the same file regardless of later directory changes.
pub fn resolve_cache_path(override_path: Option<&str>) -> Result<PathBuf> {
    match override_path {
        Some(raw) => {
            let expanded = expand_tilde(raw);
            let absolute = expanded
                .absolutize()
                .with_context(|| format!("Failed to resolve cache path override '{raw}'"))?;
            Ok(absolute.into_owned())
        }
        None => default_cache_path(),
    }
}

/// Expand a leading `~` to the home directory.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        if path == "~" {
            return home;
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
