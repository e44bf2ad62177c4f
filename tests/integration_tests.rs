//! # Integration Tests for Minuet
//!
//! This module contains integration tests that exercise Minuet from a user
//! perspective: the command-line surface, the settings and cache plumbing,
//! and full menu sessions driven against scripted stand-ins for rofi and
//! the daemon.

use anyhow::Result;
use minuet::tags::RawRecord;
use std::process::Command;
use tempfile::TempDir;

/// Test helper producing a small two-artist listing.
fn sample_records() -> Vec<RawRecord> {
    let mk = |file: &str, tags: &[(&str, &str)]| RawRecord {
        file: file.to_string(),
        tags: tags
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    };
    vec![
        mk(
            "queen/opera/1.mp3",
            &[
                ("Artist", "Queen"),
                ("Album", "A Night at the Opera"),
                ("Title", "Death on Two Legs"),
                ("Track", "1"),
                ("Date", "1975"),
            ],
        ),
        mk(
            "queen/opera/2.mp3",
            &[
                ("Artist", "Queen"),
                ("Album", "A Night at the Opera"),
                ("Title", "Lazing on a Sunday Afternoon"),
                ("Track", "2"),
                ("Date", "1975"),
            ],
        ),
        mk(
            "ben/bootleg.mp3",
            &[("Artist", "Ben"), ("Title", "Bootleg Cut")],
        ),
    ]
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    #[test]
    fn test_cli_help_displays_correctly() {
        let output = Command::new("cargo")
            .args(["run", "--", "--help"])
            .output()
            .expect("Failed to run help command");

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("minuet"));
        assert!(stdout.contains("--artists"));
        assert!(stdout.contains("--albums"));
        assert!(stdout.contains("--tracks"));
        assert!(stdout.contains("--genres"));
        assert!(stdout.contains("--playlists"));
        assert!(stdout.contains("--completions"));
    }

    #[test]
    fn test_cli_version_flag() {
        let output = Command::new("cargo")
            .args(["run", "--", "--version"])
            .output()
            .expect("Failed to run version command");

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("minuet"));
        assert!(stdout.contains("2.0.1"));
    }

    #[test]
    fn test_completion_generation() {
        let output = Command::new("cargo")
            .args(["run", "--", "--completions", "bash"])
            .output()
            .expect("Failed to run completion command");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("_minuet"));
        assert!(stdout.contains("complete"));
    }
}

#[cfg(test)]
mod configuration_tests {
    use super::*;
    use minuet::config::{self, Overrides, Runtime, Settings};

    #[test]
    fn test_first_load_seeds_a_usable_settings_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("minuet").join("config.toml");

        let settings = Settings::load_or_create(&path)?;
        assert!(path.exists());
        assert_eq!(settings.hosts[0].address(), "localhost:6600");

        let runtime = Runtime::assemble(settings, Overrides::default())?;
        assert!(!runtime.play_on_add);
        assert!(runtime.cache_path.is_absolute());
        Ok(())
    }

    #[test]
    fn test_hand_written_partial_settings_survive() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "play_on_add = true\n\n[[hosts]]\nhost = \"music.local\"\nport = 6601\n",
        )?;

        let settings = Settings::load_or_create(&path)?;
        assert!(settings.play_on_add);
        assert_eq!(settings.hosts.len(), 1);
        assert_eq!(settings.hosts[0].port, 6601);
        assert_eq!(settings.cache_ttl, 600, "absent keys keep their defaults");
        Ok(())
    }

    #[test]
    fn test_cache_path_override_is_absolutized() -> Result<()> {
        let resolved = config::resolve_cache_path(Some("relative/cache.json"))?;
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("relative/cache.json"));
        Ok(())
    }
}

#[cfg(test)]
mod library_cache_tests {
    use super::*;
    use minuet::library::Library;

    #[test]
    fn test_index_survives_a_cache_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("library.json");

        let library = Library::build(&sample_records());
        library.save(&path)?;
        let reloaded = Library::load(&path)?;

        assert_eq!(reloaded, library);
        assert_eq!(reloaded.artist_names(), vec!["Ben", "Queen"]);
        assert_eq!(reloaded.songs_of("Queen", "A Night at the Opera").len(), 2);
        Ok(())
    }

    #[test]
    fn test_fresh_cache_short_circuits_the_listing() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("library.json");
        Library::build(&sample_records()).save(&path)?;

        let library = Library::load_or_build(&path, 600, || {
            panic!("a fresh cache must not trigger a daemon listing")
        })?;
        assert_eq!(library.artist_names(), vec!["Ben", "Queen"]);
        Ok(())
    }

    #[test]
    fn test_untagged_records_group_under_the_unknown_album() {
        let library = Library::build(&sample_records());
        let albums = library.albums_of("Ben");
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].name, "[Unknown Album]");
    }
}

#[cfg(test)]
mod session_tests {
    use super::*;
    use minuet::config::Runtime;
    use minuet::menu::Menu;
    use minuet::mpd_client::MpdClient;
    use minuet::navigator::{Navigator, RunOutcome, StartMode};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::rc::Rc;

    /// Daemon stand-in answering queries from a fixed listing. Queue and
    /// playback effects land in shared handles the test keeps, since the
    /// navigator consumes the daemon itself.
    struct ScriptedDaemon {
        records: Vec<RawRecord>,
        queued: Rc<RefCell<Vec<String>>>,
        played: Rc<RefCell<bool>>,
    }

    impl MpdClient for ScriptedDaemon {
        fn all_records(&mut self) -> Result<Vec<RawRecord>> {
            Ok(self.records.clone())
        }

        fn tag_values(&mut self, tag: &str, _filters: &[(&str, &str)]) -> Result<Vec<String>> {
            let mut values: Vec<String> = Vec::new();
            for record in &self.records {
                if let Some(value) = record.first_value(tag) {
                    if !values.iter().any(|seen| seen == value) {
                        values.push(value.to_string());
                    }
                }
            }
            Ok(values)
        }

        fn tracks_where(&mut self, filters: &[(&str, &str)]) -> Result<Vec<RawRecord>> {
            Ok(self
                .records
                .iter()
                .filter(|record| {
                    filters
                        .iter()
                        .all(|(tag, value)| record.first_value(tag) == Some(*value))
                })
                .cloned()
                .collect())
        }

        fn enqueue(&mut self, uri: &str) -> Result<()> {
            self.queued.borrow_mut().push(uri.to_string());
            Ok(())
        }

        fn playlist_names(&mut self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn load_playlist(&mut self, _name: &str) -> Result<()> {
            Ok(())
        }

        fn is_playing(&mut self) -> Result<bool> {
            Ok(false)
        }

        fn start_playback(&mut self) -> Result<()> {
            *self.played.borrow_mut() = true;
            Ok(())
        }
    }

    /// Menu stand-in replaying a fixed pick sequence.
    struct ScriptedMenu {
        picks: RefCell<VecDeque<Option<usize>>>,
    }

    impl Menu for ScriptedMenu {
        fn select(&self, _prompt: &str, _items: &[String], _preselect: usize) -> Result<Option<usize>> {
            Ok(self.picks.borrow_mut().pop_front().unwrap_or(None))
        }
    }

    fn session_runtime(cache_dir: &TempDir) -> Runtime {
        Runtime {
            music_directory: PathBuf::from("/nonexistent"),
            case_sensitive: false,
            enable_disc_names: false,
            tracks_keep_open: false,
            discs_keep_open: false,
            play_on_add: true,
            cache_path: cache_dir.path().join("library.json"),
            cache_ttl: 600,
            hosts: Vec::new(),
            host_override: None,
            port_override: None,
            menu_args: Vec::new(),
        }
    }

    #[test]
    fn test_artist_session_queues_an_album_and_starts_playback() -> Result<()> {
        let cache = TempDir::new()?;
        let runtime = session_runtime(&cache);
        let menu = ScriptedMenu {
            picks: RefCell::new(VecDeque::from([Some(1), Some(0), Some(0)])),
        };
        let queued = Rc::new(RefCell::new(Vec::new()));
        let played = Rc::new(RefCell::new(false));
        let daemon = ScriptedDaemon {
            records: sample_records(),
            queued: Rc::clone(&queued),
            played: Rc::clone(&played),
        };

        // Queen -> its only album -> All.
        let outcome = Navigator::new(daemon, &menu, &runtime).run(StartMode::Artists)?;

        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(
            *queued.borrow(),
            vec!["queen/opera/1.mp3", "queen/opera/2.mp3"]
        );
        assert!(*played.borrow(), "play_on_add should start playback");
        assert!(
            runtime.cache_path.exists(),
            "a session through the index should leave a cache behind"
        );
        Ok(())
    }

    #[test]
    fn test_dismissed_session_is_still_a_success() -> Result<()> {
        let cache = TempDir::new()?;
        let runtime = session_runtime(&cache);
        let menu = ScriptedMenu {
            picks: RefCell::new(VecDeque::from([None])),
        };
        let queued = Rc::new(RefCell::new(Vec::new()));
        let played = Rc::new(RefCell::new(false));
        let daemon = ScriptedDaemon {
            records: sample_records(),
            queued: Rc::clone(&queued),
            played: Rc::clone(&played),
        };

        let outcome = Navigator::new(daemon, &menu, &runtime).run(StartMode::Artists)?;

        assert_eq!(outcome, RunOutcome::Dismissed);
        assert!(queued.borrow().is_empty());
        assert!(!*played.borrow(), "nothing queued means nothing to start");
        Ok(())
    }
}
