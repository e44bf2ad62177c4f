//! # Navigator Module
//!
//! The selection flow: an explicit state machine that walks the user from
//! a start menu down to queued tracks.
//!
//! ## States
//!
//! A run starts at the state its [`StartMode`] names and moves through
//! menus one prompt at a time:
//!
//! - **Artists** → albums of the chosen artist → tracks of the chosen
//!   album (with a disc sub-menu for multi-disc albums).
//! - **AllAlbums** lists every album across the collection, artist-prefixed.
//! - **Genres** and **FlatTracks** skip the library index and work from
//!   live daemon queries.
//! - **Playlists** loads one stored playlist and ends.
//! - **Everything** is one flat menu of every artist, album and track;
//!   artists and albums descend into the normal levels, a track enqueues
//!   directly.
//!
//! Host selection happens before any of this, since a daemon connection
//! is needed to drive the rest.
//!
//! ## Dismissal and cycling
//!
//! Dismissing any prompt ends the whole run. There is no backward
//! navigation; whatever was queued before the dismissal stays queued, and
//! the run still counts as a success. The track and disc levels can
//! instead cycle: after a pick the same menu reopens with the picked row
//! highlighted, so several tracks can be queued in one run.
//!
//! ## Menu rows
//!
//! Row text is derived, never stored. The track level always leads with
//! an `All` row for the whole scope, and with a `Disc...` row when the
//! scope spans more than one disc (never in the genre or flat-track
//! flows, where a disc split makes no sense).

use crate::config::{Runtime, DEFAULT_PORT};
use crate::dates;
use crate::disc_names;
use crate::library::{sort_album_entries, AlbumEntry, Library};
use crate::menu::Menu;
use crate::mpd_client::{self, MpdClient};
use crate::queue::QueueDriver;
use crate::tags::{RawRecord, Track};
use anyhow::{bail, Result};
use log::debug;
use std::collections::BTreeSet;

const ALL_ENTRY: &str = "All";
const DISC_ENTRY: &str = "Disc...";

/// Which menu a run starts at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    Artists,
    Albums,
    Tracks,
    Genres,
    Playlists,
    Everything,
}

/// How a run ended. Both outcomes are successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The flow reached a terminal action.
    Completed,
    /// The user dismissed a prompt.
    Dismissed,
}

/// Connect to the right daemon and drive one full selection run.
///
/// ```no_run
/// use minuet::config::{Runtime, Settings};
/// use minuet::menu::RofiMenu;
/// use minuet::navigator::{self, StartMode};
///
/// let settings = Settings::load()?;
/// let config = Runtime::assemble(settings, Default::default())?;
/// let menu = RofiMenu::new(config.case_sensitive, config.menu_args.clone());
/// navigator::run(&menu, &config, StartMode::Artists)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn run<M: Menu>(menu: &M, config: &Runtime, mode: StartMode) -> Result<RunOutcome> {
    let Some((host, port)) = resolve_host(menu, config)? else {
        debug!("Host prompt dismissed, ending the run");
        return Ok(RunOutcome::Dismissed);
    };
    let client = mpd_client::connect(&host, port)?;
    Navigator::new(client, menu, config).run(mode)
}

/// Pick the daemon to talk to.
///
/// An explicit host override wins outright and suppresses the prompt; a
/// lone configured host is used as-is; several configured hosts are put
/// to the user. A port override applies on top of whichever host won.
fn resolve_host<M: Menu>(menu: &M, config: &Runtime) -> Result<Option<(String, u16)>> {
    if let Some(host) = &config.host_override {
        let port = config.port_override.unwrap_or(DEFAULT_PORT);
        return Ok(Some((host.clone(), port)));
    }

    let chosen = match config.hosts.len() {
        0 => bail!("No MPD hosts are configured; add one to the config file or pass --host"),
        1 => &config.hosts[0],
        _ => {
            let names: Vec<String> = config.hosts.iter().map(|host| host.host.clone()).collect();
            match menu.select("Select host", &names, 0)? {
                Some(index) => &config.hosts[index],
                None => return Ok(None),
            }
        }
    };
    let port = config.port_override.unwrap_or(chosen.port);
    Ok(Some((chosen.host.clone(), port)))
}

/// The tracks a track-level menu operates on.
#[derive(Debug)]
struct TrackScope {
    tracks: Vec<Track>,
    allow_discs: bool,
}

#[derive(Debug)]
enum State {
    Artists,
    ArtistAlbums { artist: String },
    AllAlbums,
    Genres,
    GenreAlbums { genre: String },
    Tracks { scope: TrackScope, preselect: usize },
    Discs { tracks: Vec<Track>, preselect: usize },
    Playlists,
    Everything,
    FlatTracks,
}

enum Step {
    Goto(State),
    Done,
    Dismissed,
}

/// What an everything-mode row stands for.
#[derive(Debug)]
enum Pick {
    Artist(String),
    Album { artist: String, name: String },
    Track { file: String },
}

/// Drives the menu flow against one connected daemon.
pub struct Navigator<'a, C, M> {
    client: C,
    menu: &'a M,
    config: &'a Runtime,
    library: Option<Library>,
    queue: QueueDriver,
}

impl<'a, C: MpdClient, M: Menu> Navigator<'a, C, M> {
    #[must_use]
    pub fn new(client: C, menu: &'a M, config: &'a Runtime) -> Self {
        Self {
            client,
            menu,
            config,
            library: None,
            queue: QueueDriver::new(config.play_on_add),
        }
    }

    /// Run the state machine to one of its two endings, then settle the
    /// playback policy. Tracks queued before a dismissal stay queued, so
    /// the policy applies to both endings.
    pub fn run(mut self, mode: StartMode) -> Result<RunOutcome> {
        let mut state = initial_state(mode);
        let outcome = loop {
            match self.step(state)? {
                Step::Goto(next) => state = next,
                Step::Done => break RunOutcome::Completed,
                Step::Dismissed => {
                    debug!("Menu dismissed, ending the run");
                    break RunOutcome::Dismissed;
                }
            }
        };
        let Self { mut client, queue, .. } = self;
        queue.finish(&mut client)?;
        Ok(outcome)
    }

    fn step(&mut self, state: State) -> Result<Step> {
        match state {
            State::Artists => self.step_artists(),
            State::ArtistAlbums { artist } => self.step_artist_albums(&artist),
            State::AllAlbums => self.step_all_albums(),
            State::Genres => self.step_genres(),
            State::GenreAlbums { genre } => self.step_genre_albums(&genre),
            State::Tracks { scope, preselect } => self.step_tracks(scope, preselect),
            State::Discs { tracks, preselect } => self.step_discs(tracks, preselect),
            State::Playlists => self.step_playlists(),
            State::Everything => self.step_everything(),
            State::FlatTracks => self.step_flat_tracks(),
        }
    }

    fn step_artists(&mut self) -> Result<Step> {
        let names = self.library()?.artist_names();
        if names.is_empty() {
            bail!("The music library is empty");
        }
        Ok(match self.menu.select("Select artist", &names, 0)? {
            None => Step::Dismissed,
            Some(index) => Step::Goto(State::ArtistAlbums {
                artist: names[index].clone(),
            }),
        })
    }

    fn step_artist_albums(&mut self, artist: &str) -> Result<Step> {
        let entries = self.library()?.albums_of(artist);
        if entries.is_empty() {
            bail!("No albums found for artist '{artist}'");
        }
        let rows: Vec<String> = entries.iter().map(|entry| album_row(entry, false)).collect();
        Ok(match self.menu.select("Select album", &rows, 0)? {
            None => Step::Dismissed,
            Some(index) => {
                let tracks = self.library()?.songs_of(artist, &entries[index].name).to_vec();
                Step::Goto(State::Tracks {
                    scope: TrackScope {
                        tracks,
                        allow_discs: true,
                    },
                    preselect: 0,
                })
            }
        })
    }

    fn step_all_albums(&mut self) -> Result<Step> {
        let entries = self.library()?.all_albums();
        if entries.is_empty() {
            bail!("The music library is empty");
        }
        let rows: Vec<String> = entries.iter().map(|entry| album_row(entry, true)).collect();
        Ok(match self.menu.select("Select album", &rows, 0)? {
            None => Step::Dismissed,
            Some(index) => {
                let entry = &entries[index];
                let tracks = self.library()?.songs_of(&entry.artist, &entry.name).to_vec();
                Step::Goto(State::Tracks {
                    scope: TrackScope {
                        tracks,
                        allow_discs: true,
                    },
                    preselect: 0,
                })
            }
        })
    }

    fn step_genres(&mut self) -> Result<Step> {
        let genres = self.client.tag_values("Genre", &[])?;
        if genres.is_empty() {
            bail!("The daemon reported no genres");
        }
        Ok(match self.menu.select("Select genre", &genres, 0)? {
            None => Step::Dismissed,
            Some(index) => Step::Goto(State::GenreAlbums {
                genre: genres[index].clone(),
            }),
        })
    }

    fn step_genre_albums(&mut self, genre: &str) -> Result<Step> {
        let names = self.client.tag_values("Album", &[("Genre", genre)])?;
        if names.is_empty() {
            bail!("No albums found for genre '{genre}'");
        }
        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            let epoch = self.live_album_epoch(&name)?;
            entries.push(AlbumEntry {
                artist: String::new(),
                name,
                epoch,
            });
        }
        sort_album_entries(&mut entries);

        let rows: Vec<String> = entries.iter().map(|entry| album_row(entry, false)).collect();
        Ok(match self.menu.select("Select album", &rows, 0)? {
            None => Step::Dismissed,
            Some(index) => {
                let album = entries[index].name.as_str();
                let records = self.client.tracks_where(&[("Genre", genre), ("Album", album)])?;
                let mut tracks: Vec<Track> = records.iter().map(RawRecord::normalize).collect();
                tracks.sort_by(|a, b| {
                    (a.disc, a.track, a.file.as_str()).cmp(&(b.disc, b.track, b.file.as_str()))
                });
                Step::Goto(State::Tracks {
                    scope: TrackScope {
                        tracks,
                        allow_discs: false,
                    },
                    preselect: 0,
                })
            }
        })
    }

    fn step_tracks(&mut self, scope: TrackScope, preselect: usize) -> Result<Step> {
        if scope.tracks.is_empty() {
            bail!("No tracks matched the current selection");
        }

        let show_disc_entry = scope.allow_discs && distinct_discs(&scope.tracks) > 1;
        let mut rows = Vec::with_capacity(scope.tracks.len() + 2);
        rows.push(ALL_ENTRY.to_string());
        if show_disc_entry {
            rows.push(DISC_ENTRY.to_string());
        }
        rows.extend(scope.tracks.iter().map(track_row));
        let pseudo = rows.len() - scope.tracks.len();

        Ok(match self.menu.select("Select track", &rows, preselect)? {
            None => Step::Dismissed,
            Some(0) => {
                let files: Vec<&str> = scope.tracks.iter().map(|track| track.file.as_str()).collect();
                self.queue.add_all(&mut self.client, files)?;
                Step::Done
            }
            Some(1) if show_disc_entry => Step::Goto(State::Discs {
                tracks: scope.tracks,
                preselect: 0,
            }),
            Some(index) => {
                self.queue.add(&mut self.client, &scope.tracks[index - pseudo].file)?;
                if self.config.tracks_keep_open {
                    Step::Goto(State::Tracks {
                        scope,
                        preselect: index,
                    })
                } else {
                    Step::Done
                }
            }
        })
    }

    fn step_discs(&mut self, tracks: Vec<Track>, preselect: usize) -> Result<Step> {
        let (numbers, labels) = self.disc_rows(&tracks);
        Ok(match self.menu.select("Select disc", &labels, preselect)? {
            None => Step::Dismissed,
            Some(index) => {
                let disc = numbers[index];
                let files: Vec<&str> = tracks
                    .iter()
                    .filter(|track| track.disc == disc)
                    .map(|track| track.file.as_str())
                    .collect();
                self.queue.add_all(&mut self.client, files)?;
                if self.config.discs_keep_open {
                    Step::Goto(State::Discs {
                        tracks,
                        preselect: index,
                    })
                } else {
                    Step::Done
                }
            }
        })
    }

    fn step_playlists(&mut self) -> Result<Step> {
        let names = self.client.playlist_names()?;
        if names.is_empty() {
            bail!("The daemon has no stored playlists");
        }
        Ok(match self.menu.select("Select playlist", &names, 0)? {
            None => Step::Dismissed,
            Some(index) => {
                self.queue.load_playlist(&mut self.client, &names[index])?;
                Step::Done
            }
        })
    }

    fn step_everything(&mut self) -> Result<Step> {
        let (rows, picks) = {
            let library = self.library()?;
            if library.is_empty() {
                bail!("The music library is empty");
            }
            everything_rows(library)
        };
        Ok(match self.menu.select("Select music", &rows, 0)? {
            None => Step::Dismissed,
            Some(index) => match &picks[index] {
                Pick::Artist(artist) => Step::Goto(State::ArtistAlbums {
                    artist: artist.clone(),
                }),
                Pick::Album { artist, name } => {
                    let tracks = self.library()?.songs_of(artist, name).to_vec();
                    Step::Goto(State::Tracks {
                        scope: TrackScope {
                            tracks,
                            allow_discs: true,
                        },
                        preselect: 0,
                    })
                }
                Pick::Track { file } => {
                    self.queue.add(&mut self.client, file)?;
                    Step::Done
                }
            },
        })
    }

    fn step_flat_tracks(&mut self) -> Result<Step> {
        let records = self.client.all_records()?;
        let mut tracks: Vec<Track> = records
            .iter()
            .filter(|record| record.first_value("Title").is_some())
            .map(RawRecord::normalize)
            .collect();
        tracks.sort_by(|a, b| flat_sort_key(a).cmp(&flat_sort_key(b)));
        Ok(Step::Goto(State::Tracks {
            scope: TrackScope {
                tracks,
                allow_discs: false,
            },
            preselect: 0,
        }))
    }

    /// The library index, built on first use.
    fn library(&mut self) -> Result<&Library> {
        let library = match self.library.take() {
            Some(library) => library,
            None => Library::load_or_build(&self.config.cache_path, self.config.cache_ttl, || {
                self.client.all_records()
            })?,
        };
        Ok(self.library.insert(library))
    }

    /// Release epoch of an album, from a live lookup: the first record of
    /// the album that carries a date decides.
    fn live_album_epoch(&mut self, album: &str) -> Result<i64> {
        let records = self.client.tracks_where(&[("Album", album)])?;
        for record in &records {
            if let Some(date) = record.first_value("Date") {
                return Ok(dates::resolve_epoch(date));
            }
        }
        Ok(dates::LONG_TIME_AGO)
    }

    /// One row per distinct disc, ascending. `tracks` is already in
    /// `(disc, track)` order, so the first track seen for a disc is its
    /// representative for the subtitle lookup.
    fn disc_rows(&self, tracks: &[Track]) -> (Vec<u32>, Vec<String>) {
        let mut numbers: Vec<u32> = Vec::new();
        let mut labels = Vec::new();
        for track in tracks {
            if numbers.contains(&track.disc) {
                continue;
            }
            let label = if self.config.enable_disc_names {
                disc_names::disc_display_name(&self.config.music_directory, &track.file, track.disc)
            } else {
                disc_names::disc_label(track.disc, None)
            };
            numbers.push(track.disc);
            labels.push(label);
        }
        (numbers, labels)
    }
}

fn initial_state(mode: StartMode) -> State {
    match mode {
        StartMode::Artists => State::Artists,
        StartMode::Albums => State::AllAlbums,
        StartMode::Tracks => State::FlatTracks,
        StartMode::Genres => State::Genres,
        StartMode::Playlists => State::Playlists,
        StartMode::Everything => State::Everything,
    }
}

/// Menu row for one track.
#[must_use]
fn track_row(track: &Track) -> String {
    format!(
        "[{}.{}]  \t{} [{} - {}]",
        track.disc,
        track.track,
        track.title,
        track.album,
        track.display_artist()
    )
}

/// Menu row for one album; cross-artist listings prefix the artist.
#[must_use]
fn album_row(entry: &AlbumEntry, with_artist: bool) -> String {
    let year = dates::epoch_display_year(entry.epoch);
    if with_artist {
        format!("[{year}] {} - {}", entry.artist, entry.name)
    } else {
        format!("[{year}] {}", entry.name)
    }
}

fn distinct_discs(tracks: &[Track]) -> usize {
    tracks.iter().map(|track| track.disc).collect::<BTreeSet<_>>().len()
}

fn flat_sort_key(track: &Track) -> (&str, &str, u32, u32, &str) {
    (
        track.display_artist(),
        track.album.as_str(),
        track.disc,
        track.track,
        track.file.as_str(),
    )
}

/// The everything-mode rows: each artist, then each of their albums in
/// release order, each followed by its tracks in play order.
fn everything_rows(library: &Library) -> (Vec<String>, Vec<Pick>) {
    let mut rows = Vec::new();
    let mut picks = Vec::new();
    for artist in library.artist_names() {
        rows.push(artist.clone());
        picks.push(Pick::Artist(artist.clone()));
        for entry in library.albums_of(&artist) {
            rows.push(album_row(&entry, true));
            picks.push(Pick::Album {
                artist: entry.artist.clone(),
                name: entry.name.clone(),
            });
            for song in library.songs_of(&artist, &entry.name) {
                rows.push(track_row(song));
                picks.push(Pick::Track {
                    file: song.file.clone(),
                });
            }
        }
    }
    (rows, picks)
}
