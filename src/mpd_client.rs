//! # MPD Client Module
//!
//! Speaks the MPD protocol through the `mpd` crate and exposes the small
//! set of daemon operations the navigation flow needs behind the
//! [`MpdClient`] trait.
//!
//! ## Why a trait
//!
//! Every menu decision in this program ends in daemon calls, so the tests
//! drive the whole navigation flow against scripted fakes of this trait and
//! assert on the exact call sequence. [`MpdConnection`] is the one
//! production implementation.
//!
//! ## Protocol notes
//!
//! - `listallinfo` returns songs and directory entries alike; directory
//!   entries carry no tags and get filtered out later by the index's
//!   artist rule.
//! - The crate parses the title and artist into their own fields and
//!   leaves the other tags as raw pairs, so the conversion into
//!   [`RawRecord`] folds both back into the pair list.
//! - Search windows are half-open `(start, end)` ranges; listings here
//!   always request the full window.

use crate::tags::RawRecord;
use anyhow::{Context, Result};
use log::{debug, info};
use mpd::status::State;
use mpd::{Client, Query, Song, Term};
use std::borrow::Cow;

/// Daemon operations the navigation flow depends on.
pub trait MpdClient {
    /// Every entry in the daemon's database, in database order.
    fn all_records(&mut self) -> Result<Vec<RawRecord>>;

    /// Distinct values of `tag` among songs matching every `(tag, value)`
    /// filter; an empty filter list spans the whole database.
    fn tag_values(&mut self, tag: &str, filters: &[(&str, &str)]) -> Result<Vec<String>>;

    /// Songs matching every `(tag, value)` filter.
    fn tracks_where(&mut self, filters: &[(&str, &str)]) -> Result<Vec<RawRecord>>;

    /// Append one song to the play queue.
    fn enqueue(&mut self, uri: &str) -> Result<()>;

    /// Names of the stored playlists.
    fn playlist_names(&mut self) -> Result<Vec<String>>;

    /// Append a stored playlist to the play queue.
    fn load_playlist(&mut self, name: &str) -> Result<()>;

    fn is_playing(&mut self) -> Result<bool>;

    fn start_playback(&mut self) -> Result<()>;
}

/// Live connection to a daemon.
pub struct MpdConnection {
    client: Client,
}

/// Open a connection to `host:port`.
pub fn connect(host: &str, port: u16) -> Result<MpdConnection> {
    let address = format!("{host}:{port}");
    debug!("Connecting to MPD at {address}");
    let client = Client::connect(&address)
        .with_context(|| format!("Failed to connect to MPD at {address}"))?;
    info!("Connected to MPD at {address}");
    Ok(MpdConnection { client })
}

fn build_query<'a>(filters: &'a [(&'a str, &'a str)]) -> Query<'a> {
    let mut query = Query::new();
    for (tag, value) in filters {
        query.and(Term::Tag(Cow::Borrowed(*tag)), *value);
    }
    query
}

impl MpdClient for MpdConnection {
    fn all_records(&mut self) -> Result<Vec<RawRecord>> {
        let songs = self
            .client
            .listallinfo()
            .context("Failed to list the daemon's database")?;
        debug!("Daemon returned {} database entries", songs.len());
        Ok(songs.into_iter().map(RawRecord::from).collect())
    }

    fn tag_values(&mut self, tag: &str, filters: &[(&str, &str)]) -> Result<Vec<String>> {
        let query = build_query(filters);
        self.client
            .list(&Term::Tag(Cow::Borrowed(tag)), &query)
            .with_context(|| format!("Failed to list {tag} values from the daemon"))
    }

    fn tracks_where(&mut self, filters: &[(&str, &str)]) -> Result<Vec<RawRecord>> {
        let query = build_query(filters);
        let songs = self
            .client
            .find(&query, (0, u32::MAX))
            .context("Failed to search the daemon's database")?;
        Ok(songs.into_iter().map(RawRecord::from).collect())
    }

    fn enqueue(&mut self, uri: &str) -> Result<()> {
        debug!("Queueing {uri}");
        self.client
            .push(Song {
                file: uri.to_string(),
                ..Default::default()
            })
            .with_context(|| format!("Failed to queue '{uri}'"))?;
        Ok(())
    }

    fn playlist_names(&mut self) -> Result<Vec<String>> {
        let playlists = self
            .client
            .playlists()
            .context("Failed to list stored playlists")?;
        Ok(playlists.into_iter().map(|playlist| playlist.name).collect())
    }

    fn load_playlist(&mut self, name: &str) -> Result<()> {
        info!("Loading playlist '{name}'");
        self.client
            .load(name, ..)
            .with_context(|| format!("Failed to load playlist '{name}'"))
    }

    fn is_playing(&mut self) -> Result<bool> {
        let status = self
            .client
            .status()
            .context("Failed to read the daemon's status")?;
        Ok(status.state == State::Play)
    }

    fn start_playback(&mut self) -> Result<()> {
        info!("Starting playback");
        self.client.play().context("Failed to start playback")
    }
}

impl From<Song> for RawRecord {
    fn from(song: Song) -> Self {
        let mut tags = Vec::with_capacity(song.tags.len() + 2);
        if let Some(title) = song.title {
            tags.push(("Title".to_string(), title));
        }
        if let Some(artist) = song.artist {
            tags.push(("Artist".to_string(), artist));
        }
        tags.extend(song.tags);
        Self {
            file: song.file,
            tags,
        }
    }
}
