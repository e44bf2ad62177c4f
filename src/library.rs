//! # Library Index
//!
//! Builds the navigable view of the music collection: artists mapped to
//! their albums, each album carrying a resolved release epoch and its songs
//! in play order. The daemon's full listing is slow on large collections,
//! so the index is cached as a JSON document and reused while it is young.
//!
//! ## Shape
//!
//! - Records without an artist tag (directories, untagged files) are
//!   skipped entirely.
//! - Records without an album tag group under [`UNKNOWN_ALBUM`].
//! - An album's epoch comes from the record that first created its bucket;
//!   later records never revise it, so a rebuild over the same listing
//!   reproduces the same index.
//! - Songs within an album are stored sorted by `(disc, track, file)`;
//!   album listings come back sorted by `(epoch, name)` so undated albums
//!   (sentinel epoch) lead and ties stay stable.
//!
//! ## Cache
//!
//! The document carries a version tag and is replaced atomically (written
//! to a temporary file in the same directory, then persisted over the
//! target). An unreadable, unparsable or version-mismatched cache is
//! treated as a miss and rebuilt; a failed write is logged and ignored,
//! since the index in memory is still good.

use crate::dates::{resolve_epoch, LONG_TIME_AGO};
use crate::tags::{RawRecord, Track, UNKNOWN_ALBUM};
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use tempfile::NamedTempFile;

/// Cache document version; bump when the on-disk shape changes.
const CACHE_VERSION: u32 = 1;

/// One album bucket: release epoch plus songs in play order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub epoch: i64,
    pub songs: Vec<Track>,
}

/// One row for an album menu: owning artist, album name, release epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumEntry {
    pub artist: String,
    pub name: String,
    pub epoch: i64,
}

/// The full index: artist name to album name to [`Album`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    artists: BTreeMap<String, BTreeMap<String, Album>>,
}

#[derive(Serialize)]
struct CacheDocumentRef<'a> {
    version: u32,
    artists: &'a BTreeMap<String, BTreeMap<String, Album>>,
}

#[derive(Deserialize)]
struct CacheDocument {
    version: u32,
    artists: BTreeMap<String, BTreeMap<String, Album>>,
}

impl Library {
    /// Build the index from a full-library listing.
    #[must_use]
    pub fn build(records: &[RawRecord]) -> Self {
        let mut artists: BTreeMap<String, BTreeMap<String, Album>> = BTreeMap::new();

        for record in records {
            let track = record.normalize();
            let Some(artist) = track.artist.clone() else {
                continue;
            };

            let album = artists
                .entry(artist)
                .or_default()
                .entry(track.album.clone())
                .or_insert_with(|| Album {
                    // The record that creates the bucket fixes the album
                    // date, even when that record itself is undated.
                    epoch: track.date.as_deref().map_or(LONG_TIME_AGO, resolve_epoch),
                    songs: Vec::new(),
                });
            album.songs.push(track);
        }

        for albums in artists.values_mut() {
            for album in albums.values_mut() {
                album.songs.sort_by(|a, b| {
                    (a.disc, a.track, a.file.as_str()).cmp(&(b.disc, b.track, b.file.as_str()))
                });
            }
        }

        let library = Self { artists };
        debug!(
            "Indexed {} artists, {} albums, {} songs",
            library.artists.len(),
            library.artists.values().map(BTreeMap::len).sum::<usize>(),
            library
                .artists
                .values()
                .flat_map(BTreeMap::values)
                .map(|album| album.songs.len())
                .sum::<usize>()
        );
        library
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    /// All artists in lexicographic order.
    #[must_use]
    pub fn artist_names(&self) -> Vec<String> {
        self.artists.keys().cloned().collect()
    }

    /// One artist's albums, release order.
    #[must_use]
    pub fn albums_of(&self, artist: &str) -> Vec<AlbumEntry> {
        let mut entries: Vec<AlbumEntry> = self
            .artists
            .get(artist)
            .into_iter()
            .flat_map(|albums| {
                albums.iter().map(|(name, album)| AlbumEntry {
                    artist: artist.to_string(),
                    name: name.clone(),
                    epoch: album.epoch,
                })
            })
            .collect();
        sort_album_entries(&mut entries);
        entries
    }

    /// Every album across the whole collection, release order.
    #[must_use]
    pub fn all_albums(&self) -> Vec<AlbumEntry> {
        let mut entries: Vec<AlbumEntry> = self
            .artists
            .iter()
            .flat_map(|(artist, albums)| {
                albums.iter().map(|(name, album)| AlbumEntry {
                    artist: artist.clone(),
                    name: name.clone(),
                    epoch: album.epoch,
                })
            })
            .collect();
        sort_album_entries(&mut entries);
        entries
    }

    /// Songs of one album in play order; empty when the album is unknown.
    #[must_use]
    pub fn songs_of(&self, artist: &str, album: &str) -> &[Track] {
        self.artists
            .get(artist)
            .and_then(|albums| albums.get(album))
            .map_or(&[], |album| album.songs.as_slice())
    }

    /// Load a versioned cache document.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read library cache {}", path.display()))?;
        let doc: CacheDocument = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse library cache {}", path.display()))?;
        if doc.version != CACHE_VERSION {
            bail!(
                "Library cache {} has version {}, expected {}",
                path.display(),
                doc.version,
                CACHE_VERSION
            );
        }
        Ok(Self {
            artists: doc.artists,
        })
    }

    /// Write the cache document, replacing any previous one atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;

        let mut file = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create a temporary file in {}", dir.display()))?;
        serde_json::to_writer(
            &mut file,
            &CacheDocumentRef {
                version: CACHE_VERSION,
                artists: &self.artists,
            },
        )
        .context("Failed to serialize the library cache")?;
        file.persist(path)
            .map_err(|err| err.error)
            .with_context(|| format!("Failed to move the library cache into {}", path.display()))?;

        debug!("Wrote library cache to {}", path.display());
        Ok(())
    }

    /// Reuse a fresh cache, otherwise fetch the listing and rebuild.
    ///
    /// `fetch` runs only on a cache miss. A cache that cannot be written
    /// back is logged and skipped; the in-memory index is returned either
    /// way.
    pub fn load_or_build(
        path: &Path,
        ttl_seconds: u64,
        fetch: impl FnOnce() -> Result<Vec<RawRecord>>,
    ) -> Result<Self> {
        if cache_is_fresh(path, ttl_seconds) {
            match Self::load(path) {
                Ok(library) => {
                    debug!("Using library cache at {}", path.display());
                    return Ok(library);
                }
                Err(err) => warn!("Ignoring unusable library cache: {err:#}"),
            }
        }

        info!("Indexing the music library");
        let records = fetch().context("Failed to list the music library")?;
        let library = Self::build(&records);

        if let Err(err) = library.save(path) {
            warn!("Failed to write the library cache: {err:#}");
        }

        Ok(library)
    }
}

pub(crate) fn sort_album_entries(entries: &mut [AlbumEntry]) {
    entries.sort_by(|a, b| {
        (a.epoch, a.name.as_str(), a.artist.as_str())
            .cmp(&(b.epoch, b.name.as_str(), b.artist.as_str()))
    });
}

/// A cache younger than the TTL counts as fresh. Missing files and
/// unreadable metadata are stale; an mtime in the future is fresh.
fn cache_is_fresh(path: &Path, ttl_seconds: u64) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    let Ok(modified) = metadata.modified() else {
        return false;
    };
    match SystemTime::now().duration_since(modified) {
        Ok(age) => age.as_secs() < ttl_seconds,
        Err(_) => true,
    }
}
