//! # Tag Access
//!
//! MPD reports song metadata as an ordered list of key/value pairs, and the
//! same key may appear more than once (multi-valued tags, usually a tagging
//! accident). Navigation wants exactly one value per tag, so this module
//! provides the scalar view: the first occurrence wins, and missing tags
//! fall back to fixed defaults.
//!
//! [`RawRecord`] is the transport shape handed over by the daemon adapter;
//! [`Track`] is the normalized shape the rest of the crate works with and
//! the one persisted in the library cache.

use serde::{Deserialize, Serialize};

/// Album name substituted when a song carries no album tag.
pub const UNKNOWN_ALBUM: &str = "[Unknown Album]";

/// Placeholder for missing free-text tags.
pub const MISSING_TAG: &str = "N/A";

/// A song entry as reported by the daemon: its URI plus every tag pair in
/// protocol order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub file: String,
    pub tags: Vec<(String, String)>,
}

impl RawRecord {
    /// First occurrence of `key` among the tag pairs, matched
    /// case-insensitively.
    #[must_use]
    pub fn first_value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Scalar string tag, with the [`MISSING_TAG`] fallback.
    #[must_use]
    pub fn string_tag(&self, key: &str) -> String {
        self.first_value(key).unwrap_or(MISSING_TAG).to_string()
    }

    /// Scalar numeric tag.
    ///
    /// Values like `"3/12"` (position/total style) count as their leading
    /// digits; values without leading digits yield `default`.
    #[must_use]
    pub fn numeric_tag(&self, key: &str, default: u32) -> u32 {
        self.first_value(key)
            .and_then(leading_number)
            .unwrap_or(default)
    }

    /// Normalize into the fixed shape navigation and the cache work with.
    ///
    /// Disc defaults to 1 and track to 0, matching how untagged singles
    /// should sort within an album.
    #[must_use]
    pub fn normalize(&self) -> Track {
        Track {
            file: self.file.clone(),
            title: self.string_tag("Title"),
            artist: self.first_value("Artist").map(str::to_string),
            album: self
                .first_value("Album")
                .unwrap_or(UNKNOWN_ALBUM)
                .to_string(),
            disc: self.numeric_tag("Disc", 1),
            track: self.numeric_tag("Track", 0),
            date: self.first_value("Date").map(str::to_string),
        }
    }
}

fn leading_number(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    let digits = &trimmed[..trimmed.bytes().take_while(u8::is_ascii_digit).count()];
    digits.parse().ok()
}

/// Normalized song used by the navigation flow and the library cache.
///
/// `artist` and `date` stay optional: the index build skips artist-less
/// records entirely, and date resolution distinguishes an absent date from
/// a present but malformed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub file: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    pub album: String,
    pub disc: u32,
    pub track: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Track {
    /// Artist for display contexts, with the missing-tag placeholder.
    #[must_use]
    pub fn display_artist(&self) -> &str {
        self.artist.as_deref().unwrap_or(MISSING_TAG)
    }
}
