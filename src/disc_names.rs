//! # Disc Names Module
//!
//! Builds the rows for the disc menu of a multi-disc album.
//!
//! A disc row is `Disc N`, or `Disc N: subtitle` when the album's files
//! carry a disc subtitle (the ID3 `TSST` frame, `DISCSUBTITLE` in Vorbis
//! comments; `lofty` normalizes both into one key). The daemon does not
//! expose that tag, so the subtitle is read straight from the first file
//! of the disc under the configured music directory. Any failure along
//! the way (missing file, unreadable tags, empty frame) falls back to the
//! bare `Disc N` form.

use lofty::file::TaggedFileExt;
use lofty::tag::ItemKey;
use log::debug;
use std::path::Path;

/// Menu row for one disc.
#[must_use]
pub fn disc_label(disc: u32, subtitle: Option<&str>) -> String {
    match subtitle {
        Some(subtitle) => format!("Disc {disc}: {subtitle}"),
        None => format!("Disc {disc}"),
    }
}

/// Menu row for one disc, with the subtitle read from `file` if possible.
///
/// `file` is a daemon URI relative to `music_directory`.
#[must_use]
pub fn disc_display_name(music_directory: &Path, file: &str, disc: u32) -> String {
    let path = music_directory.join(file);
    let subtitle = read_subtitle(&path);
    disc_label(disc, subtitle.as_deref())
}

fn read_subtitle(path: &Path) -> Option<String> {
    let tagged = match lofty::read_from_path(path) {
        Ok(tagged) => tagged,
        Err(err) => {
            debug!("No readable tags in {}: {err}", path.display());
            return None;
        }
    };
    let tag = tagged.primary_tag().or_else(|| tagged.first_tag())?;
    tag.get_string(ItemKey::SetSubtitle)
        .map(|subtitle| subtitle.trim().to_string())
        .filter(|subtitle| !subtitle.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_disc_label_without_subtitle() {
        assert_eq!(disc_label(1, None), "Disc 1");
    }

    #[test]
    fn test_disc_label_with_subtitle() {
        assert_eq!(disc_label(2, Some("Live at Pompeii")), "Disc 2: Live at Pompeii");
    }

    #[test]
    fn test_missing_file_falls_back_to_bare_label() {
        let root = PathBuf::from("/nonexistent/music");
        assert_eq!(disc_display_name(&root, "gone/away.flac", 3), "Disc 3");
    }
}
