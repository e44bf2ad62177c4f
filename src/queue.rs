//! # Queue Module
//!
//! Tracks what a navigation run added to the daemon's play queue and makes
//! the one start-playback decision at the end of the run.
//!
//! Songs are appended in the order the caller hands them over, so an
//! album lands in the queue in its sorted order. Whether playback should
//! start is decided exactly once, after the last menu closes: starting is
//! wanted only when it was asked for, something was actually added, and
//! the daemon is not already playing. Checking the daemon state per added
//! song would race against the daemon and could cut off a running song
//! halfway through a multi-add.

use crate::mpd_client::MpdClient;
use anyhow::Result;
use log::debug;

/// Records queue additions and drives the trailing playback decision.
pub struct QueueDriver {
    play_on_add: bool,
    added: usize,
}

impl QueueDriver {
    #[must_use]
    pub fn new(play_on_add: bool) -> Self {
        Self {
            play_on_add,
            added: 0,
        }
    }

    /// Append one song to the play queue.
    pub fn add(&mut self, client: &mut impl MpdClient, uri: &str) -> Result<()> {
        client.enqueue(uri)?;
        self.added += 1;
        Ok(())
    }

    /// Append songs in the given order.
    pub fn add_all<'a>(
        &mut self,
        client: &mut impl MpdClient,
        uris: impl IntoIterator<Item = &'a str>,
    ) -> Result<()> {
        for uri in uris {
            self.add(client, uri)?;
        }
        Ok(())
    }

    /// Append a stored playlist to the play queue.
    pub fn load_playlist(&mut self, client: &mut impl MpdClient, name: &str) -> Result<()> {
        client.load_playlist(name)?;
        self.added += 1;
        Ok(())
    }

    /// How many additions this run has made so far.
    #[must_use]
    pub fn added(&self) -> usize {
        self.added
    }

    /// Settle playback once the run is over.
    ///
    /// Runs for dismissed sessions too: whatever was queued before the
    /// dismissal still counts.
    pub fn finish(self, client: &mut impl MpdClient) -> Result<()> {
        if !self.play_on_add || self.added == 0 {
            return Ok(());
        }
        if client.is_playing()? {
            debug!("Daemon is already playing, leaving it alone");
            return Ok(());
        }
        client.start_playback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::RawRecord;

    #[derive(Default)]
    struct FakeDaemon {
        calls: Vec<String>,
        playing: bool,
    }

    impl MpdClient for FakeDaemon {
        fn all_records(&mut self) -> Result<Vec<RawRecord>> {
            Ok(Vec::new())
        }

        fn tag_values(&mut self, _tag: &str, _filters: &[(&str, &str)]) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn tracks_where(&mut self, _filters: &[(&str, &str)]) -> Result<Vec<RawRecord>> {
            Ok(Vec::new())
        }

        fn enqueue(&mut self, uri: &str) -> Result<()> {
            self.calls.push(format!("add {uri}"));
            Ok(())
        }

        fn playlist_names(&mut self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn load_playlist(&mut self, name: &str) -> Result<()> {
            self.calls.push(format!("load {name}"));
            Ok(())
        }

        fn is_playing(&mut self) -> Result<bool> {
            Ok(self.playing)
        }

        fn start_playback(&mut self) -> Result<()> {
            self.calls.push("play".to_string());
            Ok(())
        }
    }

    #[test]
    fn test_add_all_preserves_order() {
        let mut daemon = FakeDaemon::default();
        let mut driver = QueueDriver::new(false);

        driver
            .add_all(&mut daemon, ["a.flac", "b.flac", "c.flac"])
            .unwrap();

        assert_eq!(driver.added(), 3);
        assert_eq!(daemon.calls, vec!["add a.flac", "add b.flac", "add c.flac"]);
    }

    #[test]
    fn test_finish_starts_playback_after_additions() {
        let mut daemon = FakeDaemon::default();
        let mut driver = QueueDriver::new(true);

        driver.add(&mut daemon, "a.flac").unwrap();
        driver.finish(&mut daemon).unwrap();

        assert_eq!(daemon.calls, vec!["add a.flac", "play"]);
    }

    #[test]
    fn test_finish_without_additions_does_nothing() {
        let mut daemon = FakeDaemon::default();
        let driver = QueueDriver::new(true);

        driver.finish(&mut daemon).unwrap();

        assert!(daemon.calls.is_empty());
    }

    #[test]
    fn test_finish_respects_a_playing_daemon() {
        let mut daemon = FakeDaemon {
            playing: true,
            ..FakeDaemon::default()
        };
        let mut driver = QueueDriver::new(true);

        driver.add(&mut daemon, "a.flac").unwrap();
        driver.finish(&mut daemon).unwrap();

        assert_eq!(daemon.calls, vec!["add a.flac"], "must not interrupt playback");
    }

    #[test]
    fn test_finish_disabled_never_plays() {
        let mut daemon = FakeDaemon::default();
        let mut driver = QueueDriver::new(false);

        driver.add(&mut daemon, "a.flac").unwrap();
        driver.finish(&mut daemon).unwrap();

        assert_eq!(daemon.calls, vec!["add a.flac"]);
    }

    #[test]
    fn test_loading_a_playlist_counts_as_an_addition() {
        let mut daemon = FakeDaemon::default();
        let mut driver = QueueDriver::new(true);

        driver.load_playlist(&mut daemon, "road trip").unwrap();
        driver.finish(&mut daemon).unwrap();

        assert_eq!(daemon.calls, vec!["load road trip", "play"]);
    }
}
