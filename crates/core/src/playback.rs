//! Where playback is right now in a playlist that loops forever.
//!
//! Every viewer computes the same position from a shared epoch, so a static
//! playlist file behaves like a live channel.

use chrono::{DateTime, TimeZone, Utc};

use crate::types::{Playlist, ScheduledVideo};

/// Default epoch the looping schedule is anchored to.
pub fn default_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackPosition<'a> {
    pub index: usize,
    pub video: &'a ScheduledVideo,
    /// Seconds into the current video.
    pub offset_seconds: u64,
    /// Seconds until the next slot begins.
    pub remaining_seconds: u64,
}

/// Whole seconds from `epoch` to `now`; zero if `now` is earlier.
pub fn seconds_since(epoch: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((now - epoch).num_seconds()).unwrap_or(0)
}

/// Locate the video playing `elapsed_seconds` after the epoch.
///
/// Returns `None` for a playlist with no length to loop over.
pub fn locate(playlist: &Playlist, elapsed_seconds: u64) -> Option<PlaybackPosition<'_>> {
    let loop_length = playlist.loop_length();
    if loop_length == 0 {
        return None;
    }

    let position = elapsed_seconds % loop_length;
    let index = playlist
        .videos
        .partition_point(|v| v.start_time <= position)
        .checked_sub(1)?;

    let video = &playlist.videos[index];
    let next_start = playlist
        .videos
        .get(index + 1)
        .map(|next| next.start_time)
        .unwrap_or(loop_length);

    Some(PlaybackPosition {
        index,
        video,
        offset_seconds: position - video.start_time,
        remaining_seconds: next_start.saturating_sub(position),
    })
}

pub fn watch_url(position: &PlaybackPosition<'_>) -> String {
    format!(
        "https://www.youtube.com/watch?v={}&t={}s",
        position.video.id, position.offset_seconds
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{NormalizedWindow, schedule};

    fn playlist(entries: &[(&str, u64, u64)]) -> Playlist {
        Playlist::new(
            entries
                .iter()
                .map(|&(id, duration_seconds, start_time)| ScheduledVideo {
                    id: id.to_string(),
                    duration_seconds,
                    start_time,
                })
                .collect(),
        )
    }

    #[test]
    fn finds_video_and_offset() {
        let list = playlist(&[("a", 10, 0), ("b", 5, 10), ("c", 20, 15)]);

        let pos = locate(&list, 12).unwrap();
        assert_eq!(pos.video.id, "b");
        assert_eq!(pos.offset_seconds, 2);
        assert_eq!(pos.remaining_seconds, 3);

        let pos = locate(&list, 0).unwrap();
        assert_eq!(pos.index, 0);
        assert_eq!(pos.remaining_seconds, 10);
    }

    #[test]
    fn boundary_belongs_to_the_next_video() {
        let list = playlist(&[("a", 10, 0), ("b", 5, 10)]);
        let pos = locate(&list, 10).unwrap();
        assert_eq!(pos.video.id, "b");
        assert_eq!(pos.offset_seconds, 0);
    }

    #[test]
    fn wraps_around_after_the_loop() {
        let list = playlist(&[("a", 10, 0), ("b", 5, 10)]);
        let pos = locate(&list, 15 * 3 + 11).unwrap();
        assert_eq!(pos.video.id, "b");
        assert_eq!(pos.offset_seconds, 1);
        assert_eq!(pos.remaining_seconds, 4);
    }

    #[test]
    fn normalized_schedule_loops_over_the_whole_window() {
        let policy = NormalizedWindow::new(NormalizedWindow::ONE_DAY);
        let items = ["a", "b", "c"].map(|id| (id.to_string(), 1));
        let list = schedule(items, &policy).unwrap();
        assert_eq!(list.loop_length(), 86_400);

        let pos = locate(&list, 60_000).unwrap();
        assert_eq!(pos.video.id, "c");
        assert_eq!(pos.offset_seconds, 2_400);
        assert_eq!(pos.remaining_seconds, 26_400);

        assert_eq!(locate(&list, 86_400).unwrap().video.id, "a");
    }

    #[test]
    fn zero_duration_entries_are_passed_over() {
        let list = playlist(&[("a", 0, 0), ("b", 0, 0), ("c", 30, 0)]);
        assert_eq!(locate(&list, 7).unwrap().video.id, "c");
    }

    #[test]
    fn empty_or_zero_length_playlist_has_no_position() {
        assert_eq!(locate(&Playlist::default(), 100), None);
        assert_eq!(locate(&playlist(&[("a", 0, 0)]), 100), None);
    }

    #[test]
    fn elapsed_time_is_clamped_at_zero() {
        let epoch = default_epoch();
        let later = epoch + chrono::Duration::seconds(90);
        assert_eq!(seconds_since(epoch, later), 90);
        assert_eq!(seconds_since(later, epoch), 0);
    }

    #[test]
    fn watch_url_carries_offset() {
        let list = playlist(&[("abc", 100, 0)]);
        let pos = locate(&list, 42).unwrap();
        assert_eq!(watch_url(&pos), "https://www.youtube.com/watch?v=abc&t=42s");
    }
}
