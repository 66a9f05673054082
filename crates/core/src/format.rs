use crate::types::Playlist;

/// Format seconds as MM:SS, or H:MM:SS once it reaches an hour
pub fn format_timestamp(seconds: u64) -> String {
    let hours = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Format a playlist as one `[start] id (duration)` line per video
pub fn format_playlist(playlist: &Playlist) -> String {
    playlist
        .videos
        .iter()
        .map(|v| {
            format!(
                "[{}] {} ({})",
                format_timestamp(v.start_time),
                v.id,
                format_timestamp(v.duration_seconds)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScheduledVideo;

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(0), "00:00");
        assert_eq!(format_timestamp(75), "01:15");
        assert_eq!(format_timestamp(3723), "1:02:03");
        assert_eq!(format_timestamp(86_400), "24:00:00");
    }

    #[test]
    fn playlist_lines() {
        let playlist = Playlist::new(vec![
            ScheduledVideo {
                id: "a".into(),
                duration_seconds: 10,
                start_time: 0,
            },
            ScheduledVideo {
                id: "b".into(),
                duration_seconds: 3600,
                start_time: 10,
            },
        ]);
        assert_eq!(
            format_playlist(&playlist),
            "[00:00] a (00:10)\n[00:10] b (1:00:00)"
        );
    }
}
