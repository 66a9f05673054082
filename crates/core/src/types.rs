use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{ResolveError, SourceError},
    filter::Exclusion,
};

/// A bare video id as listed by a source, not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoReference {
    pub id: String,
}

impl VideoReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Definition {
    Hd,
    Sd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub id: String,
    pub duration_seconds: u64,
    pub embeddable: bool,
    /// Upstream quality class, when the resolver reports one.
    pub definition: Option<Definition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledVideo {
    pub id: String,
    #[serde(rename = "duration")]
    pub duration_seconds: u64,
    pub start_time: u64,
}

impl ScheduledVideo {
    pub fn end_time(&self) -> u64 {
        self.start_time.saturating_add(self.duration_seconds)
    }
}

/// The final schedule. Serializes as `{"videos": [...], "loop_length": n}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub videos: Vec<ScheduledVideo>,
    /// Span the schedule covers before it repeats, when it differs from the
    /// end of the last video.
    #[serde(rename = "loop_length", default, skip_serializing_if = "Option::is_none")]
    pub span: Option<u64>,
}

impl Playlist {
    pub fn new(videos: Vec<ScheduledVideo>) -> Self {
        Self { videos, span: None }
    }

    pub fn with_span(mut self, span: u64) -> Self {
        self.span = Some(span);
        self
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.videos.iter().map(|v| v.id.clone()).collect()
    }

    /// Span after which playback wraps around. Falls back to the end of the
    /// last video for documents that carry no span.
    pub fn loop_length(&self) -> u64 {
        self.span
            .unwrap_or_else(|| self.videos.last().map(ScheduledVideo::end_time).unwrap_or(0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipTarget {
    Video(String),
    Source(String),
}

impl fmt::Display for SkipTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipTarget::Video(id) => write!(f, "video {id}"),
            SkipTarget::Source(id) => write!(f, "source {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipCause {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Excluded(#[from] Exclusion),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("cancelled before it could be resolved")]
    Cancelled,
}

/// Why a video or a whole source did not reach the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipReason {
    pub target: SkipTarget,
    pub cause: SkipCause,
}

impl SkipReason {
    pub fn video(id: impl Into<String>, cause: impl Into<SkipCause>) -> Self {
        Self {
            target: SkipTarget::Video(id.into()),
            cause: cause.into(),
        }
    }

    pub fn source(id: impl Into<String>, cause: impl Into<SkipCause>) -> Self {
        Self {
            target: SkipTarget::Source(id.into()),
            cause: cause.into(),
        }
    }

    pub fn video_id(&self) -> Option<&str> {
        match &self.target {
            SkipTarget::Video(id) => Some(id),
            SkipTarget::Source(_) => None,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.target, self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_video_serializes_duration_field() {
        let video = ScheduledVideo {
            id: "abc".into(),
            duration_seconds: 42,
            start_time: 7,
        };
        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "abc", "duration": 42, "start_time": 7})
        );
    }

    #[test]
    fn loop_length_is_end_of_last_video() {
        let playlist = Playlist::new(vec![
            ScheduledVideo {
                id: "a".into(),
                duration_seconds: 10,
                start_time: 0,
            },
            ScheduledVideo {
                id: "b".into(),
                duration_seconds: 5,
                start_time: 10,
            },
        ]);
        assert_eq!(playlist.loop_length(), 15);
        assert_eq!(playlist.with_span(60).loop_length(), 60);
        assert_eq!(Playlist::default().loop_length(), 0);
    }

    #[test]
    fn span_round_trips_as_loop_length() {
        let playlist = Playlist::new(vec![ScheduledVideo {
            id: "a".into(),
            duration_seconds: 1,
            start_time: 0,
        }])
        .with_span(86_400);
        let json = serde_json::to_value(&playlist).unwrap();
        assert_eq!(json["loop_length"], 86_400);

        let legacy: Playlist =
            serde_json::from_str(r#"{"videos": [{"id": "a", "duration": 5, "start_time": 0}]}"#)
                .unwrap();
        assert_eq!(legacy.span, None);
        assert_eq!(legacy.loop_length(), 5);
    }

    #[test]
    fn skip_reason_display_names_target_and_cause() {
        let reason = SkipReason::video("x", ResolveError::NotFound { id: "x".into() });
        assert_eq!(reason.to_string(), "video x: video x not found");
        assert_eq!(reason.video_id(), Some("x"));
    }
}
