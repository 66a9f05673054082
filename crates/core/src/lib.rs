//! Playloop Core Library
//!
//! Merges playlists into one deduplicated, filtered playlist with start-time
//! offsets, ready to be played as a looping channel.

pub mod config;
pub mod dedupe;
pub mod duration;
pub mod error;
pub mod filter;
pub mod format;
pub mod output;
pub mod pipeline;
pub mod playback;
pub mod resolver;
pub mod schedule;
pub mod source;
pub mod types;
pub mod youtube;

// Re-export commonly used items at crate root
pub use dedupe::dedupe;
pub use duration::decode;
pub use error::{
    ConfigError, DecodeError, PlayloopError, ResolveError, Result, SchedulingError, SourceError,
};
pub use filter::{AcceptAll, Exclusion, InclusionFilter, QualityPolicy, QualityPredicate, RequireHd};
pub use format::{format_playlist, format_timestamp};
pub use output::{OutputShape, load_playlist, render_playlist, save_playlist};
pub use pipeline::{PipelineOptions, PipelineOutcome, PlaylistPipeline};
pub use playback::{PlaybackPosition, locate};
pub use resolver::{MetadataResolver, PoolConfig, Resolution, resolve_all};
pub use schedule::{Cumulative, FixedSlot, NormalizedWindow, ScheduleMode, SchedulePolicy, schedule};
pub use source::{Page, PageCursor, SourceReader, collect_source};
pub use types::{
    Definition, Playlist, ScheduledVideo, SkipCause, SkipReason, SkipTarget, VideoMetadata,
    VideoReference,
};
pub use youtube::YoutubeClient;
