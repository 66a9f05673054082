use thiserror::Error;

/// A duration string that does not follow the `P#DT#H#M#S` grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("duration {input:?} does not start with the P designator")]
    MissingDesignator { input: String },

    #[error("unexpected character {found:?} in duration {input:?}")]
    UnexpectedChar { input: String, found: char },

    #[error("unit {unit:?} is out of order or repeated in duration {input:?}")]
    UnitOutOfOrder { input: String, unit: char },

    #[error("duration {input:?} ends with digits that have no unit")]
    TrailingDigits { input: String },

    #[error("duration {input:?} does not fit in 64 bits")]
    Overflow { input: String },
}

/// Failure to turn one video id into metadata.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("video {id} not found")]
    NotFound { id: String },

    #[error("request for video {id} failed: {reason}")]
    TransportFailure { id: String, reason: String },

    #[error("malformed response for video {id}: {reason}")]
    MalformedResponse { id: String, reason: String },
}

impl ResolveError {
    pub fn invalid_duration(id: &str, err: DecodeError) -> Self {
        ResolveError::MalformedResponse {
            id: id.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            ResolveError::NotFound { id }
            | ResolveError::TransportFailure { id, .. }
            | ResolveError::MalformedResponse { id, .. } => id,
        }
    }
}

/// Failure to enumerate the pages of one source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("fetching page {page} of source {source_id} failed: {reason}")]
    Fetch {
        source_id: String,
        page: usize,
        reason: String,
    },

    #[error("source {source_id} exceeded the limit of {limit} pages")]
    PageLimit { source_id: String, limit: usize },
}

impl SourceError {
    /// Stamp a fetch failure with the 1-based page number it happened on.
    pub fn at_page(self, page: usize) -> Self {
        match self {
            SourceError::Fetch {
                source_id, reason, ..
            } => SourceError::Fetch {
                source_id,
                page,
                reason,
            },
            other => other,
        }
    }
}

/// No sane schedule exists for the given input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("cannot normalize {items} videos into a window: total duration is zero")]
    ZeroTotalDuration { items: usize },

    #[error("start time overflowed while scheduling {id}")]
    Overflow { id: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("No playlists given: set {env_var} or pass them on the command line")]
    MissingPlaylists { env_var: String },
}

#[derive(Error, Debug)]
pub enum PlayloopError {
    #[error("Scheduling failed: {0}")]
    Scheduling(#[from] SchedulingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PlayloopError>;
