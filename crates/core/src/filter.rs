//! Inclusion filter: embeddability plus a swappable quality predicate.

use std::{fmt, sync::Arc};

use crate::types::{Definition, VideoMetadata};

/// Decides whether a resolved video is good enough to air.
pub trait QualityPredicate: Send + Sync {
    fn name(&self) -> &'static str;
    fn accepts(&self, meta: &VideoMetadata) -> bool;
}

/// Placeholder used when the quality of a video cannot be judged from the
/// available metadata: every video passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl QualityPredicate for AcceptAll {
    fn name(&self) -> &'static str {
        "accept-all"
    }

    fn accepts(&self, _meta: &VideoMetadata) -> bool {
        true
    }
}

/// Only videos the resolver reports as high definition. Unknown quality fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireHd;

impl QualityPredicate for RequireHd {
    fn name(&self) -> &'static str {
        "hd"
    }

    fn accepts(&self, meta: &VideoMetadata) -> bool {
        meta.definition == Some(Definition::Hd)
    }
}

/// Configuration-side selection of a quality predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QualityPolicy {
    #[default]
    AcceptAll,
    RequireHd,
}

impl QualityPolicy {
    pub fn predicate(self) -> Arc<dyn QualityPredicate> {
        match self {
            QualityPolicy::AcceptAll => Arc::new(AcceptAll),
            QualityPolicy::RequireHd => Arc::new(RequireHd),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Exclusion {
    #[error("not embeddable")]
    NotEmbeddable,

    #[error("rejected by quality policy {policy}")]
    Quality { policy: &'static str },
}

#[derive(Clone)]
pub struct InclusionFilter {
    quality: Arc<dyn QualityPredicate>,
}

impl InclusionFilter {
    pub fn new(quality: Arc<dyn QualityPredicate>) -> Self {
        Self { quality }
    }

    pub fn accept_all() -> Self {
        Self::new(Arc::new(AcceptAll))
    }

    pub fn quality_name(&self) -> &'static str {
        self.quality.name()
    }

    pub fn check(&self, meta: &VideoMetadata) -> Result<(), Exclusion> {
        if !meta.embeddable {
            return Err(Exclusion::NotEmbeddable);
        }
        if !self.quality.accepts(meta) {
            return Err(Exclusion::Quality {
                policy: self.quality.name(),
            });
        }
        Ok(())
    }

    pub fn include(&self, meta: &VideoMetadata) -> bool {
        self.check(meta).is_ok()
    }
}

impl Default for InclusionFilter {
    fn default() -> Self {
        Self::accept_all()
    }
}

impl fmt::Debug for InclusionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InclusionFilter")
            .field("quality", &self.quality_name())
            .finish()
    }
}
