//! Sources → dedupe → resolve + filter → schedule.

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::{
    dedupe::dedupe,
    error::SchedulingError,
    filter::InclusionFilter,
    resolver::{MetadataResolver, PoolConfig, Resolution, resolve_all},
    schedule::{SchedulePolicy, schedule},
    source::{SourceReader, collect_source},
    types::{Playlist, SkipCause, SkipReason, VideoReference},
};

pub const DEFAULT_MAX_PAGES: usize = 200;

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub pool: PoolConfig,
    /// Overall budget for the run; lookups still pending at the deadline are
    /// given the pool's grace period and then skipped.
    pub deadline: Option<Duration>,
    /// Upper bound on pages followed per source.
    pub max_pages: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            deadline: None,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// A playlist plus everything that was left out of it and why.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub playlist: Playlist,
    pub skipped: Vec<SkipReason>,
}

impl PipelineOutcome {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

pub struct PlaylistPipeline {
    reader: Arc<dyn SourceReader>,
    resolver: Arc<dyn MetadataResolver>,
    filter: InclusionFilter,
    policy: Arc<dyn SchedulePolicy>,
    options: PipelineOptions,
}

impl PlaylistPipeline {
    pub fn new(
        reader: Arc<dyn SourceReader>,
        resolver: Arc<dyn MetadataResolver>,
        policy: Arc<dyn SchedulePolicy>,
    ) -> Self {
        Self {
            reader,
            resolver,
            filter: InclusionFilter::default(),
            policy,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_filter(mut self, filter: InclusionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn run(&self, sources: &[String]) -> Result<PipelineOutcome, SchedulingError> {
        self.run_until(sources, CancellationToken::new()).await
    }

    /// Build the playlist, stopping early when `cancel` fires.
    ///
    /// Item and source failures end up in [`PipelineOutcome::skipped`]; only a
    /// schedule that cannot be computed fails the run.
    #[instrument(
        skip_all,
        fields(
            sources = sources.len(),
            policy = self.policy.name(),
            quality = self.filter.quality_name()
        )
    )]
    pub async fn run_until(
        &self,
        sources: &[String],
        cancel: CancellationToken,
    ) -> Result<PipelineOutcome, SchedulingError> {
        let cancel = cancel.child_token();
        let deadline_timer = self.options.deadline.map(|deadline| {
            let token = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                warn!(?deadline, "deadline reached, cancelling lookups");
                token.cancel();
            })
        });

        let mut skipped = Vec::new();

        let collected = self.enumerate(sources, &cancel, &mut skipped).await;
        let collected_count = collected.len();
        let unique = dedupe(collected);
        info!(
            collected = collected_count,
            unique = unique.len(),
            "collected references"
        );

        let resolutions = resolve_all(
            Arc::clone(&self.resolver),
            &unique,
            self.options.pool,
            cancel.clone(),
        )
        .await;

        if let Some(timer) = deadline_timer {
            timer.abort();
        }

        let mut accepted = Vec::with_capacity(unique.len());
        for (reference, resolution) in unique.into_iter().zip(resolutions) {
            match resolution {
                Resolution::Resolved(meta) => match self.filter.check(&meta) {
                    Ok(()) => {
                        debug!(
                            id = %reference.id,
                            duration = meta.duration_seconds,
                            "accepted video"
                        );
                        accepted.push((reference.id, meta.duration_seconds));
                    }
                    Err(exclusion) => {
                        info!(id = %reference.id, reason = %exclusion, "excluded video");
                        skipped.push(SkipReason::video(reference.id, exclusion));
                    }
                },
                Resolution::Failed(err) => {
                    warn!(id = %reference.id, error = %err, "skipping video");
                    skipped.push(SkipReason::video(reference.id, err));
                }
                Resolution::Abandoned => {
                    skipped.push(SkipReason::video(reference.id, SkipCause::Cancelled));
                }
            }
        }

        let playlist = schedule(accepted, self.policy.as_ref())?;
        info!(
            videos = playlist.len(),
            skipped = skipped.len(),
            "playlist scheduled"
        );

        Ok(PipelineOutcome { playlist, skipped })
    }

    /// Concatenate every source's references in source order. A source that
    /// fails to enumerate contributes nothing and is recorded as skipped.
    async fn enumerate(
        &self,
        sources: &[String],
        cancel: &CancellationToken,
        skipped: &mut Vec<SkipReason>,
    ) -> Vec<VideoReference> {
        let mut collected = Vec::new();

        for source_id in sources {
            if cancel.is_cancelled() {
                skipped.push(SkipReason::source(source_id.clone(), SkipCause::Cancelled));
                continue;
            }

            let result = tokio::select! {
                result = collect_source(
                    self.reader.as_ref(),
                    source_id,
                    self.options.max_pages,
                ) => Some(result),
                _ = cancel.cancelled() => None,
            };

            match result {
                Some(Ok(refs)) => {
                    debug!(source_id = %source_id, items = refs.len(), "source enumerated");
                    collected.extend(refs);
                }
                Some(Err(err)) => {
                    warn!(source_id = %source_id, error = %err, "skipping source");
                    skipped.push(SkipReason::source(source_id.clone(), err));
                }
                None => {
                    skipped.push(SkipReason::source(source_id.clone(), SkipCause::Cancelled));
                }
            }
        }

        collected
    }
}
