//! Metadata resolution and the bounded pool that drives it.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{sync::Semaphore, task::JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::{
    error::ResolveError,
    types::{VideoMetadata, VideoReference},
};

/// Turns a video id into metadata. Calls must be independent and idempotent.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn resolve(&self, id: &str) -> Result<VideoMetadata, ResolveError>;
}

/// Outcome for one reference, in the same slot as its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(VideoMetadata),
    Failed(ResolveError),
    /// Never issued, or still in flight when the grace period ran out.
    Abandoned,
}

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub concurrency: usize,
    /// How long in-flight calls may keep running after cancellation.
    pub grace_period: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            concurrency: 6,
            grace_period: Duration::from_secs(5),
        }
    }
}

/// Resolve every reference with at most `config.concurrency` calls in flight.
///
/// The returned vector lines up index for index with `refs`, whatever order
/// the calls completed in. Once `cancel` fires no new call is issued; calls
/// already running get `config.grace_period` to finish and are then aborted.
pub async fn resolve_all(
    resolver: Arc<dyn MetadataResolver>,
    refs: &[VideoReference],
    config: PoolConfig,
    cancel: CancellationToken,
) -> Vec<Resolution> {
    let mut slots: Vec<Option<Result<VideoMetadata, ResolveError>>> =
        (0..refs.len()).map(|_| None).collect();
    let permits = config.concurrency.clamp(1, Semaphore::MAX_PERMITS);
    let semaphore = Arc::new(Semaphore::new(permits));
    let mut tasks = JoinSet::new();
    let mut task_slots = HashMap::with_capacity(refs.len());

    for (index, reference) in refs.iter().enumerate() {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(issued = index, total = refs.len(), "cancelled, no further lookups");
                break;
            }
            permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        let resolver = Arc::clone(&resolver);
        let id = reference.id.clone();
        let handle = tasks.spawn(async move {
            let _permit = permit;
            (index, resolver.resolve(&id).await)
        });
        task_slots.insert(handle.id(), index);
    }

    let grace_expired = async {
        cancel.cancelled().await;
        tokio::time::sleep(config.grace_period).await;
    };
    tokio::pin!(grace_expired);

    loop {
        tokio::select! {
            joined = tasks.join_next_with_id() => match joined {
                Some(Ok((_, (index, result)))) => slots[index] = Some(result),
                Some(Err(err)) => {
                    error!(error = %err, "resolver task failed");
                    if let Some(&index) = task_slots.get(&err.id()).filter(|_| err.is_panic()) {
                        slots[index] = Some(Err(ResolveError::TransportFailure {
                            id: refs[index].id.clone(),
                            reason: "resolver task panicked".to_string(),
                        }));
                    }
                }
                None => break,
            },
            _ = &mut grace_expired => {
                warn!(in_flight = tasks.len(), "grace period expired, abandoning lookups");
                tasks.abort_all();
                break;
            }
        }
    }

    slots
        .into_iter()
        .map(|slot| match slot {
            Some(Ok(meta)) => Resolution::Resolved(meta),
            Some(Err(err)) => Resolution::Failed(err),
            None => Resolution::Abandoned,
        })
        .collect()
}
