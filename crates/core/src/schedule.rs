//! Start-time scheduling.
//!
//! A policy turns the ordered list of durations into per-item slot widths.
//! Start times are always the running sum of those widths, so the first item
//! starts at zero and start times never decrease. Reported durations are
//! never altered, only the spacing between items.

use std::{fmt, sync::Arc};

use crate::{
    error::SchedulingError,
    types::{Playlist, ScheduledVideo},
};

pub trait SchedulePolicy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// One spacing width per duration, in input order.
    fn slot_widths(&self, durations: &[u64]) -> Result<Vec<u64>, SchedulingError>;

    /// Fixed span the schedule repeats over, if the policy defines one.
    /// Otherwise the schedule repeats after the last slot.
    fn window(&self) -> Option<u64> {
        None
    }
}

/// Each video starts when the previous one ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cumulative;

impl SchedulePolicy for Cumulative {
    fn name(&self) -> &'static str {
        "cumulative"
    }

    fn slot_widths(&self, durations: &[u64]) -> Result<Vec<u64>, SchedulingError> {
        Ok(durations.to_vec())
    }
}

/// Spread videos proportionally across a fixed window, e.g. one day.
///
/// Widths are truncated to whole seconds, so their sum may fall short of the
/// window by up to one second per video.
#[derive(Debug, Clone, Copy)]
pub struct NormalizedWindow {
    pub target_seconds: u64,
}

impl NormalizedWindow {
    pub const ONE_DAY: u64 = 86_400;

    pub fn new(target_seconds: u64) -> Self {
        Self { target_seconds }
    }
}

impl SchedulePolicy for NormalizedWindow {
    fn name(&self) -> &'static str {
        "normalized-window"
    }

    fn slot_widths(&self, durations: &[u64]) -> Result<Vec<u64>, SchedulingError> {
        let total: u128 = durations.iter().map(|&d| u128::from(d)).sum();
        if total == 0 {
            return Err(SchedulingError::ZeroTotalDuration {
                items: durations.len(),
            });
        }

        let target = u128::from(self.target_seconds);
        // d * target / total <= target, so the narrowing below is lossless.
        Ok(durations
            .iter()
            .map(|&d| (u128::from(d) * target / total) as u64)
            .collect())
    }

    fn window(&self) -> Option<u64> {
        Some(self.target_seconds)
    }
}

/// Every video gets the same slot regardless of its length.
#[derive(Debug, Clone, Copy)]
pub struct FixedSlot {
    pub slot_seconds: u64,
}

impl SchedulePolicy for FixedSlot {
    fn name(&self) -> &'static str {
        "fixed-slot"
    }

    fn slot_widths(&self, durations: &[u64]) -> Result<Vec<u64>, SchedulingError> {
        Ok(vec![self.slot_seconds; durations.len()])
    }
}

/// Configuration-side selection of a policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScheduleMode {
    #[default]
    Cumulative,
    NormalizedWindow {
        target_seconds: u64,
    },
    FixedSlot {
        slot_seconds: u64,
    },
}

impl ScheduleMode {
    pub fn policy(self) -> Arc<dyn SchedulePolicy> {
        match self {
            ScheduleMode::Cumulative => Arc::new(Cumulative),
            ScheduleMode::NormalizedWindow { target_seconds } => {
                Arc::new(NormalizedWindow::new(target_seconds))
            }
            ScheduleMode::FixedSlot { slot_seconds } => Arc::new(FixedSlot { slot_seconds }),
        }
    }
}

/// Assign start times to `(id, duration_seconds)` pairs under `policy`.
pub fn schedule<I>(items: I, policy: &dyn SchedulePolicy) -> Result<Playlist, SchedulingError>
where
    I: IntoIterator<Item = (String, u64)>,
{
    let (ids, durations): (Vec<String>, Vec<u64>) = items.into_iter().unzip();
    let widths = policy.slot_widths(&durations)?;
    debug_assert_eq!(widths.len(), durations.len());

    let mut videos = Vec::with_capacity(ids.len());
    let mut start_time: Option<u64> = Some(0);

    for ((id, duration_seconds), width) in ids.into_iter().zip(durations).zip(widths) {
        let Some(current) = start_time else {
            return Err(SchedulingError::Overflow { id });
        };
        videos.push(ScheduledVideo {
            id,
            duration_seconds,
            start_time: current,
        });
        start_time = current.checked_add(width);
    }

    let span = policy.window().or(start_time).unwrap_or(u64::MAX);
    Ok(Playlist::new(videos).with_span(span))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(durations: &[u64]) -> Vec<(String, u64)> {
        durations
            .iter()
            .enumerate()
            .map(|(i, &d)| (format!("v{i}"), d))
            .collect()
    }

    fn starts(playlist: &Playlist) -> Vec<u64> {
        playlist.videos.iter().map(|v| v.start_time).collect()
    }

    #[test]
    fn cumulative_offsets_follow_previous_durations() {
        let playlist = schedule(items(&[10, 20, 30]), &Cumulative).unwrap();
        assert_eq!(starts(&playlist), vec![0, 10, 30]);
        assert_eq!(playlist.videos[2].duration_seconds, 30);
    }

    #[test]
    fn cumulative_degenerate_inputs() {
        assert!(schedule(items(&[]), &Cumulative).unwrap().is_empty());
        let zeros = schedule(items(&[0, 0, 0]), &Cumulative).unwrap();
        assert_eq!(starts(&zeros), vec![0, 0, 0]);
    }

    #[test]
    fn normalized_with_unit_scale_matches_cumulative() {
        let policy = NormalizedWindow::new(40);
        let playlist = schedule(items(&[10, 10, 10, 10]), &policy).unwrap();
        assert_eq!(starts(&playlist), vec![0, 10, 20, 30]);
    }

    #[test]
    fn normalized_stretches_into_the_window() {
        let policy = NormalizedWindow::new(NormalizedWindow::ONE_DAY);
        let durations = [1, 1, 1];
        let playlist = schedule(items(&durations), &policy).unwrap();
        let starts = starts(&playlist);

        assert!(starts.windows(2).all(|w| w[0] < w[1]));
        let widths = policy.slot_widths(&durations).unwrap();
        let last_end = starts[2] + widths[2];
        assert!(last_end <= NormalizedWindow::ONE_DAY);
        // reported durations are untouched
        assert!(playlist.videos.iter().all(|v| v.duration_seconds == 1));
    }

    #[test]
    fn playlist_span_follows_the_policy() {
        let cumulative = schedule(items(&[10, 20]), &Cumulative).unwrap();
        assert_eq!(cumulative.loop_length(), 30);

        let fixed = schedule(items(&[5, 500]), &FixedSlot { slot_seconds: 60 }).unwrap();
        assert_eq!(fixed.loop_length(), 120);

        let policy = NormalizedWindow::new(100);
        let normalized = schedule(items(&[7, 11, 13]), &policy).unwrap();
        assert_eq!(normalized.loop_length(), 100);
    }

    #[test]
    fn normalized_truncation_drift_is_bounded_by_item_count() {
        let policy = NormalizedWindow::new(100);
        let durations = [7, 11, 13, 17];
        let widths = policy.slot_widths(&durations).unwrap();
        let sum: u64 = widths.iter().sum();
        assert!(sum <= 100);
        assert!(100 - sum <= durations.len() as u64);
    }

    #[test]
    fn normalized_rejects_zero_total() {
        let policy = NormalizedWindow::new(3600);
        assert_eq!(
            schedule(items(&[0, 0]), &policy),
            Err(SchedulingError::ZeroTotalDuration { items: 2 })
        );
        assert_eq!(
            schedule(items(&[]), &policy),
            Err(SchedulingError::ZeroTotalDuration { items: 0 })
        );
    }

    #[test]
    fn normalized_handles_very_long_inputs_exactly() {
        let policy = NormalizedWindow::new(u64::MAX);
        let widths = policy.slot_widths(&[u64::MAX, u64::MAX]).unwrap();
        assert_eq!(widths, vec![u64::MAX / 2, u64::MAX / 2]);
    }

    #[test]
    fn fixed_slot_ignores_durations() {
        let playlist = schedule(items(&[5, 500, 50]), &FixedSlot { slot_seconds: 60 }).unwrap();
        assert_eq!(starts(&playlist), vec![0, 60, 120]);
    }

    #[test]
    fn overflowing_start_time_is_an_error() {
        let result = schedule(items(&[u64::MAX, 1, 1]), &Cumulative);
        assert_eq!(result, Err(SchedulingError::Overflow { id: "v2".into() }));
    }

    #[test]
    fn mode_builds_matching_policy() {
        assert_eq!(ScheduleMode::default().policy().name(), "cumulative");
        assert_eq!(
            ScheduleMode::NormalizedWindow { target_seconds: 10 }
                .policy()
                .name(),
            "normalized-window"
        );
    }
}
