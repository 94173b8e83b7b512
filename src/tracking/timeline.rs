use crate::tracking::{Checkpoint, SEQUENCE};
use crate::types::{OrderRecord, TrackingUpdate};

/// One row of the buyer-facing progress view.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TimelineStep {
    pub checkpoint: Checkpoint,
    pub completed: bool,
    /// The recorded event for this stage, when one exists. A completed
    /// step with no event was skipped over and is shown as reached by
    /// system estimate; that is a supported display state, not an error.
    pub update: Option<TrackingUpdate>,
}

/// The full per-checkpoint view: always one step per catalog entry, in
/// sequence order.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Timeline {
    pub steps: Vec<TimelineStep>,
}

impl Timeline {
    pub fn completed_count(&self) -> usize {
        self.steps.iter().filter(|s| s.completed).count()
    }

    /// The furthest completed step, or `None` when nothing has been
    /// recorded yet.
    pub fn current(&self) -> Option<&TimelineStep> {
        self.steps.iter().rev().find(|s| s.completed)
    }
}

/// Projects an order's tracking history into a [`Timeline`].
///
/// Progress is decided by the chronologically latest update (by
/// `updated_at`, not insertion order): every stage up to and including
/// its checkpoint is completed, everything after is upcoming. A
/// projection, recomputed on every call and never stored back on the
/// record. An order with no updates (not yet approved, or freshly
/// approved) projects to an all-upcoming timeline.
pub fn project(order: &OrderRecord) -> Timeline {
    let last_position = order
        .tracking_updates
        .latest_by_time()
        .map(|u| u.checkpoint.position());

    let steps = SEQUENCE
        .iter()
        .map(|&checkpoint| TimelineStep {
            checkpoint,
            completed: last_position.is_some_and(|last| checkpoint.position() <= last),
            update: latest_update_for(order, checkpoint).cloned(),
        })
        .collect();

    Timeline { steps }
}

/// The chronologically latest recorded entry for one checkpoint, ties
/// breaking toward the later appended entry.
fn latest_update_for(order: &OrderRecord, checkpoint: Checkpoint) -> Option<&TrackingUpdate> {
    order
        .tracking_updates
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, u)| u.checkpoint == checkpoint)
        .max_by_key(|&(i, u)| (u.updated_at, i))
        .map(|(_, u)| u)
}
