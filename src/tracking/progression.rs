use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::lifecycle::OrderStatus;
use crate::tracking::Checkpoint;
use crate::types::{OrderRecord, TrackingSubmission, TrackingUpdate};

/// Validates tracking submissions and appends them to an order's log.
///
/// Like the status machine, this is a pure check-then-build step: a
/// rejected submission returns an error and the input record is left
/// untouched.
pub struct TrackingProgressionMachine;

impl TrackingProgressionMachine {
    /// Validates `submission` against `order` and appends the resulting
    /// [`TrackingUpdate`].
    ///
    /// Preconditions, checked in order:
    /// - the order is `approved` (anything else is `InvalidOrderState`,
    ///   regardless of the submission's content);
    /// - `status` names a catalog checkpoint (`InvalidCheckpoint`);
    /// - `location` is non-blank (`Validation`);
    /// - `updated_at`, when present, parses as RFC 3339 (`Validation`);
    ///   when absent it defaults to `now`.
    ///
    /// Checkpoints that regress behind the last recorded stage are
    /// accepted; the catalog order is only advisory here (see
    /// [`crate::tracking::next_suggested`]).
    pub fn append_update(
        order: &OrderRecord,
        submission: &TrackingSubmission,
        now: DateTime<Utc>,
    ) -> Result<OrderRecord, Error> {
        if order.status != OrderStatus::Approved {
            return Err(Error::InvalidOrderState {
                order_id: order.id.clone(),
                current: order.status,
            });
        }

        let checkpoint = Checkpoint::parse(&submission.status)?;

        if submission.location.trim().is_empty() {
            return Err(Error::Validation {
                reason: "tracking update location must not be empty".to_string(),
            });
        }

        let updated_at = match submission.updated_at.as_deref() {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| Error::Validation {
                    reason: format!("unparseable tracking timestamp {raw:?}: {e}"),
                })?,
            None => now,
        };

        if let Some(last) = order.tracking_updates.last_appended()
            && checkpoint.position() < last.checkpoint.position()
        {
            tracing::warn!(
                order_id = %order.id,
                submitted = %checkpoint,
                last_recorded = %last.checkpoint,
                "tracking checkpoint regresses behind the last recorded stage"
            );
        }

        let update = TrackingUpdate {
            checkpoint,
            location: submission.location.clone(),
            note: submission.note.clone(),
            updated_at,
            updated_by: submission.updated_by.clone(),
        };

        let mut updated = order.clone();
        updated.tracking_updates = order.tracking_updates.append(update);
        tracing::debug!(order_id = %order.id, checkpoint = %checkpoint, "tracking update appended");
        Ok(updated)
    }
}
