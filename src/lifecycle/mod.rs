pub mod transitions;

use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::types::{Actor, ActorRole, OrderRecord, PaymentStatus};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl OrderStatus {
    /// Every status except `pending` is terminal: no status transition
    /// leads out of it.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum StatusAction {
    Approve,
    Reject,
    Cancel,
}

/// Pure order-status state machine.
///
/// Every operation takes the current record by reference and either
/// returns a fresh record with the transition applied or an error with
/// the input left untouched. Persistence, notification, and the atomic
/// check-then-write against storage are the caller's responsibility;
/// because failures never mutate, a caller may safely re-fetch and
/// re-invoke after a conflict.
pub struct OrderStatusMachine;

impl OrderStatusMachine {
    /// Moves a pending order to `approved` and stamps `approved_at`.
    ///
    /// Expected caller role: manager or admin (see
    /// [`transitions::permitted_roles`]); the actor is recorded for
    /// audit only.
    pub fn approve(
        order: &OrderRecord,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<OrderRecord, Error> {
        Self::require_pending(order, StatusAction::Approve)?;

        let mut updated = order.clone();
        updated.status = OrderStatus::Approved;
        updated.approved_at = Some(now);
        tracing::debug!(order_id = %order.id, actor = %actor.id, "order approved");
        Ok(updated)
    }

    /// Moves a pending order to `rejected`. No timestamp side effect.
    pub fn reject(order: &OrderRecord, actor: &Actor) -> Result<OrderRecord, Error> {
        Self::require_pending(order, StatusAction::Reject)?;

        let mut updated = order.clone();
        updated.status = OrderStatus::Rejected;
        tracing::debug!(order_id = %order.id, actor = %actor.id, "order rejected");
        Ok(updated)
    }

    /// Moves a pending order to `cancelled` and stamps `cancelled_at`.
    ///
    /// Only the buyer who placed the order may cancel, and only while
    /// it is still pending; once approved, the cancel window is closed.
    pub fn cancel(
        order: &OrderRecord,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<OrderRecord, Error> {
        Self::require_pending(order, StatusAction::Cancel)?;
        if actor.role != ActorRole::Buyer || actor.id != order.buyer_id {
            return Err(Error::Forbidden {
                reason: format!("only the ordering buyer may cancel order {}", order.id),
            });
        }

        let mut updated = order.clone();
        updated.status = OrderStatus::Cancelled;
        updated.cancelled_at = Some(now);
        tracing::debug!(order_id = %order.id, actor = %actor.id, "order cancelled by buyer");
        Ok(updated)
    }

    /// Records a completed online payment on a `PayFirst` order.
    pub fn record_online_payment(order: &OrderRecord) -> Result<OrderRecord, Error> {
        if !order.requires_online_payment() {
            return Err(Error::Validation {
                reason: format!("order {} does not use online payment", order.id),
            });
        }
        if order.payment_status == PaymentStatus::Paid {
            return Err(Error::Validation {
                reason: format!("payment already recorded for order {}", order.id),
            });
        }

        let mut updated = order.clone();
        updated.payment_status = PaymentStatus::Paid;
        tracing::debug!(order_id = %order.id, "online payment recorded");
        Ok(updated)
    }

    fn require_pending(order: &OrderRecord, action: StatusAction) -> Result<(), Error> {
        if order.status == OrderStatus::Pending {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                order_id: order.id.clone(),
                attempted: action.to_string(),
                current: order.status,
            })
        }
    }
}
