use crate::lifecycle::{OrderStatus, StatusAction};
use crate::types::ActorRole;

/// Canonical mapping from [`StatusAction`] to the status it lands in.
pub fn action_target(action: StatusAction) -> OrderStatus {
    match action {
        StatusAction::Approve => OrderStatus::Approved,
        StatusAction::Reject => OrderStatus::Rejected,
        StatusAction::Cancel => OrderStatus::Cancelled,
    }
}

/// Whether an action stamps a set-once timestamp on success.
///
/// Approve stamps `approved_at`, cancel stamps `cancelled_at`; reject
/// changes status only.
pub fn action_sets_timestamp(action: StatusAction) -> bool {
    matches!(action, StatusAction::Approve | StatusAction::Cancel)
}

/// Roles expected to be permitted to invoke an action.
///
/// Advisory: authorization is enforced by the request layer before the
/// machine is called. The machine itself only checks cancel's
/// ownership rule, which is a property of the order rather than of the
/// caller's role.
pub fn permitted_roles(action: StatusAction) -> &'static [ActorRole] {
    match action {
        StatusAction::Approve | StatusAction::Reject => {
            &[ActorRole::Manager, ActorRole::Admin]
        }
        StatusAction::Cancel => &[ActorRole::Buyer],
    }
}

pub fn is_permitted(action: StatusAction, role: ActorRole) -> bool {
    permitted_roles(action).contains(&role)
}
