#![expect(
    clippy::unwrap_used,
    clippy::panic,
    reason = "test code uses unwrap/panic for concise assertions"
)]

use chrono::{DateTime, Utc};
use garment_order_lifecycle::{
    Actor, ActorRole, Checkpoint, Error, OrderRecord, OrderStatus, OrderStatusMachine,
    PaymentStatus, SEQUENCE, TrackingProgressionMachine, TrackingSubmission, next_suggested,
    project,
};
use rust_decimal::Decimal;

fn load_order(filename: &str) -> OrderRecord {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = format!("{manifest_dir}/tests/fixtures/{filename}");
    let data =
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"));
    serde_json::from_str(&data).unwrap_or_else(|e| panic!("failed to parse {path}: {e}"))
}

fn load_submissions(filename: &str) -> Vec<TrackingSubmission> {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = format!("{manifest_dir}/tests/fixtures/{filename}");
    let data =
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"));
    serde_json::from_str(&data).unwrap_or_else(|e| panic!("failed to parse {path}: {e}"))
}

fn ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

fn manager() -> Actor {
    Actor {
        id: "mgr_7".to_string(),
        role: ActorRole::Manager,
    }
}

fn buyer() -> Actor {
    Actor {
        id: "usr_42".to_string(),
        role: ActorRole::Buyer,
    }
}

fn submission(status: &str, location: &str, updated_at: &str) -> TrackingSubmission {
    TrackingSubmission {
        status: status.to_string(),
        location: location.to_string(),
        note: None,
        updated_at: Some(updated_at.to_string()),
        updated_by: "mgr_7".to_string(),
    }
}

// ──────────────────── fixtures ────────────────────

#[test]
fn pending_fixture_parses_with_frozen_price() {
    let order = load_order("pending_order.json");

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.quantity, 500);
    assert_eq!(
        order.order_price,
        order.product.unit_price * Decimal::from(order.quantity)
    );
    assert!(order.requires_online_payment());
    assert_eq!(order.approved_at, None);
    assert!(order.tracking_updates.is_empty());
}

#[test]
fn approved_fixture_round_trips_through_json() {
    let order = load_order("approved_order.json");
    assert_eq!(order.tracking_updates.len(), 2);

    let serialized = serde_json::to_string(&order).unwrap();
    let reparsed: OrderRecord = serde_json::from_str(&serialized).unwrap();
    assert_eq!(reparsed, order);
}

// ──────────────────── status transitions ────────────────────

#[test]
fn approve_succeeds_once_then_fails() {
    let order = load_order("pending_order.json");
    let now = ts("2024-03-02T10:00:00Z");

    let approved = OrderStatusMachine::approve(&order, &manager(), now).unwrap();
    assert_eq!(approved.status, OrderStatus::Approved);
    assert_eq!(approved.approved_at, Some(now));

    let err = OrderStatusMachine::approve(&approved, &manager(), ts("2024-03-02T11:00:00Z"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { .. }));
    assert_eq!(approved.approved_at, Some(now));
}

#[test]
fn buyer_cancel_closes_the_order_to_tracking() {
    let order = load_order("pending_order.json");
    let now = ts("2024-03-02T08:00:00Z");

    let cancelled = OrderStatusMachine::cancel(&order, &buyer(), now).unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.cancelled_at, Some(now));

    let err = TrackingProgressionMachine::append_update(
        &cancelled,
        &submission("Cutting Completed", "Unit 3, Gazipur", "2024-03-05T11:00:00Z"),
        ts("2024-03-05T11:00:00Z"),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidOrderState {
            current: OrderStatus::Cancelled,
            ..
        }
    ));
}

#[test]
fn rejected_orders_stay_rejected() {
    let order = load_order("pending_order.json");
    let rejected = OrderStatusMachine::reject(&order, &manager()).unwrap();
    assert_eq!(rejected.status, OrderStatus::Rejected);
    assert_eq!(rejected.approved_at, None);

    let err =
        OrderStatusMachine::cancel(&rejected, &buyer(), ts("2024-03-03T08:00:00Z")).unwrap_err();
    assert!(matches!(err, Error::InvalidTransition { .. }));
}

#[test]
fn simulated_concurrent_approvals_have_one_winner() {
    let stored = load_order("pending_order.json");
    let now = ts("2024-03-02T10:00:00Z");

    // Both callers start from the same pending snapshot; the store
    // accepts the first result, the second re-checks and fails.
    let winner = OrderStatusMachine::approve(&stored, &manager(), now).unwrap();
    let loser = OrderStatusMachine::approve(&winner, &manager(), now);

    assert!(matches!(loser, Err(Error::InvalidTransition { .. })));
    assert_eq!(winner.status, OrderStatus::Approved);
    assert_eq!(winner.approved_at, Some(now));
}

// ──────────────────── payment ────────────────────

#[test]
fn pay_first_orders_record_payment_once() {
    let order = load_order("pending_order.json");

    let paid = OrderStatusMachine::record_online_payment(&order).unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Paid);
    assert!(matches!(
        OrderStatusMachine::record_online_payment(&paid),
        Err(Error::Validation { .. })
    ));

    // Payment state is independent of the approval pipeline.
    let approved =
        OrderStatusMachine::approve(&paid, &manager(), ts("2024-03-02T10:00:00Z")).unwrap();
    assert_eq!(approved.payment_status, PaymentStatus::Paid);
}

#[test]
fn cod_orders_have_no_online_payment_leg() {
    let order = load_order("approved_order.json");
    assert!(!order.requires_online_payment());
    assert!(matches!(
        OrderStatusMachine::record_online_payment(&order),
        Err(Error::Validation { .. })
    ));
}

// ──────────────────── tracking progression ────────────────────

#[test]
fn first_update_after_approval_builds_the_timeline() {
    let order = load_order("pending_order.json");
    let approved =
        OrderStatusMachine::approve(&order, &manager(), ts("2024-03-02T10:00:00Z")).unwrap();

    let updated = TrackingProgressionMachine::append_update(
        &approved,
        &submission("Sewing Started", "Dhaka", "2024-03-04T10:00:00Z"),
        ts("2024-03-04T10:05:00Z"),
    )
    .unwrap();
    assert_eq!(updated.tracking_updates.len(), 1);

    let timeline = project(&updated);
    assert_eq!(timeline.steps.len(), 8);
    assert_eq!(timeline.completed_count(), 2);
    // Stage 1 was skipped over: completed by system estimate, no event.
    assert!(timeline.steps[0].completed);
    assert!(timeline.steps[0].update.is_none());
    assert!(timeline.steps[1].completed);
    assert!(timeline.steps[1].update.is_some());
    for step in &timeline.steps[2..] {
        assert!(!step.completed);
    }
}

#[test]
fn unknown_checkpoint_is_rejected() {
    let order = load_order("approved_order.json");
    let err = TrackingProgressionMachine::append_update(
        &order,
        &submission("Pressed", "Unit 3, Gazipur", "2024-03-12T14:00:00Z"),
        ts("2024-03-12T14:00:00Z"),
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidCheckpoint { ref submitted } if submitted == "Pressed"));
}

#[test]
fn blank_location_is_rejected() {
    let order = load_order("approved_order.json");
    let err = TrackingProgressionMachine::append_update(
        &order,
        &submission("Packed", "", "2024-03-15T10:20:00Z"),
        ts("2024-03-15T10:20:00Z"),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn full_production_run_completes_the_timeline() {
    let mut order = load_order("approved_order.json");
    let now = ts("2024-03-20T00:00:00Z");

    for submission in load_submissions("tracking_submissions.json") {
        let before = order.tracking_updates.len();
        order = TrackingProgressionMachine::append_update(&order, &submission, now).unwrap();
        assert_eq!(order.tracking_updates.len(), before + 1);
    }

    let timeline = project(&order);
    assert_eq!(timeline.completed_count(), SEQUENCE.len());
    assert_eq!(
        timeline.current().unwrap().checkpoint,
        Checkpoint::Delivered
    );

    // Nothing further to advance to: the suggestion repeats the final
    // stage with the last recorded location.
    let suggestion = next_suggested(&order);
    assert_eq!(suggestion.checkpoint, Checkpoint::Delivered);
    assert_eq!(suggestion.location, "Uttara, Dhaka");
}

#[test]
fn suggestion_advances_from_the_fixture_history() {
    let order = load_order("approved_order.json");
    let suggestion = next_suggested(&order);
    assert_eq!(suggestion.checkpoint, Checkpoint::Finishing);
    assert_eq!(suggestion.location, "");
}
