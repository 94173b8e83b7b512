#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod error;
pub mod lifecycle;
pub mod tracking;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::Error;
pub use lifecycle::transitions::{
    action_sets_timestamp, action_target, is_permitted, permitted_roles,
};
pub use lifecycle::{OrderStatus, OrderStatusMachine, StatusAction};
pub use tracking::progression::TrackingProgressionMachine;
pub use tracking::timeline::{Timeline, TimelineStep, project};
pub use tracking::{Checkpoint, SEQUENCE, Suggestion, next_suggested};
pub use types::{
    Actor, ActorRole, BuyerSnapshot, OrderDraft, OrderRecord, PaymentOption, PaymentStatus,
    ProductSnapshot, TrackingLog, TrackingSubmission, TrackingUpdate,
};
