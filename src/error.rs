use crate::lifecycle::OrderStatus;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid transition: cannot {attempted} order {order_id} while {current}")]
    InvalidTransition {
        order_id: String,
        attempted: String,
        current: OrderStatus,
    },

    #[error("order {order_id} is {current}: tracking updates require an approved order")]
    InvalidOrderState {
        order_id: String,
        current: OrderStatus,
    },

    #[error("unknown production checkpoint: {submitted:?}")]
    InvalidCheckpoint { submitted: String },

    #[error("validation error: {reason}")]
    Validation { reason: String },

    #[error("forbidden: {reason}")]
    Forbidden { reason: String },
}
