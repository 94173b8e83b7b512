use wasm_bindgen::prelude::*;

use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::lifecycle::{OrderStatusMachine, StatusAction, transitions};
use crate::tracking::{self, Checkpoint, SEQUENCE};
use crate::types::{Actor, OrderRecord, TrackingSubmission};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = JSON)]
    fn parse(s: &str) -> JsValue;
}

fn to_js(value: &serde_json::Value) -> JsValue {
    match serde_json::to_string(value) {
        Ok(json_str) => parse(&json_str),
        Err(_) => JsValue::NULL,
    }
}

fn error_result(msg: &str) -> JsValue {
    let obj = serde_json::json!({"error": msg});
    to_js(&obj)
}

fn order_result(order: &OrderRecord) -> JsValue {
    match serde_json::to_value(order) {
        Ok(v) => to_js(&serde_json::json!({"order": v})),
        Err(e) => error_result(&format!("failed to serialize order: {e}")),
    }
}

fn parse_order(order_json: &str) -> Result<OrderRecord, Error> {
    serde_json::from_str(order_json).map_err(|e| Error::Validation {
        reason: format!("invalid order record: {e}"),
    })
}

fn parse_actor(actor_json: &str) -> Result<Actor, Error> {
    serde_json::from_str(actor_json).map_err(|e| Error::Validation {
        reason: format!("invalid actor: {e}"),
    })
}

fn parse_now(now_rfc3339: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(now_rfc3339)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Validation {
            reason: format!("invalid timestamp {now_rfc3339:?}: {e}"),
        })
}

fn parse_action(action: &str) -> Result<StatusAction, Error> {
    action.parse::<StatusAction>().map_err(|_| Error::Validation {
        reason: format!("unknown action {action:?}"),
    })
}

/// Returns the fixed checkpoint catalog in progress order.
#[wasm_bindgen]
pub fn checkpoint_sequence() -> JsValue {
    let result: Vec<serde_json::Value> = SEQUENCE
        .iter()
        .map(|c| {
            serde_json::json!({
                "name": c.to_string(),
                "position": c.position(),
                "final": c.is_final(),
            })
        })
        .collect();
    to_js(&serde_json::Value::Array(result))
}

/// Applies a status action (`"approve"`, `"reject"`, `"cancel"`) to an
/// order record. Returns `{order}` on success, `{error}` otherwise.
#[wasm_bindgen]
pub fn apply_status_action(
    order_json: &str,
    action: &str,
    actor_json: &str,
    now_rfc3339: &str,
) -> JsValue {
    let applied = (|| {
        let order = parse_order(order_json)?;
        let actor = parse_actor(actor_json)?;
        let now = parse_now(now_rfc3339)?;
        match parse_action(action)? {
            StatusAction::Approve => OrderStatusMachine::approve(&order, &actor, now),
            StatusAction::Reject => OrderStatusMachine::reject(&order, &actor),
            StatusAction::Cancel => OrderStatusMachine::cancel(&order, &actor, now),
        }
    })();

    match applied {
        Ok(order) => order_result(&order),
        Err(e) => error_result(&e.to_string()),
    }
}

/// Records a completed online payment on a `PayFirst` order.
#[wasm_bindgen]
pub fn record_online_payment(order_json: &str) -> JsValue {
    let applied = (|| {
        let order = parse_order(order_json)?;
        OrderStatusMachine::record_online_payment(&order)
    })();

    match applied {
        Ok(order) => order_result(&order),
        Err(e) => error_result(&e.to_string()),
    }
}

/// Validates and appends a tracking update to an approved order.
#[wasm_bindgen]
pub fn append_tracking_update(
    order_json: &str,
    submission_json: &str,
    now_rfc3339: &str,
) -> JsValue {
    let applied = (|| {
        let order = parse_order(order_json)?;
        let submission: TrackingSubmission =
            serde_json::from_str(submission_json).map_err(|e| Error::Validation {
                reason: format!("invalid tracking submission: {e}"),
            })?;
        let now = parse_now(now_rfc3339)?;
        crate::tracking::progression::TrackingProgressionMachine::append_update(
            &order,
            &submission,
            now,
        )
    })();

    match applied {
        Ok(order) => order_result(&order),
        Err(e) => error_result(&e.to_string()),
    }
}

/// Pre-fill values for the next tracking-update form.
#[wasm_bindgen]
pub fn wasm_next_suggested(order_json: &str) -> JsValue {
    match parse_order(order_json) {
        Ok(order) => {
            let suggestion = tracking::next_suggested(&order);
            to_js(&serde_json::json!({
                "checkpoint": suggestion.checkpoint.to_string(),
                "location": suggestion.location,
            }))
        }
        Err(e) => error_result(&e.to_string()),
    }
}

/// Projects an order's tracking history into the display timeline.
#[wasm_bindgen]
pub fn project_timeline(order_json: &str) -> JsValue {
    let projected = (|| {
        let order = parse_order(order_json)?;
        let timeline = tracking::timeline::project(&order);
        serde_json::to_value(&timeline).map_err(|e| Error::Validation {
            reason: format!("failed to serialize timeline: {e}"),
        })
    })();

    match projected {
        Ok(v) => to_js(&v),
        Err(e) => error_result(&e.to_string()),
    }
}

/// Check if an order status string is terminal.
#[wasm_bindgen]
pub fn is_terminal(status: &str) -> bool {
    status
        .parse::<crate::lifecycle::OrderStatus>()
        .map(crate::lifecycle::OrderStatus::is_terminal)
        .unwrap_or(false)
}

/// Roles expected to be permitted to invoke an action, or null for an
/// unknown action name.
#[wasm_bindgen]
pub fn wasm_permitted_roles(action: &str) -> JsValue {
    match parse_action(action) {
        Ok(action) => {
            let roles: Vec<serde_json::Value> = transitions::permitted_roles(action)
                .iter()
                .map(|r| serde_json::Value::String(r.to_string()))
                .collect();
            to_js(&serde_json::Value::Array(roles))
        }
        Err(_) => JsValue::NULL,
    }
}

/// Whether a valid checkpoint name may still be submitted; mirrors the
/// progression machine's catalog check for form-side validation.
#[wasm_bindgen]
pub fn is_known_checkpoint(name: &str) -> bool {
    Checkpoint::parse(name).is_ok()
}
