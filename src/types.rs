use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::Error;
use crate::lifecycle::OrderStatus;
use crate::tracking::Checkpoint;

/// Identity and role of the caller performing a transition.
///
/// The request layer resolves the authenticated user and passes it in
/// explicitly; the core never reads ambient auth state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Actor {
    /// Stable user id of the caller.
    pub id: String,
    /// Role granted to the caller by the identity provider.
    pub role: ActorRole,
}

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
pub enum ActorRole {
    Buyer,
    Manager,
    Admin,
}

/// How the buyer chose to pay at placement time.
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
pub enum PaymentOption {
    /// Cash on delivery; no online payment leg.
    #[serde(rename = "COD")]
    #[strum(serialize = "COD")]
    Cod,
    /// Online payment collected before production starts.
    #[serde(rename = "PayFirst")]
    #[strum(serialize = "PayFirst")]
    PayFirst,
}

impl PaymentOption {
    /// True iff this option carries an online payment leg.
    pub fn requires_online_payment(self) -> bool {
        matches!(self, Self::PayFirst)
    }
}

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
pub enum PaymentStatus {
    Pending,
    Paid,
}

/// Contact and delivery details captured when the order was placed.
///
/// A snapshot: later edits to the buyer profile are never synced back
/// into existing orders.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BuyerSnapshot {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    /// Free-text delivery notes, if the buyer left any.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Catalog data captured when the order was placed.
///
/// `unit_price` is the price at order time; later catalog changes do
/// not affect it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProductSnapshot {
    pub id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub category: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Per-product floor on order size, enforced at placement.
    pub min_order_quantity: u32,
}

/// A validated production tracking event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TrackingUpdate {
    /// Which of the fixed production checkpoints was reached.
    #[serde(rename = "status")]
    pub checkpoint: Checkpoint,
    /// Where the event happened; always non-empty.
    pub location: String,
    #[serde(default)]
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
    /// Who recorded it. Audit only; never affects validation.
    pub updated_by: String,
}

/// An untrusted tracking-update payload as submitted by the manager UI.
///
/// Everything arrives as free-form strings and is validated by
/// [`crate::tracking::progression::TrackingProgressionMachine`] before
/// it becomes a [`TrackingUpdate`].
#[derive(Debug, Clone, serde::Deserialize)]
pub struct TrackingSubmission {
    /// Claimed checkpoint name, e.g. `"Sewing Started"`.
    pub status: String,
    pub location: String,
    #[serde(default)]
    pub note: Option<String>,
    /// RFC 3339 timestamp; defaulted to the caller-supplied `now` when absent.
    #[serde(default)]
    pub updated_at: Option<String>,
    pub updated_by: String,
}

/// Append-only log of tracking events.
///
/// Past entries can never be edited or removed; the only way to change
/// a log is [`TrackingLog::append`], which leaves the original intact
/// and returns a new log.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TrackingLog(Vec<TrackingUpdate>);

impl TrackingLog {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns a new log with `update` appended after the existing entries.
    pub fn append(&self, update: TrackingUpdate) -> Self {
        let mut entries = self.0.clone();
        entries.push(update);
        Self(entries)
    }

    pub fn entries(&self) -> &[TrackingUpdate] {
        &self.0
    }

    /// The most recently appended entry, in insertion order.
    pub fn last_appended(&self) -> Option<&TrackingUpdate> {
        self.0.last()
    }

    /// The chronologically latest entry by `updated_at`.
    ///
    /// Entries are not guaranteed to be appended in checkpoint or time
    /// order. Ties break toward the later appended entry.
    pub fn latest_by_time(&self) -> Option<&TrackingUpdate> {
        self.0
            .iter()
            .enumerate()
            .max_by_key(|(i, u)| (u.updated_at, *i))
            .map(|(_, u)| u)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One order, tracked from placement through approval and production.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrderRecord {
    /// Opaque unique identifier.
    pub id: String,
    /// Human-readable order code; unique, immutable once created.
    pub tracking_id: String,
    /// User id of the buyer who placed the order. Grants the cancel right.
    pub buyer_id: String,
    pub buyer: BuyerSnapshot,
    pub product: ProductSnapshot,
    pub quantity: u32,
    /// `quantity × captured unit price`; stored at placement, never recomputed.
    pub order_price: Decimal,
    pub payment_option: PaymentOption,
    /// Only advances for [`PaymentOption::PayFirst`] orders.
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Set exactly once, by the successful approve transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    /// Set exactly once, by the successful cancel transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Non-empty only while `status == approved`.
    #[serde(default)]
    pub tracking_updates: TrackingLog,
}

impl OrderRecord {
    /// True iff this order carries an online payment leg.
    pub fn requires_online_payment(&self) -> bool {
        self.payment_option.requires_online_payment()
    }

    /// Builds a well-formed `pending` record from placement input.
    ///
    /// The placement endpoint owns persistence and notification; this
    /// only validates the quantity floor and freezes the price.
    pub fn place(draft: OrderDraft, now: DateTime<Utc>) -> Result<Self, Error> {
        if draft.quantity == 0 {
            return Err(Error::Validation {
                reason: "order quantity must be positive".to_string(),
            });
        }
        if draft.quantity < draft.product.min_order_quantity {
            return Err(Error::Validation {
                reason: format!(
                    "quantity {} is below the minimum order quantity {} for product {}",
                    draft.quantity, draft.product.min_order_quantity, draft.product.id
                ),
            });
        }

        let order_price = draft.product.unit_price * Decimal::from(draft.quantity);
        Ok(Self {
            id: draft.id,
            tracking_id: draft.tracking_id,
            buyer_id: draft.buyer_id,
            buyer: draft.buyer,
            product: draft.product,
            quantity: draft.quantity,
            order_price,
            payment_option: draft.payment_option,
            payment_status: PaymentStatus::Pending,
            status: OrderStatus::Pending,
            created_at: now,
            approved_at: None,
            cancelled_at: None,
            tracking_updates: TrackingLog::new(),
        })
    }
}

/// Placement input for [`OrderRecord::place`].
#[derive(Debug, Clone, serde::Deserialize)]
pub struct OrderDraft {
    pub id: String,
    pub tracking_id: String,
    pub buyer_id: String,
    pub buyer: BuyerSnapshot,
    pub product: ProductSnapshot,
    pub quantity: u32,
    pub payment_option: PaymentOption,
}
