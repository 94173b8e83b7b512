pub mod progression;
pub mod timeline;

use crate::error::Error;
use crate::types::OrderRecord;

/// One stage in the fixed production and delivery sequence.
///
/// The catalog is closed: stages are never added or reordered at
/// runtime, and [`SEQUENCE`] defines what "progress" means.
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
    strum_macros::VariantNames,
)]
pub enum Checkpoint {
    #[serde(rename = "Cutting Completed")]
    #[strum(serialize = "Cutting Completed")]
    CuttingCompleted,
    #[serde(rename = "Sewing Started")]
    #[strum(serialize = "Sewing Started")]
    SewingStarted,
    Finishing,
    #[serde(rename = "QC Checked")]
    #[strum(serialize = "QC Checked")]
    QcChecked,
    Packed,
    Shipped,
    #[serde(rename = "Out for Delivery")]
    #[strum(serialize = "Out for Delivery")]
    OutForDelivery,
    Delivered,
}

/// The fixed checkpoint catalog in progress order.
pub const SEQUENCE: [Checkpoint; 8] = [
    Checkpoint::CuttingCompleted,
    Checkpoint::SewingStarted,
    Checkpoint::Finishing,
    Checkpoint::QcChecked,
    Checkpoint::Packed,
    Checkpoint::Shipped,
    Checkpoint::OutForDelivery,
    Checkpoint::Delivered,
];

impl Checkpoint {
    /// Zero-based position within [`SEQUENCE`].
    pub fn position(self) -> usize {
        match self {
            Self::CuttingCompleted => 0,
            Self::SewingStarted => 1,
            Self::Finishing => 2,
            Self::QcChecked => 3,
            Self::Packed => 4,
            Self::Shipped => 5,
            Self::OutForDelivery => 6,
            Self::Delivered => 7,
        }
    }

    /// The following stage, or `None` at the end of the sequence.
    pub fn next(self) -> Option<Self> {
        SEQUENCE.get(self.position() + 1).copied()
    }

    pub fn is_final(self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Parses a submitted checkpoint name against the closed catalog.
    pub fn parse(submitted: &str) -> Result<Self, Error> {
        submitted
            .parse::<Self>()
            .map_err(|_| Error::InvalidCheckpoint {
                submitted: submitted.to_string(),
            })
    }
}

/// Pre-fill values for the next tracking-update form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Suggestion {
    pub checkpoint: Checkpoint,
    pub location: String,
}

/// Suggests the next checkpoint to record for an order.
///
/// Advisory only: the progression machine accepts any catalog member,
/// in any order. With no history the suggestion is the first stage;
/// after the final stage it repeats `Delivered` with the last recorded
/// location, since there is nowhere further to advance.
pub fn next_suggested(order: &OrderRecord) -> Suggestion {
    match order.tracking_updates.last_appended() {
        None => Suggestion {
            checkpoint: Checkpoint::CuttingCompleted,
            location: String::new(),
        },
        Some(last) => match last.checkpoint.next() {
            Some(next) => Suggestion {
                checkpoint: next,
                location: String::new(),
            },
            None => Suggestion {
                checkpoint: last.checkpoint,
                location: last.location.clone(),
            },
        },
    }
}
