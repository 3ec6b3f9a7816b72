use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::blood::BloodType;
use crate::donation::DonationRequestId;

/// Whole blood keeps for six weeks under standard storage.
pub const DEFAULT_SHELF_LIFE_DAYS: i64 = 42;

/// Identifier wrapper for stored blood bags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BloodBagId(pub String);

/// Stored lifecycle of a bag. `Expired` is also derived on read whenever
/// the expiry date has passed, so a stale stored value never leaks out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BagStatus {
    Available,
    Reserved,
    Used,
    Expired,
}

impl BagStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Used => "used",
            Self::Expired => "expired",
        }
    }
}

/// Shortage banding over the count of available bags of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    Critical,
    Low,
    Medium,
    High,
}

impl StockLevel {
    pub fn from_count(available: usize) -> Self {
        match available {
            0 => Self::Critical,
            1..=2 => Self::Low,
            3..=5 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Intake payload for a freshly collected bag. The expiry date is derived
/// from the collection date unless the lab overrides the shelf life.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodBagDraft {
    pub blood_type: BloodType,
    pub hospital_id: String,
    pub volume_ml: u32,
    pub collected_on: NaiveDate,
    #[serde(default)]
    pub shelf_life_days: Option<i64>,
    #[serde(default)]
    pub source_request: Option<DonationRequestId>,
}

/// A persisted bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodBag {
    pub id: BloodBagId,
    pub blood_type: BloodType,
    pub hospital_id: String,
    pub volume_ml: u32,
    pub collected_on: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: BagStatus,
    pub source_request: Option<DonationRequestId>,
}

impl BloodBag {
    /// Stored status with expiry overlaid. Used and already-expired bags
    /// keep their stored value; available and reserved bags flip to
    /// expired once the expiry date has passed.
    pub fn effective_status(&self, today: NaiveDate) -> BagStatus {
        match self.status {
            BagStatus::Available | BagStatus::Reserved if self.expiry_date < today => {
                BagStatus::Expired
            }
            status => status,
        }
    }
}

pub(crate) fn expiry_for(collected_on: NaiveDate, shelf_life_days: Option<i64>) -> NaiveDate {
    collected_on + Duration::days(shelf_life_days.unwrap_or(DEFAULT_SHELF_LIFE_DAYS))
}
