use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::CampaignStatus;
use crate::blood::BloodType;

/// Identifier wrapper for persisted campaigns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignId(pub String);

/// Where the collection takes place. Coordinates feed the map rendering
/// collaborator; this module only carries them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignLocation {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Hospital-submitted campaign data, before ids and timestamps are
/// assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub title: String,
    pub description: String,
    pub hospital_id: String,
    pub hospital_name: String,
    pub location: CampaignLocation,
    pub target_blood_types: Vec<BloodType>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_donors: u32,
}

impl CampaignDraft {
    /// Boundary validation. The status resolver downstream assumes
    /// `end >= start` and does not re-check it.
    pub fn validate(&self) -> Result<(), CampaignValidationError> {
        if self.title.trim().is_empty() {
            return Err(CampaignValidationError::EmptyTitle);
        }
        if self.end_date < self.start_date {
            return Err(CampaignValidationError::WindowInverted {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.max_donors == 0 {
            return Err(CampaignValidationError::ZeroCapacity);
        }
        if self.target_blood_types.is_empty() {
            return Err(CampaignValidationError::NoTargetBloodTypes);
        }
        Ok(())
    }
}

/// Validation errors raised when a draft is rejected at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum CampaignValidationError {
    #[error("campaign title must not be empty")]
    EmptyTitle,
    #[error("campaign window is inverted (start {start}, end {end})")]
    WindowInverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("campaign capacity must be at least one donor")]
    ZeroCapacity,
    #[error("campaign must target at least one blood type")]
    NoTargetBloodTypes,
}

/// A persisted campaign. `stored_status` is the status as of the last
/// write; reads override it with the derived status and must not rely on
/// it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    pub title: String,
    pub description: String,
    pub hospital_id: String,
    pub hospital_name: String,
    pub location: CampaignLocation,
    pub target_blood_types: Vec<BloodType>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub max_donors: u32,
    pub current_donors: u32,
    pub stored_status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
