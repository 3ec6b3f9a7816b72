use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::eligibility::EligibilityResult;
use crate::blood::BloodType;
use crate::campaign::CampaignId;

/// Identifier wrapper for persisted donation requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DonationRequestId(pub String);

/// Donor identity as supplied by the external auth collaborator. The
/// service trusts the caller to have authenticated it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorIdentity {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
}

/// Self-reported health answers collected by the questionnaire. Only
/// `last_donation` may be absent ("never donated"); every other field is
/// required at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityAnswers {
    pub age: i32,
    pub weight_kg: f32,
    pub last_donation: Option<NaiveDate>,
    pub has_illness: bool,
    pub takes_medication: bool,
    pub has_traveled: bool,
}

/// Whether the donor answered for a specific campaign or walked in directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationKind {
    Campaign,
    Direct,
}

impl DonationKind {
    pub const fn label(self) -> &'static str {
        match self {
            DonationKind::Campaign => "campaign",
            DonationKind::Direct => "direct",
        }
    }
}

/// Inbound payload tying the questionnaire answers to a donor and a target
/// hospital or campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireSubmission {
    pub donor: DonorIdentity,
    pub blood_type: BloodType,
    pub hospital_id: String,
    pub hospital_name: String,
    #[serde(default)]
    pub campaign_id: Option<CampaignId>,
    pub kind: DonationKind,
    pub answers: EligibilityAnswers,
}

/// A donation request awaiting hospital action. The eligibility result is
/// the snapshot computed at submission time; it is never recomputed on
/// read, unlike campaign status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationRequest {
    pub id: DonationRequestId,
    pub donor: DonorIdentity,
    pub blood_type: BloodType,
    pub hospital_id: String,
    pub hospital_name: String,
    pub campaign_id: Option<CampaignId>,
    pub kind: DonationKind,
    pub eligibility: EligibilityResult,
    pub submitted_on: NaiveDate,
}

/// Hospital-side lifecycle of a donation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationRequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl DonationRequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DonationRequestStatus::Pending => "pending",
            DonationRequestStatus::Approved => "approved",
            DonationRequestStatus::Rejected => "rejected",
            DonationRequestStatus::Completed => "completed",
        }
    }
}

/// Action a hospital takes on a pending request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HospitalDecision {
    Approve,
    Reject { note: String },
}

/// Collection slot attached to an approved request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
        }
    }
}
