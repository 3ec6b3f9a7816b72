use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Appointment, DonationRequest, DonationRequestId, DonationRequestStatus};
use crate::storage::RepositoryError;

/// Repository record pairing the request with its hospital-side status and
/// any scheduled appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonationRequestRecord {
    pub request: DonationRequest,
    pub status: DonationRequestStatus,
    pub appointment: Option<Appointment>,
}

impl DonationRequestRecord {
    pub fn status_view(&self) -> DonationRequestView {
        DonationRequestView {
            request_id: self.request.id.clone(),
            status: self.status.label(),
            eligible: self.request.eligibility.eligible,
            score: self.request.eligibility.score,
            rationale: self.request.eligibility.rationale(),
            appointment: self.appointment.clone(),
        }
    }
}

/// Storage abstraction so the service can be exercised without a live
/// document store.
pub trait DonationRequestRepository: Send + Sync {
    fn insert(&self, record: DonationRequestRecord)
        -> Result<DonationRequestRecord, RepositoryError>;
    fn update(&self, record: DonationRequestRecord) -> Result<(), RepositoryError>;
    fn fetch(
        &self,
        id: &DonationRequestId,
    ) -> Result<Option<DonationRequestRecord>, RepositoryError>;
    fn pending(&self, limit: usize) -> Result<Vec<DonationRequestRecord>, RepositoryError>;
}

/// Outbound donor notification hooks (e-mail, push, in-app feed).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: DonorNotification) -> Result<(), NotificationError>;
}

/// Notification payload so routes and tests can assert integration
/// boundaries without a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorNotification {
    pub template: String,
    pub request_id: DonationRequestId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a request's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct DonationRequestView {
    pub request_id: DonationRequestId,
    pub status: &'static str,
    pub eligible: bool,
    pub score: i32,
    pub rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment: Option<Appointment>,
}
