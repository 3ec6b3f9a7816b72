use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use super::domain::{
    Appointment, AppointmentStatus, DonationRequest, DonationRequestId, DonationRequestStatus,
    HospitalDecision, QuestionnaireSubmission,
};
use super::eligibility::{EligibilityEvaluator, EligibilityPolicy};
use super::intake::{IntakeError, IntakeGuard};
use super::repository::{
    DonationRequestRecord, DonationRequestRepository, DonationRequestView, DonorNotification,
    NotificationError, NotificationPublisher,
};
use crate::storage::RepositoryError;

/// Service composing the intake guard, evaluator, repository, and donor
/// notifications.
pub struct DonationService<R, N> {
    guard: IntakeGuard,
    repository: Arc<R>,
    notifications: Arc<N>,
    evaluator: Arc<EligibilityEvaluator>,
}

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> DonationRequestId {
    let id = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DonationRequestId(format!("req-{id:06}"))
}

impl<R, N> DonationService<R, N>
where
    R: DonationRequestRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifications: Arc<N>, policy: EligibilityPolicy) -> Self {
        Self {
            guard: IntakeGuard,
            repository,
            notifications,
            evaluator: Arc::new(EligibilityEvaluator::new(policy)),
        }
    }

    pub fn evaluator(&self) -> &EligibilityEvaluator {
        &self.evaluator
    }

    /// Submit a questionnaire: guard the form data, score it, and persist
    /// the request with the result embedded as a snapshot. Ineligible
    /// submissions are stored too, so hospitals see the audit trail either
    /// way.
    pub fn submit(
        &self,
        submission: QuestionnaireSubmission,
        today: NaiveDate,
    ) -> Result<DonationRequestRecord, DonationServiceError> {
        let answers = self.guard.sanitize(&submission, today)?;
        let eligibility = self.evaluator.evaluate(&answers, today);

        let request = DonationRequest {
            id: next_request_id(),
            donor: submission.donor,
            blood_type: submission.blood_type,
            hospital_id: submission.hospital_id,
            hospital_name: submission.hospital_name,
            campaign_id: submission.campaign_id,
            kind: submission.kind,
            eligibility,
            submitted_on: today,
        };

        let record = DonationRequestRecord {
            request,
            status: DonationRequestStatus::Pending,
            appointment: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Fetch a request and current status for API responses.
    pub fn get(
        &self,
        id: &DonationRequestId,
    ) -> Result<DonationRequestRecord, DonationServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// List requests awaiting a hospital decision, oldest first, so staff
    /// can work through the review queue.
    pub fn pending(&self, limit: usize) -> Result<Vec<DonationRequestView>, DonationServiceError> {
        let mut records = self.repository.pending(limit)?;
        records.sort_by(|left, right| {
            left.request
                .submitted_on
                .cmp(&right.request.submitted_on)
                .then_with(|| left.request.id.0.cmp(&right.request.id.0))
        });
        Ok(records
            .iter()
            .map(DonationRequestRecord::status_view)
            .collect())
    }

    /// Apply a hospital decision to a pending request.
    pub fn decide(
        &self,
        id: &DonationRequestId,
        decision: HospitalDecision,
    ) -> Result<DonationRequestRecord, DonationServiceError> {
        let mut record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        if record.status != DonationRequestStatus::Pending {
            return Err(DonationServiceError::InvalidTransition {
                id: record.request.id.0.clone(),
                expected: DonationRequestStatus::Pending.label(),
                found: record.status.label(),
            });
        }

        match decision {
            HospitalDecision::Approve => {
                record.status = DonationRequestStatus::Approved;
                self.repository.update(record.clone())?;

                let mut details = BTreeMap::new();
                details.insert("decision".to_string(), "approved".to_string());
                self.notifications.publish(DonorNotification {
                    template: "request_approved".to_string(),
                    request_id: record.request.id.clone(),
                    details,
                })?;
            }
            HospitalDecision::Reject { note } => {
                record.status = DonationRequestStatus::Rejected;
                self.repository.update(record.clone())?;

                let mut details = BTreeMap::new();
                details.insert("decision".to_string(), "rejected".to_string());
                details.insert("note".to_string(), note);
                self.notifications.publish(DonorNotification {
                    template: "request_rejected".to_string(),
                    request_id: record.request.id.clone(),
                    details,
                })?;
            }
        }

        Ok(record)
    }

    /// Attach an appointment to an approved request and notify the donor.
    pub fn schedule(
        &self,
        id: &DonationRequestId,
        appointment: Appointment,
    ) -> Result<DonationRequestRecord, DonationServiceError> {
        let mut record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        if record.status != DonationRequestStatus::Approved {
            return Err(DonationServiceError::InvalidTransition {
                id: record.request.id.0.clone(),
                expected: DonationRequestStatus::Approved.label(),
                found: record.status.label(),
            });
        }

        let mut details = BTreeMap::new();
        details.insert("date".to_string(), appointment.date.to_string());
        details.insert("time".to_string(), appointment.time.to_string());

        record.appointment = Some(appointment);
        self.repository.update(record.clone())?;

        self.notifications.publish(DonorNotification {
            template: "appointment_scheduled".to_string(),
            request_id: record.request.id.clone(),
            details,
        })?;

        Ok(record)
    }

    /// Mark an approved request as completed after the donation took place.
    pub fn complete(
        &self,
        id: &DonationRequestId,
    ) -> Result<DonationRequestRecord, DonationServiceError> {
        let mut record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        if record.status != DonationRequestStatus::Approved {
            return Err(DonationServiceError::InvalidTransition {
                id: record.request.id.0.clone(),
                expected: DonationRequestStatus::Approved.label(),
                found: record.status.label(),
            });
        }

        record.status = DonationRequestStatus::Completed;
        if let Some(appointment) = record.appointment.as_mut() {
            appointment.status = AppointmentStatus::Completed;
        }
        self.repository.update(record.clone())?;

        Ok(record)
    }
}

/// Error raised by the donation service.
#[derive(Debug, thiserror::Error)]
pub enum DonationServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error("request {id} is {found}, expected {expected}")]
    InvalidTransition {
        id: String,
        expected: &'static str,
        found: &'static str,
    },
}
