//! Donor questionnaire intake, eligibility scoring, and donation-request
//! tracking.
//!
//! A submission passes through three stages: the intake guard rejects
//! malformed form data at the boundary, the evaluator scores the sanitized
//! answers (a pure, total function), and the service persists the request
//! with the scoring result embedded as an immutable snapshot.

pub mod domain;
pub mod eligibility;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Appointment, AppointmentStatus, DonationKind, DonationRequest, DonationRequestId,
    DonationRequestStatus, DonorIdentity, EligibilityAnswers, HospitalDecision,
    QuestionnaireSubmission,
};
pub use eligibility::{
    Deduction, DeductionWeights, EligibilityEvaluator, EligibilityPolicy, EligibilityResult,
    RiskFactor,
};
pub use intake::{IntakeError, IntakeGuard};
pub use repository::{
    DonationRequestRecord, DonationRequestRepository, DonationRequestView, DonorNotification,
    NotificationError, NotificationPublisher,
};
pub use router::donation_router;
pub use service::{DonationService, DonationServiceError};
