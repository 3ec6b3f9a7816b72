use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate};
use serde_json::Value;

use crate::blood::BloodType;
use crate::donation::domain::{
    DonationKind, DonationRequestId, DonorIdentity, EligibilityAnswers, QuestionnaireSubmission,
};
use crate::donation::eligibility::{EligibilityEvaluator, EligibilityPolicy};
use crate::donation::repository::{
    DonationRequestRecord, DonationRequestRepository, DonorNotification, NotificationError,
    NotificationPublisher,
};
use crate::donation::{donation_router, DonationService, IntakeGuard};
use crate::storage::RepositoryError;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn healthy_answers() -> EligibilityAnswers {
    EligibilityAnswers {
        age: 30,
        weight_kg: 72.0,
        last_donation: None,
        has_illness: false,
        takes_medication: false,
        has_traveled: false,
    }
}

pub(super) fn donor() -> DonorIdentity {
    DonorIdentity {
        user_id: "user-042".to_string(),
        display_name: "Deniz Kaya".to_string(),
        email: "deniz@example.com".to_string(),
    }
}

pub(super) fn submission() -> QuestionnaireSubmission {
    QuestionnaireSubmission {
        donor: donor(),
        blood_type: BloodType::OPositive,
        hospital_id: "hosp-001".to_string(),
        hospital_name: "Central City Hospital".to_string(),
        campaign_id: None,
        kind: DonationKind::Direct,
        answers: healthy_answers(),
    }
}

pub(super) fn days_ago(days: i64) -> NaiveDate {
    today() - Duration::days(days)
}

pub(super) fn evaluator() -> EligibilityEvaluator {
    EligibilityEvaluator::new(EligibilityPolicy::default())
}

pub(super) fn guard() -> IntakeGuard {
    IntakeGuard
}

pub(super) fn build_service() -> (
    Arc<DonationService<MemoryRepository, MemoryNotifications>>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = Arc::new(DonationService::new(
        repository.clone(),
        notifications.clone(),
        EligibilityPolicy::default(),
    ));
    (service, repository, notifications)
}

pub(super) fn donation_router_with_service(
    service: Arc<DonationService<MemoryRepository, MemoryNotifications>>,
) -> axum::Router {
    donation_router(service)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<DonationRequestId, DonationRequestRecord>>>,
}

impl DonationRequestRepository for MemoryRepository {
    fn insert(
        &self,
        record: DonationRequestRecord,
    ) -> Result<DonationRequestRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.request.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: DonationRequestRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.request.id.clone(), record);
        Ok(())
    }

    fn fetch(
        &self,
        id: &DonationRequestId,
    ) -> Result<Option<DonationRequestRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn pending(&self, limit: usize) -> Result<Vec<DonationRequestRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| {
                record.status == crate::donation::DonationRequestStatus::Pending
            })
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<DonorNotification>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<DonorNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, notification: DonorNotification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

pub(super) struct ConflictRepository;

impl DonationRequestRepository for ConflictRepository {
    fn insert(
        &self,
        _record: DonationRequestRecord,
    ) -> Result<DonationRequestRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: DonationRequestRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(
        &self,
        _id: &DonationRequestId,
    ) -> Result<Option<DonationRequestRecord>, RepositoryError> {
        Ok(None)
    }

    fn pending(&self, _limit: usize) -> Result<Vec<DonationRequestRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl DonationRequestRepository for UnavailableRepository {
    fn insert(
        &self,
        _record: DonationRequestRecord,
    ) -> Result<DonationRequestRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: DonationRequestRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _id: &DonationRequestId,
    ) -> Result<Option<DonationRequestRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn pending(&self, _limit: usize) -> Result<Vec<DonationRequestRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
