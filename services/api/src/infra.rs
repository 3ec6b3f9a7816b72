use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;

use hemolink::campaign::{Campaign, CampaignId, CampaignRepository};
use hemolink::config::EligibilityConfig;
use hemolink::donation::{
    DonationRequestId, DonationRequestRecord, DonationRequestRepository, DonationRequestStatus,
    DonorNotification, EligibilityPolicy, NotificationError, NotificationPublisher,
};
use hemolink::inventory::{BloodBag, BloodBagId, BloodBagRepository};
use hemolink::storage::RepositoryError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryDonationRepository {
    records: Arc<Mutex<HashMap<DonationRequestId, DonationRequestRecord>>>,
}

impl DonationRequestRepository for InMemoryDonationRepository {
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
        if guard.contains_key(&record.request.id) {
            guard.insert(record.request.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
            .filter(|record| record.status == DonationRequestStatus::Pending)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCampaignRepository {
    records: Arc<Mutex<HashMap<CampaignId, Campaign>>>,
}

impl CampaignRepository for InMemoryCampaignRepository {
    fn insert(&self, campaign: Campaign) -> Result<Campaign, RepositoryError> {
        let mut guard = self.records.lock().expect("campaign mutex poisoned");
        if guard.contains_key(&campaign.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(campaign.id.clone(), campaign.clone());
        Ok(campaign)
    }

    fn update(&self, campaign: Campaign) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("campaign mutex poisoned");
        if guard.contains_key(&campaign.id) {
            guard.insert(campaign.id.clone(), campaign);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &CampaignId) -> Result<Option<Campaign>, RepositoryError> {
        let guard = self.records.lock().expect("campaign mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_hospital(&self, hospital_id: &str) -> Result<Vec<Campaign>, RepositoryError> {
        let guard = self.records.lock().expect("campaign mutex poisoned");
        Ok(guard
            .values()
            .filter(|campaign| campaign.hospital_id == hospital_id)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<Campaign>, RepositoryError> {
        let guard = self.records.lock().expect("campaign mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryBloodBagRepository {
    records: Arc<Mutex<HashMap<BloodBagId, BloodBag>>>,
}

impl BloodBagRepository for InMemoryBloodBagRepository {
    fn insert(&self, bag: BloodBag) -> Result<BloodBag, RepositoryError> {
        let mut guard = self.records.lock().expect("inventory mutex poisoned");
        if guard.contains_key(&bag.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(bag.id.clone(), bag.clone());
        Ok(bag)
    }

    fn update(&self, bag: BloodBag) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("inventory mutex poisoned");
        if guard.contains_key(&bag.id) {
            guard.insert(bag.id.clone(), bag);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &BloodBagId) -> Result<Option<BloodBag>, RepositoryError> {
        let guard = self.records.lock().expect("inventory mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<BloodBag>, RepositoryError> {
        let guard = self.records.lock().expect("inventory mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<DonorNotification>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notification: DonorNotification) -> Result<(), NotificationError> {
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<DonorNotification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }
}

pub(crate) fn eligibility_policy(config: &EligibilityConfig) -> EligibilityPolicy {
    EligibilityPolicy {
        passing_score: config.passing_score,
        ..EligibilityPolicy::default()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_takes_its_threshold_from_config() {
        let config = EligibilityConfig { passing_score: 60 };
        let policy = eligibility_policy(&config);
        assert_eq!(policy.passing_score, 60);
        assert_eq!(policy.weights, EligibilityPolicy::default().weights);
    }
}
