use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::blood::BloodType;
use crate::campaign::domain::{Campaign, CampaignDraft, CampaignId, CampaignLocation};
use crate::campaign::repository::CampaignRepository;
use crate::campaign::{campaign_router, CampaignService};
use crate::storage::RepositoryError;

pub(super) fn instant(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
        .single()
        .expect("valid instant")
}

pub(super) fn draft() -> CampaignDraft {
    CampaignDraft {
        title: "Summer Blood Drive".to_string(),
        description: "Annual drive at the central hall".to_string(),
        hospital_id: "hosp-001".to_string(),
        hospital_name: "Central City Hospital".to_string(),
        location: CampaignLocation {
            address: "12 Harbor Street".to_string(),
            latitude: 41.015,
            longitude: 28.979,
        },
        target_blood_types: vec![BloodType::OPositive, BloodType::ANegative],
        start_date: instant(2025, 6, 1, 8, 0, 0),
        end_date: instant(2025, 6, 7, 18, 0, 0),
        max_donors: 3,
    }
}

/// An instant inside the window of [`draft`].
pub(super) fn mid_window() -> DateTime<Utc> {
    instant(2025, 6, 3, 12, 0, 0)
}

pub(super) fn build_service() -> (Arc<CampaignService<MemoryCampaigns>>, Arc<MemoryCampaigns>) {
    let repository = Arc::new(MemoryCampaigns::default());
    let service = Arc::new(CampaignService::new(repository.clone()));
    (service, repository)
}

pub(super) fn campaign_router_with_service(
    service: Arc<CampaignService<MemoryCampaigns>>,
) -> axum::Router {
    campaign_router(service)
}

#[derive(Default, Clone)]
pub(super) struct MemoryCampaigns {
    pub(super) records: Arc<Mutex<HashMap<CampaignId, Campaign>>>,
}

impl CampaignRepository for MemoryCampaigns {
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
        if !guard.contains_key(&campaign.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(campaign.id.clone(), campaign);
        Ok(())
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

pub(super) struct UnavailableCampaigns;

impl CampaignRepository for UnavailableCampaigns {
    fn insert(&self, _campaign: Campaign) -> Result<Campaign, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _campaign: Campaign) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CampaignId) -> Result<Option<Campaign>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_hospital(&self, _hospital_id: &str) -> Result<Vec<Campaign>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Campaign>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
