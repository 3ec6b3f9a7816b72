use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{expiry_for, BagStatus, BloodBag, BloodBagDraft, BloodBagId, StockLevel};
use super::repository::BloodBagRepository;
use crate::blood::BloodType;
use crate::storage::RepositoryError;

/// Service owning bag intake, reservation transitions, and the per-type
/// stock summary.
pub struct InventoryService<R> {
    repository: Arc<R>,
}

static BAG_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_bag_id() -> BloodBagId {
    let id = BAG_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BloodBagId(format!("bag-{id:06}"))
}

impl<R> InventoryService<R>
where
    R: BloodBagRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn register(
        &self,
        draft: BloodBagDraft,
        today: NaiveDate,
    ) -> Result<BagView, InventoryServiceError> {
        if draft.volume_ml == 0 {
            return Err(InventoryServiceError::EmptyBag);
        }
        if draft.collected_on > today {
            return Err(InventoryServiceError::FutureCollection {
                collected_on: draft.collected_on,
            });
        }

        let bag = BloodBag {
            id: next_bag_id(),
            blood_type: draft.blood_type,
            hospital_id: draft.hospital_id,
            volume_ml: draft.volume_ml,
            collected_on: draft.collected_on,
            expiry_date: expiry_for(draft.collected_on, draft.shelf_life_days),
            status: BagStatus::Available,
            source_request: draft.source_request,
        };

        let stored = self.repository.insert(bag)?;
        Ok(BagView::project(&stored, today))
    }

    pub fn get(&self, id: &BloodBagId, today: NaiveDate) -> Result<BagView, InventoryServiceError> {
        let bag = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(BagView::project(&bag, today))
    }

    pub fn list(
        &self,
        hospital_id: Option<&str>,
        today: NaiveDate,
    ) -> Result<Vec<BagView>, InventoryServiceError> {
        let mut bags = self.repository.all()?;
        if let Some(hospital_id) = hospital_id {
            bags.retain(|bag| bag.hospital_id == hospital_id);
        }
        bags.sort_by_key(|bag| bag.expiry_date);
        Ok(bags.iter().map(|bag| BagView::project(bag, today)).collect())
    }

    /// Hold a bag for a transfusion. Only effectively available bags may
    /// be reserved; an expired bag refuses even if stored as available.
    pub fn reserve(
        &self,
        id: &BloodBagId,
        today: NaiveDate,
    ) -> Result<BagView, InventoryServiceError> {
        self.transition(id, today, BagStatus::Available, BagStatus::Reserved)
    }

    pub fn mark_used(
        &self,
        id: &BloodBagId,
        today: NaiveDate,
    ) -> Result<BagView, InventoryServiceError> {
        self.transition(id, today, BagStatus::Reserved, BagStatus::Used)
    }

    fn transition(
        &self,
        id: &BloodBagId,
        today: NaiveDate,
        expected: BagStatus,
        next: BagStatus,
    ) -> Result<BagView, InventoryServiceError> {
        let mut bag = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        let effective = bag.effective_status(today);
        if effective != expected {
            return Err(InventoryServiceError::InvalidTransition {
                id: bag.id.0.clone(),
                expected: expected.label(),
                found: effective.label(),
            });
        }

        bag.status = next;
        self.repository.update(bag.clone())?;
        Ok(BagView::project(&bag, today))
    }

    /// Availability banded per blood type, covering all eight types even
    /// when no bags of a type exist.
    pub fn stock_summary(&self, today: NaiveDate) -> Result<StockSummary, InventoryServiceError> {
        let bags = self.repository.all()?;

        let mut by_type = Vec::with_capacity(BloodType::ALL.len());
        for blood_type in BloodType::ALL {
            let mut available = 0usize;
            let mut total_volume_ml = 0u64;
            for bag in bags.iter().filter(|bag| {
                bag.blood_type == blood_type
                    && bag.effective_status(today) == BagStatus::Available
            }) {
                available += 1;
                total_volume_ml += u64::from(bag.volume_ml);
            }

            let level = StockLevel::from_count(available);
            by_type.push(TypeStock {
                blood_type,
                available,
                total_volume_ml,
                level,
                level_label: level.label(),
            });
        }

        Ok(StockSummary {
            generated_at: today,
            by_type,
        })
    }
}

/// Read model with the effective status overlaid.
#[derive(Debug, Clone, Serialize)]
pub struct BagView {
    pub id: BloodBagId,
    pub blood_type: BloodType,
    pub hospital_id: String,
    pub volume_ml: u32,
    pub collected_on: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: BagStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_request: Option<crate::donation::DonationRequestId>,
}

impl BagView {
    pub(crate) fn project(bag: &BloodBag, today: NaiveDate) -> Self {
        let status = bag.effective_status(today);
        Self {
            id: bag.id.clone(),
            blood_type: bag.blood_type,
            hospital_id: bag.hospital_id.clone(),
            volume_ml: bag.volume_ml,
            collected_on: bag.collected_on,
            expiry_date: bag.expiry_date,
            status,
            status_label: status.label(),
            source_request: bag.source_request.clone(),
        }
    }
}

/// Per-type shortage banding for dashboards.
#[derive(Debug, Clone, Serialize)]
pub struct StockSummary {
    pub generated_at: NaiveDate,
    pub by_type: Vec<TypeStock>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeStock {
    pub blood_type: BloodType,
    pub available: usize,
    pub total_volume_ml: u64,
    pub level: StockLevel,
    pub level_label: &'static str,
}

/// Error raised by the inventory service.
#[derive(Debug, thiserror::Error)]
pub enum InventoryServiceError {
    #[error("blood bag volume must be greater than zero")]
    EmptyBag,
    #[error("collection date {collected_on} is in the future")]
    FutureCollection { collected_on: NaiveDate },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("bag {id} is {found}, expected {expected}")]
    InvalidTransition {
        id: String,
        expected: &'static str,
        found: &'static str,
    },
}
