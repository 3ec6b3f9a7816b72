use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Campaign, CampaignDraft, CampaignId, CampaignLocation, CampaignValidationError};
use super::repository::CampaignRepository;
use super::status::{resolve_status, CampaignStatus};
use crate::blood::BloodType;
use crate::storage::RepositoryError;

/// Service owning campaign CRUD and donor capacity bookkeeping. Every view
/// it returns recomputes the status from the window, so callers never see
/// the stored status drift from real time.
pub struct CampaignService<R> {
    repository: Arc<R>,
}

static CAMPAIGN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_campaign_id() -> CampaignId {
    let id = CAMPAIGN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CampaignId(format!("cmp-{id:06}"))
}

impl<R> CampaignService<R>
where
    R: CampaignRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validate and persist a draft. The stored status is stamped from the
    /// creation instant; it is display-only and overridden on every read.
    pub fn create(
        &self,
        draft: CampaignDraft,
        now: DateTime<Utc>,
    ) -> Result<CampaignView, CampaignServiceError> {
        draft.validate()?;

        let campaign = Campaign {
            id: next_campaign_id(),
            stored_status: resolve_status(draft.start_date, draft.end_date, now),
            title: draft.title,
            description: draft.description,
            hospital_id: draft.hospital_id,
            hospital_name: draft.hospital_name,
            location: draft.location,
            target_blood_types: draft.target_blood_types,
            start_date: draft.start_date,
            end_date: draft.end_date,
            max_donors: draft.max_donors,
            current_donors: 0,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(campaign)?;
        Ok(CampaignView::project(&stored, now))
    }

    pub fn get(
        &self,
        id: &CampaignId,
        now: DateTime<Utc>,
    ) -> Result<CampaignView, CampaignServiceError> {
        let campaign = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(CampaignView::project(&campaign, now))
    }

    pub fn list(&self, now: DateTime<Utc>) -> Result<Vec<CampaignView>, CampaignServiceError> {
        let mut campaigns = self.repository.all()?;
        campaigns.sort_by_key(|campaign| campaign.start_date);
        Ok(campaigns
            .iter()
            .map(|campaign| CampaignView::project(campaign, now))
            .collect())
    }

    pub fn list_for_hospital(
        &self,
        hospital_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<CampaignView>, CampaignServiceError> {
        let mut campaigns = self.repository.for_hospital(hospital_id)?;
        campaigns.sort_by_key(|campaign| campaign.start_date);
        Ok(campaigns
            .iter()
            .map(|campaign| CampaignView::project(campaign, now))
            .collect())
    }

    /// Count a donor towards the campaign. Only campaigns that derive as
    /// active accept joins, and capacity is enforced here.
    pub fn join(
        &self,
        id: &CampaignId,
        now: DateTime<Utc>,
    ) -> Result<CampaignView, CampaignServiceError> {
        let mut campaign = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        let status = resolve_status(campaign.start_date, campaign.end_date, now);
        if status != CampaignStatus::Active {
            return Err(CampaignServiceError::NotActive {
                id: campaign.id.0.clone(),
                status: status.label(),
            });
        }
        if campaign.current_donors >= campaign.max_donors {
            return Err(CampaignServiceError::CapacityReached {
                id: campaign.id.0.clone(),
                max_donors: campaign.max_donors,
            });
        }

        campaign.current_donors += 1;
        campaign.stored_status = status;
        campaign.updated_at = now;
        self.repository.update(campaign.clone())?;

        Ok(CampaignView::project(&campaign, now))
    }

    /// Grouped overview for hospital dashboards.
    pub fn board(&self, now: DateTime<Utc>) -> Result<CampaignBoard, CampaignServiceError> {
        let mut campaigns = self.repository.all()?;
        campaigns.sort_by_key(|campaign| campaign.start_date);

        let mut board = CampaignBoard {
            generated_at: now,
            totals: BoardTotals::default(),
            active: Vec::new(),
            upcoming: Vec::new(),
            completed: Vec::new(),
        };

        for campaign in &campaigns {
            let view = CampaignView::project(campaign, now);
            match view.status {
                CampaignStatus::Active => {
                    board.totals.active += 1;
                    board.active.push(view);
                }
                CampaignStatus::Upcoming => {
                    board.totals.upcoming += 1;
                    board.upcoming.push(view);
                }
                CampaignStatus::Completed => {
                    board.totals.completed += 1;
                    board.completed.push(view);
                }
            }
        }

        Ok(board)
    }
}

/// Read model with the status recomputed from the window at `now`.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignView {
    pub id: CampaignId,
    pub title: String,
    pub description: String,
    pub hospital_id: String,
    pub hospital_name: String,
    pub location: CampaignLocation,
    pub target_blood_types: Vec<BloodType>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: CampaignStatus,
    pub status_label: &'static str,
    pub max_donors: u32,
    pub current_donors: u32,
    pub spots_remaining: u32,
}

impl CampaignView {
    pub(crate) fn project(campaign: &Campaign, now: DateTime<Utc>) -> Self {
        let status = resolve_status(campaign.start_date, campaign.end_date, now);
        Self {
            id: campaign.id.clone(),
            title: campaign.title.clone(),
            description: campaign.description.clone(),
            hospital_id: campaign.hospital_id.clone(),
            hospital_name: campaign.hospital_name.clone(),
            location: campaign.location.clone(),
            target_blood_types: campaign.target_blood_types.clone(),
            start_date: campaign.start_date,
            end_date: campaign.end_date,
            status,
            status_label: status.label(),
            max_donors: campaign.max_donors,
            current_donors: campaign.current_donors,
            spots_remaining: campaign.max_donors.saturating_sub(campaign.current_donors),
        }
    }
}

/// Campaign counts and entries grouped by derived status.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignBoard {
    pub generated_at: DateTime<Utc>,
    pub totals: BoardTotals,
    pub active: Vec<CampaignView>,
    pub upcoming: Vec<CampaignView>,
    pub completed: Vec<CampaignView>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BoardTotals {
    pub active: usize,
    pub upcoming: usize,
    pub completed: usize,
}

/// Error raised by the campaign service.
#[derive(Debug, thiserror::Error)]
pub enum CampaignServiceError {
    #[error(transparent)]
    Validation(#[from] CampaignValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("campaign {id} is {status} and not accepting donors")]
    NotActive { id: String, status: &'static str },
    #[error("campaign {id} reached its donor capacity of {max_donors}")]
    CapacityReached { id: String, max_donors: u32 },
}
