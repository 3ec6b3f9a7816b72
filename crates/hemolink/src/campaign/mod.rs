//! Collection campaigns: CRUD, donor capacity bookkeeping, and lifecycle
//! status derived from the campaign window.
//!
//! The stored status field is authoritative only until the next read; every
//! read path recomputes it through [`status::resolve_status`] so displayed
//! state always tracks real time.

pub mod domain;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;
pub mod status;

#[cfg(test)]
mod tests;

pub use domain::{
    Campaign, CampaignDraft, CampaignId, CampaignLocation, CampaignValidationError,
};
pub use import::{CampaignImportError, CampaignSeedImporter};
pub use repository::CampaignRepository;
pub use router::campaign_router;
pub use service::{BoardTotals, CampaignBoard, CampaignService, CampaignServiceError, CampaignView};
pub use status::{resolve_status, CampaignStatus};
