use super::domain::{Campaign, CampaignId};
use crate::storage::RepositoryError;

/// Storage abstraction over the campaign collection.
pub trait CampaignRepository: Send + Sync {
    fn insert(&self, campaign: Campaign) -> Result<Campaign, RepositoryError>;
    fn update(&self, campaign: Campaign) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CampaignId) -> Result<Option<Campaign>, RepositoryError>;
    fn for_hospital(&self, hospital_id: &str) -> Result<Vec<Campaign>, RepositoryError>;
    fn all(&self) -> Result<Vec<Campaign>, RepositoryError>;
}
