use super::domain::{BloodBag, BloodBagId};
use crate::storage::RepositoryError;

/// Storage abstraction over the blood bag inventory.
pub trait BloodBagRepository: Send + Sync {
    fn insert(&self, bag: BloodBag) -> Result<BloodBag, RepositoryError>;
    fn update(&self, bag: BloodBag) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &BloodBagId) -> Result<Option<BloodBag>, RepositoryError>;
    fn all(&self) -> Result<Vec<BloodBag>, RepositoryError>;
}
