/// Error enumeration shared by every repository trait. The backing
/// document store is an external collaborator; these are the only failure
/// modes the domain layer distinguishes.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
