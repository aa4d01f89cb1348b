// Repository ports for the domain aggregates
// Implementations live in the infrastructure layer

pub mod company_repository;
pub mod shift_repository;
pub mod user_repository;

use thiserror::Error;
use uuid::Uuid;

pub use company_repository::CompanyRepository;
pub use shift_repository::ShiftRepository;
pub use user_repository::UserRepository;

/// Errors surfaced by repository implementations
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A storage-level uniqueness constraint rejected the write
    #[error("unique constraint violated on {field}: {value}")]
    Conflict { field: &'static str, value: String },

    /// A storage-level reference check rejected the write: the row points
    /// at an `entity` that no longer exists
    #[error("{entity} not found: {id}")]
    MissingReference { entity: &'static str, id: Uuid },

    #[error("{0}")]
    Database(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
