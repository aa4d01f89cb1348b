use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::user::User;

/// Repository trait for User aggregate
///
/// `insert` and `update` must reject duplicate usernames and emails
/// atomically with the write, reporting them as
/// [`RepositoryError::Conflict`](super::RepositoryError::Conflict).
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn insert(&self, user: &User) -> RepositoryResult<()>;

    /// Overwrite an existing user. Returns false if the id is unknown
    async fn update(&self, user: &User) -> RepositoryResult<bool>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    /// All users in insertion order
    async fn list_all(&self) -> RepositoryResult<Vec<User>>;

    /// All users referencing a company
    async fn list_by_company(&self, company_id: Uuid) -> RepositoryResult<Vec<User>>;

    /// Delete by id. Returns true if a row was deleted
    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
}
