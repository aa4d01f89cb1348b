use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::shift::Shift;

/// Repository trait for Shift aggregate
///
/// Range finders use contained-interval semantics: a shift matches only
/// if `start_time >= from` and `stop_time <= to`.
#[async_trait]
pub trait ShiftRepository: Send + Sync {
    /// Insert a new shift. A `company_id` with no stored company is
    /// rejected as [`RepositoryError::MissingReference`](super::RepositoryError::MissingReference).
    async fn insert(&self, shift: &Shift) -> RepositoryResult<()>;

    /// Overwrite an existing shift. Returns false if the id is unknown.
    /// The company reference is checked as on insert
    async fn update(&self, shift: &Shift) -> RepositoryResult<bool>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Shift>>;

    async fn list_all(&self) -> RepositoryResult<Vec<Shift>>;

    async fn list_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Shift>>;

    async fn list_by_company(&self, company_id: Uuid) -> RepositoryResult<Vec<Shift>>;

    async fn list_by_user_and_company(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> RepositoryResult<Vec<Shift>>;

    /// Shifts lying entirely inside `[from, to]`
    async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Shift>>;

    /// Shifts of one user lying entirely inside `[from, to]`
    async fn list_user_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Shift>>;

    async fn list_published(&self) -> RepositoryResult<Vec<Shift>>;

    /// Delete every shift assigned to a user, returning how many went
    async fn delete_by_user(&self, user_id: Uuid) -> RepositoryResult<u64>;

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
}
