use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::company::Company;

/// Repository trait for Company aggregate
///
/// Company names are unique; deleting a company also deletes its shifts.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn insert(&self, company: &Company) -> RepositoryResult<()>;

    /// Overwrite an existing company. Returns false if the id is unknown
    async fn update(&self, company: &Company) -> RepositoryResult<bool>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Company>>;

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Company>>;

    async fn list_all(&self) -> RepositoryResult<Vec<Company>>;

    /// Delete by id, cascading to the company's shifts
    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
}
