use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{db_error, map_write_error};
use crate::domain::company::Company;
use crate::domain::repositories::{CompanyRepository, RepositoryError, RepositoryResult};

const COMPANY_COLUMNS: &str = "id, name, legal_name, description, website, phone_number, \
                               address, created_at, updated_at";

#[derive(FromRow)]
struct CompanyRow {
    id: Uuid,
    name: String,
    legal_name: Option<String>,
    description: Option<String>,
    website: Option<String>,
    phone_number: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CompanyRow> for Company {
    fn from(r: CompanyRow) -> Self {
        Company::from_persistence(
            r.id,
            r.name,
            r.legal_name,
            r.description,
            r.website,
            r.phone_number,
            r.address,
            r.created_at,
            r.updated_at,
        )
    }
}

/// PostgreSQL implementation of CompanyRepository
///
/// Deleting a company relies on `ON DELETE CASCADE` from `shifts.company_id`.
pub struct PostgresCompanyRepository {
    pool: PgPool,
}

impl PostgresCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn conflict(err: sqlx::Error, company: &Company) -> RepositoryError {
        map_write_error(err, &[("companies_name_key", "name")], |_| {
            company.name().to_string()
        })
    }
}

#[async_trait]
impl CompanyRepository for PostgresCompanyRepository {
    async fn insert(&self, company: &Company) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO companies (
                id, name, legal_name, description, website, phone_number,
                address, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(company.id())
        .bind(company.name())
        .bind(company.legal_name())
        .bind(company.description())
        .bind(company.website())
        .bind(company.phone_number())
        .bind(company.address())
        .bind(company.created_at())
        .bind(company.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::conflict(e, company))?;

        Ok(())
    }

    async fn update(&self, company: &Company) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE companies
            SET name = $2, legal_name = $3, description = $4, website = $5,
                phone_number = $6, address = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(company.id())
        .bind(company.name())
        .bind(company.legal_name())
        .bind(company.description())
        .bind(company.website())
        .bind(company.phone_number())
        .bind(company.address())
        .bind(company.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::conflict(e, company))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Company>> {
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT {} FROM companies WHERE id = $1",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find company by id", e))?;

        Ok(row.map(Company::from))
    }

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Company>> {
        let row = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT {} FROM companies WHERE name = $1",
            COMPANY_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find company by name", e))?;

        Ok(row.map(Company::from))
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Company>> {
        let rows = sqlx::query_as::<_, CompanyRow>(&format!(
            "SELECT {} FROM companies ORDER BY created_at, id",
            COMPANY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list companies", e))?;

        Ok(rows.into_iter().map(Company::from).collect())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete company", e))?;

        Ok(result.rows_affected() > 0)
    }
}
