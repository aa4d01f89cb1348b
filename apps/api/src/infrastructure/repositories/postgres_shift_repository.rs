use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{db_error, map_reference_error};
use crate::domain::repositories::{RepositoryError, RepositoryResult, ShiftRepository};
use crate::domain::shift::Shift;

/// Default name PostgreSQL gives the `company_id` foreign key
const COMPANY_FK: &str = "shifts_company_id_fkey";

const SHIFT_COLUMNS: &str = "id, user_id, company_id, start_time, stop_time, published, \
                             published_at, created_at, updated_at";

#[derive(FromRow)]
struct ShiftRow {
    id: Uuid,
    user_id: Uuid,
    company_id: Uuid,
    start_time: DateTime<Utc>,
    stop_time: DateTime<Utc>,
    published: bool,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ShiftRow> for Shift {
    type Error = RepositoryError;

    fn try_from(r: ShiftRow) -> Result<Self, Self::Error> {
        let id = r.id;
        Shift::from_persistence(
            id,
            r.user_id,
            r.company_id,
            r.start_time,
            r.stop_time,
            r.published,
            r.published_at,
            r.created_at,
            r.updated_at,
        )
        .map_err(|e| {
            RepositoryError::Database(format!("Invalid shift {} in database: {}", id, e))
        })
    }
}

/// PostgreSQL implementation of ShiftRepository
///
/// `user_id` has no foreign key: it may point at a user owned by another
/// service. `company_id` references `companies` with `ON DELETE CASCADE`.
pub struct PostgresShiftRepository {
    pool: PgPool,
}

impl PostgresShiftRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn write_error(err: sqlx::Error, context: &str, shift: &Shift) -> RepositoryError {
        map_reference_error(err, context, &[(COMPANY_FK, "Company", shift.company_id())])
    }

    async fn fetch(
        &self,
        filter: &str,
        binds: ShiftFilter,
        context: &str,
    ) -> RepositoryResult<Vec<Shift>> {
        let sql = format!(
            "SELECT {} FROM shifts {} ORDER BY created_at, id",
            SHIFT_COLUMNS, filter
        );
        let mut query = sqlx::query_as::<_, ShiftRow>(&sql);
        query = match binds {
            ShiftFilter::None => query,
            ShiftFilter::Id(a) => query.bind(a),
            ShiftFilter::Ids(a, b) => query.bind(a).bind(b),
            ShiftFilter::Range(from, to) => query.bind(from).bind(to),
            ShiftFilter::IdRange(id, from, to) => query.bind(id).bind(from).bind(to),
        };

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error(context, e))?;

        rows.into_iter().map(Shift::try_from).collect()
    }
}

/// Bind values for the `WHERE` clause passed to `fetch`
enum ShiftFilter {
    None,
    Id(Uuid),
    Ids(Uuid, Uuid),
    Range(DateTime<Utc>, DateTime<Utc>),
    IdRange(Uuid, DateTime<Utc>, DateTime<Utc>),
}

#[async_trait]
impl ShiftRepository for PostgresShiftRepository {
    async fn insert(&self, shift: &Shift) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO shifts (
                id, user_id, company_id, start_time, stop_time, published,
                published_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(shift.id())
        .bind(shift.user_id())
        .bind(shift.company_id())
        .bind(shift.start_time())
        .bind(shift.stop_time())
        .bind(shift.published())
        .bind(shift.published_at())
        .bind(shift.created_at())
        .bind(shift.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::write_error(e, "Failed to insert shift", shift))?;

        Ok(())
    }

    async fn update(&self, shift: &Shift) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE shifts
            SET user_id = $2, company_id = $3, start_time = $4, stop_time = $5,
                published = $6, published_at = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(shift.id())
        .bind(shift.user_id())
        .bind(shift.company_id())
        .bind(shift.start_time())
        .bind(shift.stop_time())
        .bind(shift.published())
        .bind(shift.published_at())
        .bind(shift.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::write_error(e, "Failed to update shift", shift))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Shift>> {
        let row = sqlx::query_as::<_, ShiftRow>(&format!(
            "SELECT {} FROM shifts WHERE id = $1",
            SHIFT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find shift by id", e))?;

        row.map(Shift::try_from).transpose()
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Shift>> {
        self.fetch("", ShiftFilter::None, "Failed to list shifts").await
    }

    async fn list_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Shift>> {
        self.fetch(
            "WHERE user_id = $1",
            ShiftFilter::Id(user_id),
            "Failed to find shifts by user",
        )
        .await
    }

    async fn list_by_company(&self, company_id: Uuid) -> RepositoryResult<Vec<Shift>> {
        self.fetch(
            "WHERE company_id = $1",
            ShiftFilter::Id(company_id),
            "Failed to find shifts by company",
        )
        .await
    }

    async fn list_by_user_and_company(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> RepositoryResult<Vec<Shift>> {
        self.fetch(
            "WHERE user_id = $1 AND company_id = $2",
            ShiftFilter::Ids(user_id, company_id),
            "Failed to find shifts by user and company",
        )
        .await
    }

    async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Shift>> {
        self.fetch(
            "WHERE start_time >= $1 AND stop_time <= $2",
            ShiftFilter::Range(from, to),
            "Failed to find shifts in range",
        )
        .await
    }

    async fn list_user_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Shift>> {
        self.fetch(
            "WHERE user_id = $1 AND start_time >= $2 AND stop_time <= $3",
            ShiftFilter::IdRange(user_id, from, to),
            "Failed to find user shifts in range",
        )
        .await
    }

    async fn list_published(&self) -> RepositoryResult<Vec<Shift>> {
        self.fetch(
            "WHERE published",
            ShiftFilter::None,
            "Failed to find published shifts",
        )
        .await
    }

    async fn delete_by_user(&self, user_id: Uuid) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM shifts WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete shifts by user", e))?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM shifts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete shift", e))?;

        Ok(result.rows_affected() > 0)
    }
}
