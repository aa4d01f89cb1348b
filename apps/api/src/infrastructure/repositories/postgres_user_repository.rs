use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{db_error, map_write_error};
use crate::domain::repositories::{RepositoryError, RepositoryResult, UserRepository};
use crate::domain::user::{Email, User};

const USER_COLUMNS: &str =
    "id, username, email, name, phone_number, company_id, created_at, updated_at";

const UNIQUE_CONSTRAINTS: &[(&str, &str)] = &[
    ("users_username_key", "username"),
    ("users_email_key", "email"),
];

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    name: String,
    phone_number: Option<String>,
    company_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let email = Email::new(r.email)
            .map_err(|e| RepositoryError::Database(format!("Invalid email from database: {}", e)))?;
        Ok(User::from_persistence(
            r.id,
            r.username,
            email,
            r.name,
            r.phone_number,
            r.company_id,
            r.created_at,
            r.updated_at,
        ))
    }
}

fn into_users(rows: Vec<UserRow>) -> RepositoryResult<Vec<User>> {
    rows.into_iter().map(User::try_from).collect()
}

/// PostgreSQL implementation of UserRepository
///
/// Username and email uniqueness is enforced by the `users_username_key`
/// and `users_email_key` constraints.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn conflict(err: sqlx::Error, user: &User) -> RepositoryError {
        map_write_error(err, UNIQUE_CONSTRAINTS, |field| match field {
            "username" => user.username().to_string(),
            _ => user.email().to_string(),
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: &User) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, name, phone_number, company_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id())
        .bind(user.username())
        .bind(user.email().as_str())
        .bind(user.name())
        .bind(user.phone_number())
        .bind(user.company_id())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::conflict(e, user))?;

        Ok(())
    }

    async fn update(&self, user: &User) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, name = $3, phone_number = $4, company_id = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id())
        .bind(user.email().as_str())
        .bind(user.name())
        .bind(user.phone_number())
        .bind(user.company_id())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::conflict(e, user))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find user by id", e))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find user by username", e))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find user by email", e))?;

        row.map(User::try_from).transpose()
    }

    async fn list_all(&self) -> RepositoryResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY created_at, id",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list users", e))?;

        into_users(rows)
    }

    async fn list_by_company(&self, company_id: Uuid) -> RepositoryResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE company_id = $1 ORDER BY created_at, id",
            USER_COLUMNS
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find users by company", e))?;

        into_users(rows)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete user", e))?;

        Ok(result.rows_affected() > 0)
    }
}
