// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory;
pub mod postgres_company_repository;
pub mod postgres_shift_repository;
pub mod postgres_user_repository;

pub use in_memory::{
    InMemoryCompanyRepository, InMemoryShiftRepository, InMemoryStore, InMemoryUserRepository,
};
pub use postgres_company_repository::PostgresCompanyRepository;
pub use postgres_shift_repository::PostgresShiftRepository;
pub use postgres_user_repository::PostgresUserRepository;

use uuid::Uuid;

use crate::domain::repositories::RepositoryError;

/// Maps a sqlx error to a repository error.
///
/// Unique violations on the constraints named in `constraints` become
/// [`RepositoryError::Conflict`]; the closure supplies the offending value
/// for the matching field.
pub(crate) fn map_write_error(
    err: sqlx::Error,
    constraints: &[(&str, &'static str)],
    value_of: impl Fn(&'static str) -> String,
) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            let field = db_err
                .constraint()
                .and_then(|name| constraints.iter().find(|(c, _)| *c == name))
                .map(|(_, field)| *field);
            if let Some(field) = field {
                return RepositoryError::Conflict {
                    field,
                    value: value_of(field),
                };
            }
        }
    }
    RepositoryError::Database(err.to_string())
}

/// Maps a sqlx error from a write that carries foreign keys.
///
/// A foreign-key violation on one of `references` (constraint name,
/// referenced entity, referenced id) becomes
/// [`RepositoryError::MissingReference`]; anything else is reported as a
/// database error with `context`.
pub(crate) fn map_reference_error(
    err: sqlx::Error,
    context: &str,
    references: &[(&str, &'static str, Uuid)],
) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_foreign_key_violation() {
            let reference = db_err
                .constraint()
                .and_then(|name| references.iter().find(|(c, _, _)| *c == name));
            if let Some((_, entity, id)) = reference {
                return RepositoryError::MissingReference {
                    entity: *entity,
                    id: *id,
                };
            }
        }
    }
    db_error(context, err)
}

pub(crate) fn db_error(context: &str, err: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(format!("{}: {}", context, err))
}
