//! Process composition: picks the storage backend and the services a role
//! mounts, then hands them to the HTTP layer.

use std::sync::Arc;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{self, ApiServices};
use crate::config::{AppConfig, ConfigError, ServiceRegistry, ServiceRole, StorageBackend};
use crate::domain::ports::{LocalUserDirectory, TrustingUserDirectory, UserDirectory};
use crate::domain::repositories::{CompanyRepository, ShiftRepository, UserRepository};
use crate::domain::services::{CompanyService, ShiftService, UserService};
use crate::infrastructure::clients::{HttpUserDirectory, USER_SERVICE};
use crate::infrastructure::repositories::{
    InMemoryStore, PostgresCompanyRepository, PostgresShiftRepository, PostgresUserRepository,
};

/// Failures while bringing the process up
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to run migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// The three repositories over one backing store
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub companies: Arc<dyn CompanyRepository>,
    pub shifts: Arc<dyn ShiftRepository>,
}

impl Repositories {
    pub fn in_memory(store: &InMemoryStore) -> Self {
        Self {
            users: Arc::new(store.users()),
            companies: Arc::new(store.companies()),
            shifts: Arc::new(store.shifts()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            companies: Arc::new(PostgresCompanyRepository::new(pool.clone())),
            shifts: Arc::new(PostgresShiftRepository::new(pool)),
        }
    }
}

/// Opens the configured store, running migrations against PostgreSQL
pub async fn connect(config: &AppConfig) -> Result<Repositories, StartupError> {
    match config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Ok(Repositories::in_memory(&InMemoryStore::new()))
        }
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Database connected successfully");
            Ok(Repositories::postgres(pool))
        }
    }
}

/// Selects the services a role exposes.
///
/// Only the monolith cascades deletes across aggregates: a company takes
/// its users with it and a user takes their shifts. A shifts-only process
/// checks user references against the registered user-service; with none
/// registered it accepts them unchecked.
pub fn services_for_role(
    role: ServiceRole,
    repos: Repositories,
    registry: &ServiceRegistry,
) -> ApiServices {
    match role {
        ServiceRole::Monolith => {
            let directory: Arc<dyn UserDirectory> =
                Arc::new(LocalUserDirectory::new(Arc::clone(&repos.users)));
            let users =
                UserService::new(repos.users).with_shift_cascade(Arc::clone(&repos.shifts));
            let companies = CompanyService::new(Arc::clone(&repos.companies))
                .with_member_cascade(users.clone());
            ApiServices {
                users: Some(users),
                companies: Some(companies),
                shifts: Some(ShiftService::new(repos.shifts, repos.companies, directory)),
            }
        }
        ServiceRole::Users => ApiServices {
            users: Some(UserService::new(repos.users)),
            ..Default::default()
        },
        ServiceRole::Shifts => {
            let directory = remote_user_directory(registry);
            ApiServices {
                users: None,
                companies: Some(CompanyService::new(Arc::clone(&repos.companies))),
                shifts: Some(ShiftService::new(repos.shifts, repos.companies, directory)),
            }
        }
    }
}

fn remote_user_directory(registry: &ServiceRegistry) -> Arc<dyn UserDirectory> {
    match registry.resolve(USER_SERVICE) {
        Some(base) => {
            info!(%base, "Checking user references against {}", USER_SERVICE);
            Arc::new(HttpUserDirectory::new(reqwest::Client::new(), base.clone()))
        }
        None => {
            warn!("No {} registered; user references are not checked", USER_SERVICE);
            Arc::new(TrustingUserDirectory)
        }
    }
}

/// Builds the router for `config` over already-opened repositories
pub fn build_router(config: &AppConfig, repos: Repositories) -> Router {
    api::router(services_for_role(config.role, repos, &config.registry))
}
