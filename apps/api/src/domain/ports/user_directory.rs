use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::repositories::UserRepository;

/// Answers whether a user id refers to an existing user.
///
/// This is the shift service's only view of users. A shift keeps the id
/// as a soft reference: it is checked when written and never again, and
/// deleting the user does not touch the shift.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user_exists(&self, id: Uuid) -> Result<bool, DomainError>;
}

/// Directory backed by the user table of the same process.
pub struct LocalUserDirectory {
    users: Arc<dyn UserRepository>,
}

impl LocalUserDirectory {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for LocalUserDirectory {
    async fn user_exists(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.users.find_by_id(id).await?.is_some())
    }
}

/// Directory that accepts every id.
///
/// Used by a standalone shift service that has no user service to ask.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrustingUserDirectory;

#[async_trait]
impl UserDirectory for TrustingUserDirectory {
    async fn user_exists(&self, id: Uuid) -> Result<bool, DomainError> {
        debug!(user_id = %id, "accepting user reference unchecked");
        Ok(true)
    }
}
