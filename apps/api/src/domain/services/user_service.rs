use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::{ShiftRepository, UserRepository};
use crate::domain::user::{Email, NewUser, User, UserPatch};

/// Domain service for user management.
///
/// The uniqueness pre-checks give a precise error early; the repository
/// still enforces uniqueness when the row is written.
///
/// When users and shifts share a store, [`UserService::with_shift_cascade`]
/// makes a user's shifts go with the user.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    shifts: Option<Arc<dyn ShiftRepository>>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo, shifts: None }
    }

    /// Delete a user's shifts whenever the user is deleted
    pub fn with_shift_cascade(mut self, shifts: Arc<dyn ShiftRepository>) -> Self {
        self.shifts = Some(shifts);
        self
    }

    #[instrument(
        name = "users.service.create_user",
        skip(self, candidate),
        fields(username = %candidate.username)
    )]
    pub async fn create_user(&self, candidate: NewUser) -> DomainResult<User> {
        info!("Creating new user");

        let user = User::new(candidate)?;

        if self.repo.find_by_username(user.username()).await?.is_some() {
            return Err(DomainError::conflict("username", user.username()));
        }
        if self
            .repo
            .find_by_email(user.email().as_str())
            .await?
            .is_some()
        {
            return Err(DomainError::conflict("email", user.email().as_str()));
        }

        self.repo.insert(&user).await?;

        info!(user_id = %user.id(), "Successfully created user");
        Ok(user)
    }

    #[instrument(name = "users.service.get_user_by_id", skip(self), fields(user_id = %id))]
    pub async fn get_user_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.repo.find_by_id(id).await?)
    }

    #[instrument(name = "users.service.get_user_by_username", skip(self))]
    pub async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self.repo.find_by_username(username).await?)
    }

    #[instrument(name = "users.service.list_users", skip(self))]
    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        let users = self.repo.list_all().await?;
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    #[instrument(name = "users.service.list_users_by_company", skip(self), fields(company_id = %company_id))]
    pub async fn list_users_by_company(&self, company_id: Uuid) -> DomainResult<Vec<User>> {
        Ok(self.repo.list_by_company(company_id).await?)
    }

    /// Merges `patch` into the stored user.
    ///
    /// An email already held by another user is a conflict and nothing is
    /// written.
    #[instrument(name = "users.service.update_user", skip(self, patch), fields(user_id = %id))]
    pub async fn update_user(&self, id: Uuid, patch: UserPatch) -> DomainResult<User> {
        info!("Updating user");

        let mut user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        if let Some(ref new_email) = patch.email {
            let new_email = Email::new(new_email.as_str())?;
            if let Some(owner) = self.repo.find_by_email(new_email.as_str()).await? {
                if owner.id() != id {
                    return Err(DomainError::conflict("email", new_email.as_str()));
                }
            }
        }

        user.apply_patch(patch)?;

        if !self.repo.update(&user).await? {
            return Err(DomainError::not_found("User", id));
        }

        info!("Successfully updated user");
        Ok(user)
    }

    #[instrument(name = "users.service.delete_user", skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: Uuid) -> DomainResult<()> {
        if !self.remove(id).await? {
            return Err(DomainError::not_found("User", id));
        }
        info!("Deleted user");
        Ok(())
    }

    /// Deletes every user whose `company_id` is `company_id`, with their
    /// shifts when the shift cascade is on. Returns how many users went.
    #[instrument(name = "users.service.delete_company_members", skip(self), fields(company_id = %company_id))]
    pub async fn delete_company_members(&self, company_id: Uuid) -> DomainResult<usize> {
        let mut removed = 0;
        for member in self.repo.list_by_company(company_id).await? {
            if self.remove(member.id()).await? {
                removed += 1;
            }
        }
        info!(removed, "Deleted company members");
        Ok(removed)
    }

    // Shifts go first so a failure leaves the user in place to retry.
    async fn remove(&self, id: Uuid) -> DomainResult<bool> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Ok(false);
        }
        if let Some(ref shifts) = self.shifts {
            let dropped = shifts.delete_by_user(id).await?;
            debug!(user_id = %id, dropped, "Deleted user's shifts");
        }
        Ok(self.repo.delete(id).await?)
    }
}
