use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::UserDirectory;
use crate::domain::repositories::{CompanyRepository, ShiftRepository};
use crate::domain::shift::{NewShift, Shift, ShiftPatch};

/// Domain service for shifts.
///
/// A shift references one company, which must exist in the local store,
/// and one user, which must be accepted by the configured
/// [`UserDirectory`]. Both references are checked on create and whenever
/// an update reassigns them. The store checks the company again on write,
/// so one deleted in between is still reported as not found.
#[derive(Clone)]
pub struct ShiftService {
    shifts: Arc<dyn ShiftRepository>,
    companies: Arc<dyn CompanyRepository>,
    users: Arc<dyn UserDirectory>,
}

impl ShiftService {
    pub fn new(
        shifts: Arc<dyn ShiftRepository>,
        companies: Arc<dyn CompanyRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            shifts,
            companies,
            users,
        }
    }

    async fn ensure_company(&self, company_id: Uuid) -> DomainResult<()> {
        match self.companies.find_by_id(company_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Company", company_id)),
        }
    }

    async fn ensure_user(&self, user_id: Uuid) -> DomainResult<()> {
        if self.users.user_exists(user_id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("User", user_id))
        }
    }

    #[instrument(
        name = "shifts.service.create_shift",
        skip(self, candidate),
        fields(user_id = %candidate.user_id, company_id = %candidate.company_id)
    )]
    pub async fn create_shift(&self, candidate: NewShift) -> DomainResult<Shift> {
        info!("Creating new shift");

        self.ensure_company(candidate.company_id).await?;
        self.ensure_user(candidate.user_id).await?;

        let shift = Shift::new(candidate)?;
        self.shifts.insert(&shift).await?;

        info!(shift_id = %shift.id(), published = shift.published(), "Successfully created shift");
        Ok(shift)
    }

    #[instrument(name = "shifts.service.get_shift_by_id", skip(self), fields(shift_id = %id))]
    pub async fn get_shift_by_id(&self, id: Uuid) -> DomainResult<Option<Shift>> {
        Ok(self.shifts.find_by_id(id).await?)
    }

    #[instrument(name = "shifts.service.list_shifts", skip(self))]
    pub async fn list_shifts(&self) -> DomainResult<Vec<Shift>> {
        Ok(self.shifts.list_all().await?)
    }

    #[instrument(name = "shifts.service.get_shifts_by_user_id", skip(self), fields(user_id = %user_id))]
    pub async fn get_shifts_by_user_id(&self, user_id: Uuid) -> DomainResult<Vec<Shift>> {
        Ok(self.shifts.list_by_user(user_id).await?)
    }

    #[instrument(name = "shifts.service.get_shifts_by_company_id", skip(self), fields(company_id = %company_id))]
    pub async fn get_shifts_by_company_id(&self, company_id: Uuid) -> DomainResult<Vec<Shift>> {
        Ok(self.shifts.list_by_company(company_id).await?)
    }

    #[instrument(name = "shifts.service.get_shifts_by_user_and_company", skip(self))]
    pub async fn get_shifts_by_user_and_company(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> DomainResult<Vec<Shift>> {
        Ok(self
            .shifts
            .list_by_user_and_company(user_id, company_id)
            .await?)
    }

    /// Shifts lying entirely inside `[start, stop]`.
    ///
    /// A shift that only overlaps the bounds is not returned.
    #[instrument(name = "shifts.service.get_shifts_between", skip(self), fields(start = %start, stop = %stop))]
    pub async fn get_shifts_between(
        &self,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) -> DomainResult<Vec<Shift>> {
        let shifts = self.shifts.list_between(start, stop).await?;
        debug!("Found {} shifts in range", shifts.len());
        Ok(shifts)
    }

    #[instrument(name = "shifts.service.get_user_shifts_between", skip(self), fields(user_id = %user_id))]
    pub async fn get_user_shifts_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
    ) -> DomainResult<Vec<Shift>> {
        Ok(self.shifts.list_user_between(user_id, start, stop).await?)
    }

    #[instrument(name = "shifts.service.get_published_shifts", skip(self))]
    pub async fn get_published_shifts(&self) -> DomainResult<Vec<Shift>> {
        Ok(self.shifts.list_published().await?)
    }

    /// Merges `patch` into the stored shift.
    ///
    /// Reassigned references are resolved before anything changes; the
    /// time ordering is checked on the merged window.
    #[instrument(name = "shifts.service.update_shift", skip(self, patch), fields(shift_id = %id))]
    pub async fn update_shift(&self, id: Uuid, patch: ShiftPatch) -> DomainResult<Shift> {
        info!("Updating shift");

        let mut shift = self
            .shifts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Shift", id))?;

        if let Some(user_id) = patch.user_id {
            self.ensure_user(user_id).await?;
        }
        if let Some(company_id) = patch.company_id {
            self.ensure_company(company_id).await?;
        }

        let was_published = shift.published_at().is_some();
        shift.apply_patch(patch)?;
        if !was_published && shift.published_at().is_some() {
            info!("Shift published");
        }

        if !self.shifts.update(&shift).await? {
            return Err(DomainError::not_found("Shift", id));
        }

        Ok(shift)
    }

    #[instrument(name = "shifts.service.delete_shift", skip(self), fields(shift_id = %id))]
    pub async fn delete_shift(&self, id: Uuid) -> DomainResult<()> {
        if !self.shifts.delete(id).await? {
            return Err(DomainError::not_found("Shift", id));
        }
        info!("Deleted shift");
        Ok(())
    }
}
