use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::ShiftWindow;
use crate::domain::errors::DomainError;

/// Candidate shift as submitted for creation
#[derive(Debug, Clone)]
pub struct NewShift {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub stop_time: DateTime<Utc>,
    pub published: Option<bool>,
}

/// Partial update for a shift; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct ShiftPatch {
    pub user_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    pub stop_time: Option<DateTime<Utc>>,
    pub published: Option<bool>,
}

/// Shift aggregate root
///
/// Holds non-owning references to one user and one company. Whether
/// those references resolve is checked by the shift service before the
/// aggregate is built or patched.
///
/// # Invariants
/// - The window start is strictly before its stop
/// - `published_at` is set the first time `published` becomes true and
///   is never cleared afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct Shift {
    id: Uuid,
    user_id: Uuid,
    company_id: Uuid,
    window: ShiftWindow,
    published: bool,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Shift {
    /// Creates a new Shift aggregate
    ///
    /// # Returns
    /// * `Err(DomainError::InvalidRange)` - If start is not before stop
    ///
    /// # Business Rules Enforced
    /// - Unpublished unless `published` is explicitly true
    /// - A shift created as published is stamped with `published_at = now`
    pub fn new(candidate: NewShift) -> Result<Self, DomainError> {
        let window = ShiftWindow::new(candidate.start_time, candidate.stop_time)?;

        let now = Utc::now();
        let mut shift = Self {
            id: Uuid::new_v4(),
            user_id: candidate.user_id,
            company_id: candidate.company_id,
            window,
            published: false,
            published_at: None,
            created_at: now,
            updated_at: now,
        };
        shift.set_published(candidate.published.unwrap_or(false), now);

        Ok(shift)
    }

    /// Merges the present fields of `patch` into the shift
    ///
    /// The time window is validated against the merged start and stop, so
    /// moving only one edge is still checked against the other. Nothing
    /// is written if validation fails.
    pub fn apply_patch(&mut self, patch: ShiftPatch) -> Result<(), DomainError> {
        let window = ShiftWindow::new(
            patch.start_time.unwrap_or(self.window.start()),
            patch.stop_time.unwrap_or(self.window.stop()),
        )?;

        let now = Utc::now();
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        if let Some(company_id) = patch.company_id {
            self.company_id = company_id;
        }
        self.window = window;
        if let Some(published) = patch.published {
            self.set_published(published, now);
        }
        self.updated_at = now;

        Ok(())
    }

    fn set_published(&mut self, published: bool, now: DateTime<Utc>) {
        self.published = published;
        if published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn company_id(&self) -> Uuid {
        self.company_id
    }

    pub fn window(&self) -> ShiftWindow {
        self.window
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.window.start()
    }

    pub fn stop_time(&self) -> DateTime<Utc> {
        self.window.stop()
    }

    pub fn published(&self) -> bool {
        self.published
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a Shift from persistence layer data
    ///
    /// Fails only if the stored window violates the ordering invariant,
    /// which the `shifts_window_check` constraint rules out.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        user_id: Uuid,
        company_id: Uuid,
        start_time: DateTime<Utc>,
        stop_time: DateTime<Utc>,
        published: bool,
        published_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            user_id,
            company_id,
            window: ShiftWindow::new(start_time, stop_time)?,
            published,
            published_at,
            created_at,
            updated_at,
        })
    }
}
