use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::value_objects::{require_text, Email};
use crate::domain::errors::DomainError;

/// Candidate user as submitted for creation
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub company_id: Option<Uuid>,
}

/// Partial update for a user; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub company_id: Option<Uuid>,
}

/// User aggregate root
///
/// # Invariants
/// - Username and name are never blank
/// - Email is always well-formed
/// - Username is fixed after creation
///
/// `company_id` is a soft reference: it is stored as given and never
/// resolved against the company table.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: Uuid,
    username: String,
    email: Email,
    name: String,
    phone_number: Option<String>,
    company_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User aggregate with a fresh id and timestamps
    ///
    /// # Example
    /// ```
    /// use shiftdesk_api::domain::user::{NewUser, User};
    ///
    /// let user = User::new(NewUser {
    ///     username: "ada".to_string(),
    ///     email: "ada@example.com".to_string(),
    ///     name: "Ada Lovelace".to_string(),
    ///     phone_number: None,
    ///     company_id: None,
    /// })
    /// .expect("valid user");
    ///
    /// assert_eq!(user.username(), "ada");
    /// assert_eq!(user.created_at(), user.updated_at());
    /// ```
    pub fn new(candidate: NewUser) -> Result<Self, DomainError> {
        let username = require_text("username", candidate.username)?;
        let name = require_text("name", candidate.name)?;
        let email = Email::new(candidate.email)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            username,
            email,
            name,
            phone_number: candidate.phone_number,
            company_id: candidate.company_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merges the present fields of `patch` into this user and re-stamps
    /// `updated_at`.
    ///
    /// Every field is validated before any is written, so a failed patch
    /// leaves the aggregate as it was.
    pub fn apply_patch(&mut self, patch: UserPatch) -> Result<(), DomainError> {
        let name = patch.name.map(|n| require_text("name", n)).transpose()?;
        let email = patch.email.map(Email::new).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = Some(phone_number);
        }
        if let Some(company_id) = patch.company_id {
            self.company_id = Some(company_id);
        }
        self.updated_at = Utc::now();

        Ok(())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn company_id(&self) -> Option<Uuid> {
        self.company_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a User from persistence layer data
    ///
    /// Only to be used by repository implementations.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        username: String,
        email: Email,
        name: String,
        phone_number: Option<String>,
        company_id: Option<Uuid>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            name,
            phone_number,
            company_id,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> NewUser {
        NewUser {
            username: "grace".to_string(),
            email: "grace@navy.mil".to_string(),
            name: "Grace Hopper".to_string(),
            phone_number: Some("555-0100".to_string()),
            company_id: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn create_user_with_valid_fields() {
        let input = candidate();
        let company_id = input.company_id;

        let user = User::new(input).unwrap();

        assert_eq!(user.username(), "grace");
        assert_eq!(user.email().as_str(), "grace@navy.mil");
        assert_eq!(user.name(), "Grace Hopper");
        assert_eq!(user.phone_number(), Some("555-0100"));
        assert_eq!(user.company_id(), company_id);
    }

    #[test]
    fn create_user_with_blank_username_fails() {
        let mut input = candidate();
        input.username = " ".to_string();

        assert!(matches!(
            User::new(input),
            Err(DomainError::Validation { field: "username", .. })
        ));
    }

    #[test]
    fn create_user_with_bad_email_fails() {
        let mut input = candidate();
        input.email = "grace".to_string();

        assert!(User::new(input).is_err());
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut user = User::new(candidate()).unwrap();
        let before = user.clone();

        user.apply_patch(UserPatch {
            name: Some("Rear Admiral Hopper".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(user.name(), "Rear Admiral Hopper");
        assert_eq!(user.email(), before.email());
        assert_eq!(user.phone_number(), before.phone_number());
        assert_eq!(user.company_id(), before.company_id());
        assert_eq!(user.username(), before.username());
        assert!(user.updated_at() >= before.updated_at());
    }

    #[test]
    fn failed_patch_leaves_user_unchanged() {
        let mut user = User::new(candidate()).unwrap();
        let before = user.clone();

        let result = user.apply_patch(UserPatch {
            name: Some("New Name".to_string()),
            email: Some("broken".to_string()),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(user, before);
    }
}
