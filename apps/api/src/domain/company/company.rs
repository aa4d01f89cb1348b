use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::user::value_objects::require_text;

/// Candidate company as submitted for creation
#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub legal_name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// Partial update for a company; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub legal_name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

/// Company aggregate root
///
/// A company owns its shifts: removing the company removes them too.
/// Name uniqueness is enforced by the service and the store, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
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

impl Company {
    /// Creates a new Company aggregate
    ///
    /// # Returns
    /// * `Err(DomainError::Validation)` - If the name is blank
    pub fn new(candidate: NewCompany) -> Result<Self, DomainError> {
        let name = require_text("name", candidate.name)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            legal_name: candidate.legal_name,
            description: candidate.description,
            website: candidate.website,
            phone_number: candidate.phone_number,
            address: candidate.address,
            created_at: now,
            updated_at: now,
        })
    }

    /// Merges the present fields of `patch` and re-stamps `updated_at`
    pub fn apply_patch(&mut self, patch: CompanyPatch) -> Result<(), DomainError> {
        if let Some(name) = patch.name {
            self.name = require_text("name", name)?;
        }
        if let Some(legal_name) = patch.legal_name {
            self.legal_name = Some(legal_name);
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(website) = patch.website {
            self.website = Some(website);
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = Some(phone_number);
        }
        if let Some(address) = patch.address {
            self.address = Some(address);
        }
        self.updated_at = Utc::now();

        Ok(())
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn legal_name(&self) -> Option<&str> {
        self.legal_name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a Company from persistence layer data
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        name: String,
        legal_name: Option<String>,
        description: Option<String>,
        website: Option<String>,
        phone_number: Option<String>,
        address: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            legal_name,
            description,
            website,
            phone_number,
            address,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_company_with_name_only() {
        let company = Company::new(NewCompany {
            name: "Acme".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(company.name(), "Acme");
        assert!(company.legal_name().is_none());
        assert!(company.website().is_none());
    }

    #[test]
    fn create_company_with_empty_name_fails() {
        let result = Company::new(NewCompany::default());

        assert!(result.is_err());
    }

    #[test]
    fn patch_keeps_absent_fields() {
        let mut company = Company::new(NewCompany {
            name: "Acme".to_string(),
            website: Some("https://acme.test".to_string()),
            address: Some("1 Road Runner Way".to_string()),
            ..Default::default()
        })
        .unwrap();

        company
            .apply_patch(CompanyPatch {
                description: Some("Anvils and rockets".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(company.name(), "Acme");
        assert_eq!(company.description(), Some("Anvils and rockets"));
        assert_eq!(company.website(), Some("https://acme.test"));
        assert_eq!(company.address(), Some("1 Road Runner Way"));
    }
}
