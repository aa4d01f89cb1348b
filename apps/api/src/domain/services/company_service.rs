use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::company::{Company, CompanyPatch, NewCompany};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::repositories::CompanyRepository;
use crate::domain::services::UserService;

/// Domain service for companies. Company names are unique.
#[derive(Clone)]
pub struct CompanyService {
    repo: Arc<dyn CompanyRepository>,
    members: Option<UserService>,
}

impl CompanyService {
    pub fn new(repo: Arc<dyn CompanyRepository>) -> Self {
        Self {
            repo,
            members: None,
        }
    }

    /// Delete a company's users through `members` whenever the company is
    /// deleted
    pub fn with_member_cascade(mut self, members: UserService) -> Self {
        self.members = Some(members);
        self
    }

    #[instrument(
        name = "companies.service.create_company",
        skip(self, candidate),
        fields(name = %candidate.name)
    )]
    pub async fn create_company(&self, candidate: NewCompany) -> DomainResult<Company> {
        info!("Creating new company");

        let company = Company::new(candidate)?;
        if self.repo.find_by_name(company.name()).await?.is_some() {
            return Err(DomainError::conflict("name", company.name()));
        }

        self.repo.insert(&company).await?;

        info!(company_id = %company.id(), "Successfully created company");
        Ok(company)
    }

    #[instrument(name = "companies.service.get_company_by_id", skip(self), fields(company_id = %id))]
    pub async fn get_company_by_id(&self, id: Uuid) -> DomainResult<Option<Company>> {
        Ok(self.repo.find_by_id(id).await?)
    }

    #[instrument(name = "companies.service.get_company_by_name", skip(self))]
    pub async fn get_company_by_name(&self, name: &str) -> DomainResult<Option<Company>> {
        Ok(self.repo.find_by_name(name).await?)
    }

    #[instrument(name = "companies.service.list_companies", skip(self))]
    pub async fn list_companies(&self) -> DomainResult<Vec<Company>> {
        Ok(self.repo.list_all().await?)
    }

    #[instrument(name = "companies.service.update_company", skip(self, patch), fields(company_id = %id))]
    pub async fn update_company(&self, id: Uuid, patch: CompanyPatch) -> DomainResult<Company> {
        info!("Updating company");

        let mut company = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Company", id))?;

        if let Some(ref new_name) = patch.name {
            if new_name != company.name() {
                if let Some(owner) = self.repo.find_by_name(new_name).await? {
                    if owner.id() != id {
                        return Err(DomainError::conflict("name", new_name.as_str()));
                    }
                }
            }
        }

        company.apply_patch(patch)?;

        if !self.repo.update(&company).await? {
            return Err(DomainError::not_found("Company", id));
        }

        info!("Successfully updated company");
        Ok(company)
    }

    /// Deletes the company and, through the store, its shifts.
    ///
    /// With the member cascade on, the company's users (and their shifts)
    /// are deleted first.
    #[instrument(name = "companies.service.delete_company", skip(self), fields(company_id = %id))]
    pub async fn delete_company(&self, id: Uuid) -> DomainResult<()> {
        if let Some(ref members) = self.members {
            if self.repo.find_by_id(id).await?.is_none() {
                return Err(DomainError::not_found("Company", id));
            }
            members.delete_company_members(id).await?;
        }

        if !self.repo.delete(id).await? {
            return Err(DomainError::not_found("Company", id));
        }
        info!("Deleted company");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{ShiftRepository, UserRepository};
    use crate::domain::shift::{NewShift, Shift};
    use crate::domain::user::{NewUser, User};
    use crate::infrastructure::repositories::InMemoryStore;
    use chrono::{TimeZone, Utc};

    fn service() -> CompanyService {
        CompanyService::new(Arc::new(InMemoryStore::new().companies()))
    }

    fn named(name: &str) -> NewCompany {
        NewCompany {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn second_company_with_same_name_conflicts() {
        let service = service();

        assert!(service.create_company(named("Acme")).await.is_ok());
        let err = service.create_company(named("Acme")).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { field: "name", .. }));
        assert_eq!(service.list_companies().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rename_to_taken_name_conflicts() {
        let service = service();
        let acme = service.create_company(named("Acme")).await.unwrap();
        service.create_company(named("Globex")).await.unwrap();

        let err = service
            .update_company(
                acme.id(),
                CompanyPatch {
                    name: Some("Globex".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        let stored = service.get_company_by_id(acme.id()).await.unwrap().unwrap();
        assert_eq!(stored.name(), "Acme");
    }

    #[tokio::test]
    async fn update_merges_patch_fields() {
        let service = service();
        let acme = service.create_company(named("Acme")).await.unwrap();

        let updated = service
            .update_company(
                acme.id(),
                CompanyPatch {
                    name: Some("Acme".to_string()),
                    legal_name: Some("Acme Corporation".to_string()),
                    phone_number: Some("555-0199".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name(), "Acme");
        assert_eq!(updated.legal_name(), Some("Acme Corporation"));
        assert_eq!(updated.phone_number(), Some("555-0199"));
        assert!(updated.description().is_none());
        assert_eq!(
            service.get_company_by_name("Acme").await.unwrap(),
            Some(updated)
        );
    }

    #[tokio::test]
    async fn delete_then_get_is_none() {
        let service = service();
        let acme = service.create_company(named("Acme")).await.unwrap();

        service.delete_company(acme.id()).await.unwrap();

        assert!(service.get_company_by_id(acme.id()).await.unwrap().is_none());
        assert!(matches!(
            service.delete_company(acme.id()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    async fn employ(store: &InMemoryStore, username: &str, company_id: Option<Uuid>) -> User {
        let user = User::new(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            name: username.to_string(),
            phone_number: None,
            company_id,
        })
        .unwrap();
        store.users().insert(&user).await.unwrap();
        user
    }

    async fn schedule(store: &InMemoryStore, user: &User, company: &Company) {
        let shift = Shift::new(NewShift {
            user_id: user.id(),
            company_id: company.id(),
            start_time: Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap(),
            stop_time: Utc.with_ymd_and_hms(2024, 3, 4, 17, 0, 0).unwrap(),
            published: None,
        })
        .unwrap();
        store.shifts().insert(&shift).await.unwrap();
    }

    fn cascading(store: &InMemoryStore) -> CompanyService {
        let members = UserService::new(Arc::new(store.users()))
            .with_shift_cascade(Arc::new(store.shifts()));
        CompanyService::new(Arc::new(store.companies())).with_member_cascade(members)
    }

    #[tokio::test]
    async fn member_cascade_removes_employees_and_their_shifts() {
        let store = InMemoryStore::new();
        let service = cascading(&store);
        let acme = service.create_company(named("Acme")).await.unwrap();
        let globex = service.create_company(named("Globex")).await.unwrap();
        let ada = employ(&store, "ada", Some(acme.id())).await;
        let grace = employ(&store, "grace", Some(globex.id())).await;
        let drifter = employ(&store, "drifter", None).await;
        // a member's shift at another company goes with the member
        schedule(&store, &ada, &globex).await;
        schedule(&store, &grace, &acme).await;
        schedule(&store, &grace, &globex).await;

        service.delete_company(acme.id()).await.unwrap();

        let users = store.users();
        assert!(users.find_by_id(ada.id()).await.unwrap().is_none());
        assert!(users.find_by_id(grace.id()).await.unwrap().is_some());
        assert!(users.find_by_id(drifter.id()).await.unwrap().is_some());

        let remaining = store.shifts().list_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user_id(), grace.id());
        assert_eq!(remaining[0].company_id(), globex.id());
    }

    #[tokio::test]
    async fn member_cascade_on_unknown_company_touches_nothing() {
        let store = InMemoryStore::new();
        let service = cascading(&store);
        let orphan_company = Uuid::new_v4();
        let ada = employ(&store, "ada", Some(orphan_company)).await;

        let err = service.delete_company(orphan_company).await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { entity: "Company", .. }));
        assert!(store.users().find_by_id(ada.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn without_member_cascade_employees_stay() {
        let store = InMemoryStore::new();
        let service = CompanyService::new(Arc::new(store.companies()));
        let acme = service.create_company(named("Acme")).await.unwrap();
        let ada = employ(&store, "ada", Some(acme.id())).await;

        service.delete_company(acme.id()).await.unwrap();

        let kept = store.users().find_by_id(ada.id()).await.unwrap().unwrap();
        assert_eq!(kept.company_id(), Some(acme.id()));
    }
}
