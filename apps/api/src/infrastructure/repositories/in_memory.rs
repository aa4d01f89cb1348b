use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::company::Company;
use crate::domain::repositories::{
    CompanyRepository, RepositoryError, RepositoryResult, ShiftRepository, UserRepository,
};
use crate::domain::shift::Shift;
use crate::domain::user::User;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    companies: Vec<Company>,
    shifts: Vec<Shift>,
}

/// Process-local store backing all three repositories.
///
/// Rows are kept in insertion order. Every write takes the single write
/// guard, so a uniqueness check and the insert it protects cannot be
/// interleaved with another writer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn companies(&self) -> InMemoryCompanyRepository {
        InMemoryCompanyRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn shifts(&self) -> InMemoryShiftRepository {
        InMemoryShiftRepository {
            tables: Arc::clone(&self.tables),
        }
    }
}

fn replace<T>(rows: &mut [T], id: Uuid, key: impl Fn(&T) -> Uuid, row: T) -> bool {
    match rows.iter_mut().find(|r| key(r) == id) {
        Some(slot) => {
            *slot = row;
            true
        }
        None => false,
    }
}

fn remove<T>(rows: &mut Vec<T>, id: Uuid, key: impl Fn(&T) -> Uuid) -> bool {
    let before = rows.len();
    rows.retain(|r| key(r) != id);
    rows.len() != before
}

// ===== Users =====

pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

fn check_user_unique(users: &[User], user: &User) -> RepositoryResult<()> {
    for other in users.iter().filter(|u| u.id() != user.id()) {
        if other.username() == user.username() {
            return Err(RepositoryError::Conflict {
                field: "username",
                value: user.username().to_string(),
            });
        }
        if other.email() == user.email() {
            return Err(RepositoryError::Conflict {
                field: "email",
                value: user.email().to_string(),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        check_user_unique(&tables.users, user)?;
        tables.users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> RepositoryResult<bool> {
        let mut tables = self.tables.write().await;
        check_user_unique(&tables.users, user)?;
        Ok(replace(&mut tables.users, user.id(), User::id, user.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id() == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.username() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email().as_str() == email)
            .cloned())
    }

    async fn list_all(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn list_by_company(&self, company_id: Uuid) -> RepositoryResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .filter(|u| u.company_id() == Some(company_id))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(remove(&mut tables.users, id, User::id))
    }
}

// ===== Companies =====

pub struct InMemoryCompanyRepository {
    tables: Arc<RwLock<Tables>>,
}

fn check_company_unique(companies: &[Company], company: &Company) -> RepositoryResult<()> {
    if companies
        .iter()
        .any(|c| c.id() != company.id() && c.name() == company.name())
    {
        return Err(RepositoryError::Conflict {
            field: "name",
            value: company.name().to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn insert(&self, company: &Company) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        check_company_unique(&tables.companies, company)?;
        tables.companies.push(company.clone());
        Ok(())
    }

    async fn update(&self, company: &Company) -> RepositoryResult<bool> {
        let mut tables = self.tables.write().await;
        check_company_unique(&tables.companies, company)?;
        Ok(replace(
            &mut tables.companies,
            company.id(),
            Company::id,
            company.clone(),
        ))
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Company>> {
        let tables = self.tables.read().await;
        Ok(tables.companies.iter().find(|c| c.id() == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Company>> {
        let tables = self.tables.read().await;
        Ok(tables.companies.iter().find(|c| c.name() == name).cloned())
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Company>> {
        Ok(self.tables.read().await.companies.clone())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut tables = self.tables.write().await;
        if !remove(&mut tables.companies, id, Company::id) {
            return Ok(false);
        }
        // mirrors ON DELETE CASCADE on shifts.company_id
        tables.shifts.retain(|s| s.company_id() != id);
        Ok(true)
    }
}

// ===== Shifts =====

pub struct InMemoryShiftRepository {
    tables: Arc<RwLock<Tables>>,
}

fn check_company_exists(companies: &[Company], shift: &Shift) -> RepositoryResult<()> {
    // same rule as the shifts.company_id foreign key
    if companies.iter().any(|c| c.id() == shift.company_id()) {
        Ok(())
    } else {
        Err(RepositoryError::MissingReference {
            entity: "Company",
            id: shift.company_id(),
        })
    }
}

impl InMemoryShiftRepository {
    async fn select(&self, pred: impl Fn(&Shift) -> bool) -> Vec<Shift> {
        let tables = self.tables.read().await;
        tables.shifts.iter().filter(|s| pred(s)).cloned().collect()
    }
}

#[async_trait]
impl ShiftRepository for InMemoryShiftRepository {
    async fn insert(&self, shift: &Shift) -> RepositoryResult<()> {
        let mut tables = self.tables.write().await;
        check_company_exists(&tables.companies, shift)?;
        tables.shifts.push(shift.clone());
        Ok(())
    }

    async fn update(&self, shift: &Shift) -> RepositoryResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.shifts.iter().any(|s| s.id() == shift.id()) {
            return Ok(false);
        }
        check_company_exists(&tables.companies, shift)?;
        Ok(replace(&mut tables.shifts, shift.id(), Shift::id, shift.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Shift>> {
        let tables = self.tables.read().await;
        Ok(tables.shifts.iter().find(|s| s.id() == id).cloned())
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Shift>> {
        Ok(self.tables.read().await.shifts.clone())
    }

    async fn list_by_user(&self, user_id: Uuid) -> RepositoryResult<Vec<Shift>> {
        Ok(self.select(|s| s.user_id() == user_id).await)
    }

    async fn list_by_company(&self, company_id: Uuid) -> RepositoryResult<Vec<Shift>> {
        Ok(self.select(|s| s.company_id() == company_id).await)
    }

    async fn list_by_user_and_company(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> RepositoryResult<Vec<Shift>> {
        Ok(self
            .select(|s| s.user_id() == user_id && s.company_id() == company_id)
            .await)
    }

    async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Shift>> {
        Ok(self.select(|s| s.window().is_contained_in(from, to)).await)
    }

    async fn list_user_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Shift>> {
        Ok(self
            .select(|s| s.user_id() == user_id && s.window().is_contained_in(from, to))
            .await)
    }

    async fn list_published(&self) -> RepositoryResult<Vec<Shift>> {
        Ok(self.select(Shift::published).await)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> RepositoryResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.shifts.len();
        tables.shifts.retain(|s| s.user_id() != user_id);
        Ok((before - tables.shifts.len()) as u64)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut tables = self.tables.write().await;
        Ok(remove(&mut tables.shifts, id, Shift::id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::company::NewCompany;
    use crate::domain::shift::NewShift;
    use crate::domain::user::NewUser;
    use chrono::TimeZone;

    fn user(username: &str, email: &str) -> User {
        User::new(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            name: "Someone".to_string(),
            phone_number: None,
            company_id: None,
        })
        .unwrap()
    }

    fn company(name: &str) -> Company {
        Company::new(NewCompany {
            name: name.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email_atomically() {
        let repo = InMemoryStore::new().users();
        repo.insert(&user("a", "same@example.com")).await.unwrap();

        let err = repo
            .insert(&user("b", "same@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict { field: "email", .. }));
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_unknown_row_reports_false() {
        let repo = InMemoryStore::new().users();

        assert!(!repo.update(&user("a", "a@example.com")).await.unwrap());
    }

    #[tokio::test]
    async fn listing_keeps_insertion_order() {
        let repo = InMemoryStore::new().companies();
        for name in ["Zeta", "Alpha", "Mid"] {
            repo.insert(&company(name)).await.unwrap();
        }

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|c| c.name().to_string())
            .collect();

        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    fn shift_for(user_id: Uuid, company_id: Uuid) -> Shift {
        Shift::new(NewShift {
            user_id,
            company_id,
            start_time: Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap(),
            stop_time: Utc.with_ymd_and_hms(2024, 3, 4, 17, 0, 0).unwrap(),
            published: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn shift_insert_with_missing_company_is_missing_reference() {
        let shifts = InMemoryStore::new().shifts();
        let company_id = Uuid::new_v4();

        let err = shifts
            .insert(&shift_for(Uuid::new_v4(), company_id))
            .await
            .unwrap_err();

        match err {
            RepositoryError::MissingReference { entity, id } => {
                assert_eq!(entity, "Company");
                assert_eq!(id, company_id);
            }
            other => panic!("Expected MissingReference, got {:?}", other),
        }
        assert!(shifts.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn shift_update_onto_missing_company_keeps_stored_row() {
        let store = InMemoryStore::new();
        let acme = company("Acme");
        store.companies().insert(&acme).await.unwrap();
        let shifts = store.shifts();
        let shift = shift_for(Uuid::new_v4(), acme.id());
        shifts.insert(&shift).await.unwrap();

        let gone = Uuid::new_v4();
        let moved = Shift::from_persistence(
            shift.id(),
            shift.user_id(),
            gone,
            shift.start_time(),
            shift.stop_time(),
            shift.published(),
            shift.published_at(),
            shift.created_at(),
            shift.updated_at(),
        )
        .unwrap();

        let err = shifts.update(&moved).await.unwrap_err();

        assert!(matches!(
            err,
            RepositoryError::MissingReference { entity: "Company", id } if id == gone
        ));
        let stored = shifts.find_by_id(shift.id()).await.unwrap().unwrap();
        assert_eq!(stored.company_id(), acme.id());
    }

    #[tokio::test]
    async fn shift_update_of_unknown_id_reports_false() {
        let shifts = InMemoryStore::new().shifts();

        assert!(!shifts
            .update(&shift_for(Uuid::new_v4(), Uuid::new_v4()))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn delete_by_user_removes_only_that_users_shifts() {
        let store = InMemoryStore::new();
        let acme = company("Acme");
        store.companies().insert(&acme).await.unwrap();
        let shifts = store.shifts();
        let (ada, grace) = (Uuid::new_v4(), Uuid::new_v4());
        for user_id in [ada, ada, grace] {
            shifts.insert(&shift_for(user_id, acme.id())).await.unwrap();
        }

        assert_eq!(shifts.delete_by_user(ada).await.unwrap(), 2);
        assert_eq!(shifts.delete_by_user(ada).await.unwrap(), 0);

        let remaining = shifts.list_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user_id(), grace);
    }

    #[tokio::test]
    async fn deleting_company_cascades_to_shifts() {
        let store = InMemoryStore::new();
        let companies = store.companies();
        let shifts = store.shifts();
        let acme = company("Acme");
        let globex = company("Globex");
        companies.insert(&acme).await.unwrap();
        companies.insert(&globex).await.unwrap();

        let start = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let stop = Utc.with_ymd_and_hms(2024, 3, 4, 17, 0, 0).unwrap();
        for company_id in [acme.id(), globex.id()] {
            let shift = Shift::new(NewShift {
                user_id: Uuid::new_v4(),
                company_id,
                start_time: start,
                stop_time: stop,
                published: None,
            })
            .unwrap();
            shifts.insert(&shift).await.unwrap();
        }

        assert!(companies.delete(acme.id()).await.unwrap());

        let remaining = shifts.list_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].company_id(), globex.id());
    }
}
