//! Integration tests for the PostgreSQL repositories
//!
//! These tests need a reachable database in `DATABASE_URL`; they are
//! ignored by default. Run with `cargo test -- --ignored`.
//!
//! Every test works on freshly generated names so runs do not collide,
//! and removes its company afterwards (shifts go with it).

use chrono::{TimeZone, Utc};
use shiftdesk_api::domain::company::{Company, NewCompany};
use shiftdesk_api::domain::repositories::{
    CompanyRepository, RepositoryError, ShiftRepository, UserRepository,
};
use shiftdesk_api::domain::shift::{NewShift, Shift, ShiftPatch};
use shiftdesk_api::domain::user::{NewUser, User, UserPatch};
use shiftdesk_api::infrastructure::repositories::{
    PostgresCompanyRepository, PostgresShiftRepository, PostgresUserRepository,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Set up test database connection pool with the schema applied
async fn setup_test_db() -> PgPool {
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for integration tests");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Create a test company for isolation
async fn create_test_company(repo: &PostgresCompanyRepository) -> Company {
    let company = Company::new(NewCompany {
        name: unique("company"),
        ..Default::default()
    })
    .unwrap();
    repo.insert(&company).await.expect("Failed to create test company");
    company
}

fn new_user(company_id: Option<Uuid>) -> User {
    let handle = unique("user");
    User::new(NewUser {
        email: format!("{}@example.com", handle),
        username: handle,
        name: "Test User".to_string(),
        phone_number: None,
        company_id,
    })
    .unwrap()
}

fn new_shift(user_id: Uuid, company_id: Uuid, day: u32) -> Shift {
    Shift::new(NewShift {
        user_id,
        company_id,
        start_time: Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(),
        stop_time: Utc.with_ymd_and_hms(2024, 3, day, 17, 0, 0).unwrap(),
        published: None,
    })
    .unwrap()
}

#[tokio::test]
#[ignore]
async fn test_user_repository_round_trip_and_lookups() {
    let pool = setup_test_db().await;
    let companies = PostgresCompanyRepository::new(pool.clone());
    let users = PostgresUserRepository::new(pool.clone());
    let company = create_test_company(&companies).await;

    let user = new_user(Some(company.id()));
    users.insert(&user).await.unwrap();

    let by_id = users.find_by_id(user.id()).await.unwrap().unwrap();
    assert_eq!(by_id.username(), user.username());
    assert_eq!(by_id.email(), user.email());

    let by_username = users.find_by_username(user.username()).await.unwrap();
    assert_eq!(by_username.map(|u| u.id()), Some(user.id()));

    let by_email = users.find_by_email(user.email().as_str()).await.unwrap();
    assert_eq!(by_email.map(|u| u.id()), Some(user.id()));

    let members = users.list_by_company(company.id()).await.unwrap();
    assert_eq!(members.len(), 1);

    assert!(users.delete(user.id()).await.unwrap());
    assert!(users.find_by_id(user.id()).await.unwrap().is_none());
    companies.delete(company.id()).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_user_repository_maps_unique_violations() {
    let pool = setup_test_db().await;
    let users = PostgresUserRepository::new(pool.clone());

    let first = new_user(None);
    users.insert(&first).await.unwrap();

    let mut second = new_user(None);
    users.insert(&second).await.unwrap();
    second
        .apply_patch(UserPatch {
            email: Some(first.email().to_string()),
            ..Default::default()
        })
        .unwrap();

    let err = users.update(&second).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict { field: "email", .. }));

    users.delete(first.id()).await.unwrap();
    users.delete(second.id()).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_company_repository_rejects_duplicate_name() {
    let pool = setup_test_db().await;
    let companies = PostgresCompanyRepository::new(pool.clone());
    let company = create_test_company(&companies).await;

    let clash = Company::new(NewCompany {
        name: company.name().to_string(),
        ..Default::default()
    })
    .unwrap();
    let err = companies.insert(&clash).await.unwrap_err();

    assert!(matches!(err, RepositoryError::Conflict { field: "name", .. }));
    assert_eq!(
        companies
            .find_by_name(company.name())
            .await
            .unwrap()
            .map(|c| c.id()),
        Some(company.id())
    );
    companies.delete(company.id()).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_shift_repository_queries_and_cascade() {
    let pool = setup_test_db().await;
    let companies = PostgresCompanyRepository::new(pool.clone());
    let shifts = PostgresShiftRepository::new(pool.clone());
    let company = create_test_company(&companies).await;
    let user_id = Uuid::new_v4();

    let monday = new_shift(user_id, company.id(), 4);
    let mut tuesday = new_shift(user_id, company.id(), 5);
    shifts.insert(&monday).await.unwrap();
    shifts.insert(&tuesday).await.unwrap();

    let by_user = shifts.list_by_user(user_id).await.unwrap();
    assert_eq!(by_user.len(), 2);
    assert_eq!(
        shifts
            .list_by_user_and_company(user_id, company.id())
            .await
            .unwrap()
            .len(),
        2
    );

    let inside = shifts
        .list_user_between(
            user_id,
            Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 4, 18, 0, 0).unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(inside.len(), 1);
    assert_eq!(inside[0].id(), monday.id());

    let overlapping = shifts
        .list_user_between(
            user_id,
            Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 4, 18, 0, 0).unwrap(),
        )
        .await
        .unwrap();
    assert!(overlapping.is_empty());

    tuesday
        .apply_patch(ShiftPatch {
            published: Some(true),
            ..Default::default()
        })
        .unwrap();
    assert!(shifts.update(&tuesday).await.unwrap());
    let stored = shifts.find_by_id(tuesday.id()).await.unwrap().unwrap();
    assert!(stored.published());
    assert!(stored.published_at().is_some());

    // deleting the company takes its shifts along
    assert!(companies.delete(company.id()).await.unwrap());
    assert!(shifts.list_by_company(company.id()).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_shift_repository_reports_missing_company() {
    let pool = setup_test_db().await;
    let companies = PostgresCompanyRepository::new(pool.clone());
    let shifts = PostgresShiftRepository::new(pool.clone());
    let company = create_test_company(&companies).await;
    let user_id = Uuid::new_v4();

    let gone = Uuid::new_v4();
    let err = shifts
        .insert(&new_shift(user_id, gone, 4))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::MissingReference { entity: "Company", id } if id == gone
    ));

    let mut shift = new_shift(user_id, company.id(), 4);
    shifts.insert(&shift).await.unwrap();
    shift
        .apply_patch(ShiftPatch {
            company_id: Some(gone),
            ..Default::default()
        })
        .unwrap();
    let err = shifts.update(&shift).await.unwrap_err();
    assert!(matches!(err, RepositoryError::MissingReference { .. }));

    let other = new_shift(Uuid::new_v4(), company.id(), 5);
    shifts.insert(&other).await.unwrap();
    assert_eq!(shifts.delete_by_user(user_id).await.unwrap(), 1);
    let remaining = shifts.list_by_company(company.id()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id(), other.id());

    companies.delete(company.id()).await.unwrap();
}
