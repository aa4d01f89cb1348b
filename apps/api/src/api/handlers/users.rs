use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::domain::services::UserService;
use crate::domain::user::{NewUser, User, UserPatch};

/// Request body for creating a user
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub company_id: Option<Uuid>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            name: req.name,
            phone_number: req.phone_number,
            company_id: req.company_id,
        }
    }
}

/// Request body for updating a user; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub company_id: Option<Uuid>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone_number: req.phone_number,
            company_id: req.company_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub name: String,
    pub phone_number: Option<String>,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            name: user.name().to_string(),
            phone_number: user.phone_number().map(str::to_string),
            company_id: user.company_id(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

fn to_responses(users: &[User]) -> Json<Vec<UserResponse>> {
    Json(users.iter().map(UserResponse::from).collect())
}

/// User routes, mounted under `/api/users`
pub fn router(service: UserService) -> Router {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/users/username/:username", get(get_user_by_username))
        .route("/api/users/company/:company_id", get(get_users_by_company))
        .with_state(service)
}

/// List all users
///
/// GET /api/users
pub async fn list_users(
    State(service): State<UserService>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = service.list_users().await?;
    Ok(to_responses(&users))
}

/// Create a new user
///
/// POST /api/users
pub async fn create_user(
    State(service): State<UserService>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = service
        .create_user(req.into())
        .await
        .map_err(ApiError::on_create)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Get a user by ID
///
/// GET /api/users/:id
pub async fn get_user(
    State(service): State<UserService>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = service
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", id)))?;

    Ok(Json(UserResponse::from(&user)))
}

/// GET /api/users/username/:username
pub async fn get_user_by_username(
    State(service): State<UserService>,
    ApiPath(username): ApiPath<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = service
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", username)))?;

    Ok(Json(UserResponse::from(&user)))
}

/// Get all users attached to a company
///
/// GET /api/users/company/:company_id
pub async fn get_users_by_company(
    State(service): State<UserService>,
    ApiPath(company_id): ApiPath<Uuid>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = service.list_users_by_company(company_id).await?;
    Ok(to_responses(&users))
}

/// Merge the present fields into a user
///
/// PUT /api/users/:id
pub async fn update_user(
    State(service): State<UserService>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = service.update_user(id, req.into()).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Delete a user; the monolith deletes their shifts too
///
/// DELETE /api/users/:id
pub async fn delete_user(
    State(service): State<UserService>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
