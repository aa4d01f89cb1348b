use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::timestamp;
use crate::domain::services::ShiftService;
use crate::domain::shift::{NewShift, Shift, ShiftPatch};

/// Request body for creating a shift
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftRequest {
    pub user_id: Uuid,
    pub company_id: Uuid,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub stop_time: DateTime<Utc>,
    pub published: Option<bool>,
}

impl From<CreateShiftRequest> for NewShift {
    fn from(req: CreateShiftRequest) -> Self {
        Self {
            user_id: req.user_id,
            company_id: req.company_id,
            start_time: req.start_time,
            stop_time: req.stop_time,
            published: req.published,
        }
    }
}

/// Request body for updating a shift; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftRequest {
    pub user_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub stop_time: Option<DateTime<Utc>>,
    pub published: Option<bool>,
}

impl From<UpdateShiftRequest> for ShiftPatch {
    fn from(req: UpdateShiftRequest) -> Self {
        Self {
            user_id: req.user_id,
            company_id: req.company_id,
            start_time: req.start_time,
            stop_time: req.stop_time,
            published: req.published,
        }
    }
}

/// `?startTime=..&stopTime=..` on the range endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetweenQuery {
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub start_time: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub stop_time: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub stop_time: DateTime<Utc>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Shift> for ShiftResponse {
    fn from(shift: &Shift) -> Self {
        Self {
            id: shift.id(),
            user_id: shift.user_id(),
            company_id: shift.company_id(),
            start_time: shift.start_time(),
            stop_time: shift.stop_time(),
            published: shift.published(),
            published_at: shift.published_at(),
            created_at: shift.created_at(),
            updated_at: shift.updated_at(),
        }
    }
}

fn to_responses(shifts: &[Shift]) -> Json<Vec<ShiftResponse>> {
    Json(shifts.iter().map(ShiftResponse::from).collect())
}

/// Shift routes, mounted under `/api/shifts`
///
/// Static segments (`between`, `published`) are matched ahead of `:id`.
pub fn router(service: ShiftService) -> Router {
    Router::new()
        .route("/api/shifts", get(list_shifts).post(create_shift))
        .route("/api/shifts/between", get(get_shifts_between))
        .route("/api/shifts/published", get(get_published_shifts))
        .route(
            "/api/shifts/:id",
            get(get_shift).put(update_shift).delete(delete_shift),
        )
        .route("/api/shifts/user/:user_id", get(get_shifts_by_user))
        .route(
            "/api/shifts/user/:user_id/between",
            get(get_user_shifts_between),
        )
        .route(
            "/api/shifts/user/:user_id/company/:company_id",
            get(get_shifts_by_user_and_company),
        )
        .route("/api/shifts/company/:company_id", get(get_shifts_by_company))
        .with_state(service)
}

/// GET /api/shifts
pub async fn list_shifts(
    State(service): State<ShiftService>,
) -> Result<Json<Vec<ShiftResponse>>, ApiError> {
    let shifts = service.list_shifts().await?;
    Ok(to_responses(&shifts))
}

/// Create a new shift
///
/// POST /api/shifts
pub async fn create_shift(
    State(service): State<ShiftService>,
    ApiJson(req): ApiJson<CreateShiftRequest>,
) -> Result<(StatusCode, Json<ShiftResponse>), ApiError> {
    let shift = service
        .create_shift(req.into())
        .await
        .map_err(ApiError::on_create)?;

    Ok((StatusCode::CREATED, Json(ShiftResponse::from(&shift))))
}

/// Get a shift by ID
///
/// GET /api/shifts/:id
pub async fn get_shift(
    State(service): State<ShiftService>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ShiftResponse>, ApiError> {
    let shift = service
        .get_shift_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Shift not found: {}", id)))?;

    Ok(Json(ShiftResponse::from(&shift)))
}

/// GET /api/shifts/user/:user_id
pub async fn get_shifts_by_user(
    State(service): State<ShiftService>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<ShiftResponse>>, ApiError> {
    let shifts = service.get_shifts_by_user_id(user_id).await?;
    Ok(to_responses(&shifts))
}

/// GET /api/shifts/company/:company_id
pub async fn get_shifts_by_company(
    State(service): State<ShiftService>,
    ApiPath(company_id): ApiPath<Uuid>,
) -> Result<Json<Vec<ShiftResponse>>, ApiError> {
    let shifts = service.get_shifts_by_company_id(company_id).await?;
    Ok(to_responses(&shifts))
}

/// GET /api/shifts/user/:user_id/company/:company_id
pub async fn get_shifts_by_user_and_company(
    State(service): State<ShiftService>,
    ApiPath((user_id, company_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<Vec<ShiftResponse>>, ApiError> {
    let shifts = service
        .get_shifts_by_user_and_company(user_id, company_id)
        .await?;
    Ok(to_responses(&shifts))
}

/// Shifts lying entirely inside the requested window
///
/// GET /api/shifts/between?startTime=..&stopTime=..
pub async fn get_shifts_between(
    State(service): State<ShiftService>,
    ApiQuery(range): ApiQuery<BetweenQuery>,
) -> Result<Json<Vec<ShiftResponse>>, ApiError> {
    let shifts = service
        .get_shifts_between(range.start_time, range.stop_time)
        .await?;
    Ok(to_responses(&shifts))
}

/// GET /api/shifts/user/:user_id/between?startTime=..&stopTime=..
pub async fn get_user_shifts_between(
    State(service): State<ShiftService>,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiQuery(range): ApiQuery<BetweenQuery>,
) -> Result<Json<Vec<ShiftResponse>>, ApiError> {
    let shifts = service
        .get_user_shifts_between(user_id, range.start_time, range.stop_time)
        .await?;
    Ok(to_responses(&shifts))
}

/// GET /api/shifts/published
pub async fn get_published_shifts(
    State(service): State<ShiftService>,
) -> Result<Json<Vec<ShiftResponse>>, ApiError> {
    let shifts = service.get_published_shifts().await?;
    Ok(to_responses(&shifts))
}

/// Merge the present fields into a shift
///
/// PUT /api/shifts/:id
pub async fn update_shift(
    State(service): State<ShiftService>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateShiftRequest>,
) -> Result<Json<ShiftResponse>, ApiError> {
    let shift = service.update_shift(id, req.into()).await?;
    Ok(Json(ShiftResponse::from(&shift)))
}

/// DELETE /api/shifts/:id
pub async fn delete_shift(
    State(service): State<ShiftService>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    service.delete_shift(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
