use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::domain::company::{Company, CompanyPatch, NewCompany};
use crate::domain::services::CompanyService;

/// Request body for creating a company
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub name: String,
    pub legal_name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl From<CreateCompanyRequest> for NewCompany {
    fn from(req: CreateCompanyRequest) -> Self {
        Self {
            name: req.name,
            legal_name: req.legal_name,
            description: req.description,
            website: req.website,
            phone_number: req.phone_number,
            address: req.address,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub legal_name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl From<UpdateCompanyRequest> for CompanyPatch {
    fn from(req: UpdateCompanyRequest) -> Self {
        Self {
            name: req.name,
            legal_name: req.legal_name,
            description: req.description,
            website: req.website,
            phone_number: req.phone_number,
            address: req.address,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyResponse {
    pub id: Uuid,
    pub name: String,
    pub legal_name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Company> for CompanyResponse {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id(),
            name: company.name().to_string(),
            legal_name: company.legal_name().map(str::to_string),
            description: company.description().map(str::to_string),
            website: company.website().map(str::to_string),
            phone_number: company.phone_number().map(str::to_string),
            address: company.address().map(str::to_string),
            created_at: company.created_at(),
            updated_at: company.updated_at(),
        }
    }
}

pub fn router(service: CompanyService) -> Router {
    Router::new()
        .route("/api/companies", get(list_companies).post(create_company))
        .route(
            "/api/companies/:id",
            get(get_company).put(update_company).delete(delete_company),
        )
        .route("/api/companies/name/:name", get(get_company_by_name))
        .with_state(service)
}

/// GET /api/companies
pub async fn list_companies(
    State(service): State<CompanyService>,
) -> Result<Json<Vec<CompanyResponse>>, ApiError> {
    let companies = service.list_companies().await?;
    Ok(Json(companies.iter().map(CompanyResponse::from).collect()))
}

/// Create a new company
///
/// POST /api/companies
pub async fn create_company(
    State(service): State<CompanyService>,
    ApiJson(req): ApiJson<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), ApiError> {
    let company = service
        .create_company(req.into())
        .await
        .map_err(ApiError::on_create)?;

    Ok((StatusCode::CREATED, Json(CompanyResponse::from(&company))))
}

/// GET /api/companies/:id
pub async fn get_company(
    State(service): State<CompanyService>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let company = service
        .get_company_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Company not found: {}", id)))?;

    Ok(Json(CompanyResponse::from(&company)))
}

/// GET /api/companies/name/:name
pub async fn get_company_by_name(
    State(service): State<CompanyService>,
    ApiPath(name): ApiPath<String>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let company = service
        .get_company_by_name(&name)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Company not found: {}", name)))?;

    Ok(Json(CompanyResponse::from(&company)))
}

/// Merge the present fields into a company
///
/// PUT /api/companies/:id
pub async fn update_company(
    State(service): State<CompanyService>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateCompanyRequest>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let company = service.update_company(id, req.into()).await?;
    Ok(Json(CompanyResponse::from(&company)))
}

/// Delete a company together with its shifts (and, in the monolith, its
/// users)
///
/// DELETE /api/companies/:id
pub async fn delete_company(
    State(service): State<CompanyService>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    service.delete_company(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
