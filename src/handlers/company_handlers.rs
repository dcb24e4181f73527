use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{Company, CompanyCreate},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CompanyListResponse {
    pub companies: Vec<Company>,
}

/// GET /api/companies - List companies
pub async fn list_companies(
    State(app_state): State<AppState>,
) -> Result<Json<CompanyListResponse>, ApiError> {
    let companies = app_state.company_repository.list_all().await?;

    Ok(Json(CompanyListResponse { companies }))
}

/// POST /api/companies - Create a new company
pub async fn create_company(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCompanyRequest>,
) -> Result<Json<Company>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("Company name cannot be empty"));
    }

    let company = app_state
        .company_repository
        .create(&CompanyCreate { name: payload.name })
        .await?;

    Ok(Json(company))
}

/// GET /api/companies/:id - Fetch a single company
pub async fn get_company(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, ApiError> {
    let company = app_state
        .company_repository
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Company {id} not found")))?;

    Ok(Json(company))
}
