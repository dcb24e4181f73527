use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{Contractor, ContractorCreate},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct ContractorListResponse {
    pub contractors: Vec<Contractor>,
}

#[derive(Debug, Deserialize)]
pub struct EndContractRequest {
    /// Defaults to now when omitted.
    pub ended_at: Option<DateTime<Utc>>,
}

/// POST /api/contractors - Hire a contractor into a role
pub async fn create_contractor(
    State(app_state): State<AppState>,
    Json(payload): Json<ContractorCreate>,
) -> Result<Json<Contractor>, ApiError> {
    app_state
        .company_repository
        .get_by_id(payload.company_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Company {} not found", payload.company_id)))?;

    let role = app_state
        .role_repository
        .get_by_id(payload.company_role_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Role {} not found", payload.company_role_id))
        })?;

    if role.company_id != payload.company_id {
        return Err(ApiError::validation(
            "Role does not belong to the given company",
        ));
    }
    if role.deleted_at.is_some() {
        return Err(ApiError::validation("Cannot hire into a deleted role"));
    }
    if payload.pay_rate_in_subunits < 0 {
        return Err(ApiError::validation("Pay rate cannot be negative"));
    }

    let contractor = app_state.contractor_repository.create(&payload).await?;

    Ok(Json(contractor))
}

/// GET /api/companies/:id/contractors - List a company's contractors
pub async fn list_contractors(
    State(app_state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ContractorListResponse>, ApiError> {
    let contractors = app_state
        .contractor_repository
        .list_by_company(company_id)
        .await?;

    Ok(Json(ContractorListResponse { contractors }))
}

/// GET /api/contractors/:id - Fetch a single contractor
pub async fn get_contractor(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Contractor>, ApiError> {
    let contractor = app_state
        .contractor_repository
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Contractor {id} not found")))?;

    Ok(Json(contractor))
}

/// POST /api/contractors/:id/end - End a contract
pub async fn end_contract(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EndContractRequest>,
) -> Result<Json<Contractor>, ApiError> {
    let ended_at = payload.ended_at.unwrap_or_else(Utc::now);

    let contractor = app_state
        .contractor_repository
        .end_contract(id, ended_at)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Contractor {id} not found")))?;

    Ok(Json(contractor))
}
