use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{EquityAllocation, EquityElection, EquityGrant},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct GrantListResponse {
    pub grants: Vec<EquityGrant>,
}

/// GET /api/contractors/:id/equity-allocations/:year - The year's election
pub async fn get_allocation(
    State(app_state): State<AppState>,
    Path((contractor_id, year)): Path<(Uuid, i32)>,
) -> Result<Json<EquityAllocation>, ApiError> {
    let allocation = app_state
        .allocation_repository
        .find_by_worker_and_year(contractor_id, year)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "No equity allocation for contractor {contractor_id} in {year}"
            ))
        })?;

    Ok(Json(allocation))
}

/// PUT /api/contractors/:id/equity-allocations/:year - Elect a percentage
///
/// Elections stay editable until the first confirmed invoice of the year
/// locks them.
pub async fn elect_allocation(
    State(app_state): State<AppState>,
    Path((contractor_id, year)): Path<(Uuid, i32)>,
    Json(payload): Json<EquityElection>,
) -> Result<Json<EquityAllocation>, ApiError> {
    if !(0..=100).contains(&payload.equity_percentage) {
        return Err(ApiError::validation(
            "Equity percentage must be between 0 and 100",
        ));
    }

    app_state
        .contractor_repository
        .get_by_id(contractor_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Contractor {contractor_id} not found")))?;

    let allocation = app_state
        .allocation_repository
        .elect(contractor_id, year, payload.equity_percentage)
        .await?
        .ok_or_else(|| {
            ApiError::conflict(format!(
                "Equity allocation for {year} is locked and can no longer be changed"
            ))
        })?;

    Ok(Json(allocation))
}

/// GET /api/contractors/:id/equity-grants - Shares granted to a contractor
pub async fn list_grants(
    State(app_state): State<AppState>,
    Path(contractor_id): Path<Uuid>,
) -> Result<Json<GrantListResponse>, ApiError> {
    let grants = app_state
        .grant_repository
        .list_by_worker(contractor_id)
        .await?;

    Ok(Json(GrantListResponse { grants }))
}
