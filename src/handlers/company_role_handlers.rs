use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CompanyRole, CompanyRoleCreate, CompanyRoleUpdate},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct RoleListQuery {
    pub actively_hiring: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RoleListResponse {
    pub roles: Vec<CompanyRole>,
}

/// POST /api/roles - Create a role together with its initial rate
pub async fn create_role(
    State(app_state): State<AppState>,
    Json(payload): Json<CompanyRoleCreate>,
) -> Result<Json<CompanyRole>, ApiError> {
    app_state
        .company_repository
        .get_by_id(payload.company_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Company {} not found", payload.company_id)))?;

    let role = app_state.role_service.create_role(&payload).await?;

    Ok(Json(role))
}

/// GET /api/companies/:id/roles - List roles, optionally only those actively hiring
pub async fn list_roles(
    State(app_state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(query): Query<RoleListQuery>,
) -> Result<Json<RoleListResponse>, ApiError> {
    let roles = match query.actively_hiring {
        Some(true) => {
            app_state
                .role_repository
                .list_actively_hiring(company_id)
                .await?
        }
        _ => app_state.role_repository.list_by_company(company_id).await?,
    };

    Ok(Json(RoleListResponse { roles }))
}

/// GET /api/roles/:id - Fetch a single role with its current rate
pub async fn get_role(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyRole>, ApiError> {
    let role = app_state
        .role_repository
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Role {id} not found")))?;

    Ok(Json(role))
}

/// PATCH /api/roles/:id - Update a role; a rate change appends a new current rate
pub async fn update_role(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompanyRoleUpdate>,
) -> Result<Json<CompanyRole>, ApiError> {
    let role = app_state.role_service.update_role(id, &payload).await?;

    Ok(Json(role))
}

/// DELETE /api/roles/:id - Soft-delete a role once no contractor is active on it
pub async fn delete_role(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    app_state.role_service.delete_role(id).await?;

    Ok(Json(json!({ "deleted": true })))
}
