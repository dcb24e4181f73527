use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{Invoice, InvoiceCreate},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<Invoice>,
}

/// POST /api/invoices - Submit an invoice
///
/// Returns 409 when the year's equity election still needs confirmation;
/// resubmitting with `confirm_equity_allocation: true` locks it.
pub async fn create_invoice(
    State(app_state): State<AppState>,
    Json(payload): Json<InvoiceCreate>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = app_state.invoice_service.create_invoice(&payload).await?;

    Ok(Json(invoice))
}

/// GET /api/invoices/:id - Fetch a single invoice
pub async fn get_invoice(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = app_state
        .invoice_repository
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Invoice {id} not found")))?;

    Ok(Json(invoice))
}

/// GET /api/companies/:id/invoices - A company's invoices
pub async fn list_company_invoices(
    State(app_state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<InvoiceListResponse>, ApiError> {
    let invoices = app_state
        .invoice_repository
        .list_by_company(company_id)
        .await?;

    Ok(Json(InvoiceListResponse { invoices }))
}

/// GET /api/contractors/:id/invoices - A contractor's invoices
pub async fn list_contractor_invoices(
    State(app_state): State<AppState>,
    Path(contractor_id): Path<Uuid>,
) -> Result<Json<InvoiceListResponse>, ApiError> {
    let invoices = app_state
        .invoice_repository
        .list_by_worker(contractor_id)
        .await?;

    Ok(Json(InvoiceListResponse { invoices }))
}

/// POST /api/invoices/:id/approve
pub async fn approve_invoice(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = app_state.invoice_service.approve_invoice(id).await?;

    Ok(Json(invoice))
}

/// POST /api/invoices/:id/reject
pub async fn reject_invoice(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = app_state.invoice_service.reject_invoice(id).await?;

    Ok(Json(invoice))
}

/// POST /api/invoices/:id/pay
pub async fn pay_invoice(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, ApiError> {
    let invoice = app_state.invoice_service.mark_invoice_paid(id).await?;

    Ok(Json(invoice))
}
