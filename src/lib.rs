use std::sync::Arc;

use crate::{
    config::Settings,
    database::DatabasePool,
    error::ApiError,
    repositories::{
        company_repo::SqlxCompanyRepository, company_role_repo::SqlxCompanyRoleRepository,
        contractor_repo::SqlxContractorRepository,
        equity_allocation_repo::SqlxEquityAllocationRepository,
        equity_grant_repo::SqlxEquityGrantRepository, invoice_repo::SqlxInvoiceRepository,
        CompanyRepository, CompanyRoleRepository, ContractorRepository,
        EquityAllocationRepository, EquityGrantRepository, InvoiceRepository,
    },
    services::{InvoiceService, RoleService},
};

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db_pool: DatabasePool,
    pub company_repository: Arc<dyn CompanyRepository + Send + Sync>,
    pub role_repository: Arc<dyn CompanyRoleRepository + Send + Sync>,
    pub contractor_repository: Arc<dyn ContractorRepository + Send + Sync>,
    pub allocation_repository: Arc<dyn EquityAllocationRepository + Send + Sync>,
    pub grant_repository: Arc<dyn EquityGrantRepository + Send + Sync>,
    pub invoice_repository: Arc<dyn InvoiceRepository + Send + Sync>,
    pub role_service: Arc<RoleService>,
    pub invoice_service: Arc<InvoiceService>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self, ApiError> {
        let pool = database::create_connection_pool(&config.database_url).await?;
        Self::new_with_pool(config, pool).await
    }

    /// Build the state on an existing pool; tests use this to share one
    /// migrated database.
    pub async fn new_with_pool(config: Settings, pool: DatabasePool) -> Result<Self, ApiError> {
        let company_repository: Arc<dyn CompanyRepository + Send + Sync> =
            Arc::new(SqlxCompanyRepository::new(pool.clone()));
        let role_repository: Arc<dyn CompanyRoleRepository + Send + Sync> =
            Arc::new(SqlxCompanyRoleRepository::new(pool.clone()));
        let contractor_repository: Arc<dyn ContractorRepository + Send + Sync> =
            Arc::new(SqlxContractorRepository::new(pool.clone()));
        let allocation_repository: Arc<dyn EquityAllocationRepository + Send + Sync> =
            Arc::new(SqlxEquityAllocationRepository::new(pool.clone()));
        let grant_repository: Arc<dyn EquityGrantRepository + Send + Sync> =
            Arc::new(SqlxEquityGrantRepository::new(pool.clone()));
        let invoice_repository: Arc<dyn InvoiceRepository + Send + Sync> =
            Arc::new(SqlxInvoiceRepository::new(pool.clone()));

        let role_service = Arc::new(RoleService::new(role_repository.clone()));
        let invoice_service = Arc::new(InvoiceService::new(
            invoice_repository.clone(),
            contractor_repository.clone(),
            allocation_repository.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            db_pool: pool,
            company_repository,
            role_repository,
            contractor_repository,
            allocation_repository,
            grant_repository,
            invoice_repository,
            role_service,
            invoice_service,
        })
    }
}

/// Build the API router on top of an [`AppState`].
pub fn api_router(app_state: AppState) -> axum::Router {
    use axum::routing::{delete, get, patch, post, put};

    axum::Router::new()
        // Health check endpoints
        .route("/api/health", get(handlers::health_check))
        .route("/api/health/live", get(handlers::liveness_check))
        // Company endpoints
        .route("/api/companies", post(handlers::company_handlers::create_company))
        .route("/api/companies", get(handlers::company_handlers::list_companies))
        .route("/api/companies/:id", get(handlers::company_handlers::get_company))
        .route(
            "/api/companies/:id/roles",
            get(handlers::company_role_handlers::list_roles),
        )
        .route(
            "/api/companies/:id/contractors",
            get(handlers::contractor_handlers::list_contractors),
        )
        .route(
            "/api/companies/:id/invoices",
            get(handlers::invoice_handlers::list_company_invoices),
        )
        // Role endpoints
        .route("/api/roles", post(handlers::company_role_handlers::create_role))
        .route("/api/roles/:id", get(handlers::company_role_handlers::get_role))
        .route("/api/roles/:id", patch(handlers::company_role_handlers::update_role))
        .route("/api/roles/:id", delete(handlers::company_role_handlers::delete_role))
        // Contractor endpoints
        .route(
            "/api/contractors",
            post(handlers::contractor_handlers::create_contractor),
        )
        .route(
            "/api/contractors/:id",
            get(handlers::contractor_handlers::get_contractor),
        )
        .route(
            "/api/contractors/:id/end",
            post(handlers::contractor_handlers::end_contract),
        )
        // Equity endpoints
        .route(
            "/api/contractors/:id/equity-allocations/:year",
            get(handlers::equity_handlers::get_allocation),
        )
        .route(
            "/api/contractors/:id/equity-allocations/:year",
            put(handlers::equity_handlers::elect_allocation),
        )
        .route(
            "/api/contractors/:id/equity-grants",
            get(handlers::equity_handlers::list_grants),
        )
        // Invoice endpoints
        .route("/api/invoices", post(handlers::invoice_handlers::create_invoice))
        .route("/api/invoices/:id", get(handlers::invoice_handlers::get_invoice))
        .route(
            "/api/contractors/:id/invoices",
            get(handlers::invoice_handlers::list_contractor_invoices),
        )
        .route(
            "/api/invoices/:id/approve",
            post(handlers::invoice_handlers::approve_invoice),
        )
        .route(
            "/api/invoices/:id/reject",
            post(handlers::invoice_handlers::reject_invoice),
        )
        .route("/api/invoices/:id/pay", post(handlers::invoice_handlers::pay_invoice))
        .with_state(app_state)
}
