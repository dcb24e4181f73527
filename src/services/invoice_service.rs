use chrono::Datelike;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{Contractor, Invoice, InvoiceCreate, NewInvoice, PayRateType},
    repositories::{
        AllocationLock, ContractorRepository, EquityAllocationRepository, InvoiceRepository,
    },
    services::equity::{self, EquityComputeError},
};

/// Invoice creation and lifecycle.
///
/// Creation derives the billed total from the contractor's pay-rate type,
/// runs the one-time-per-year equity confirmation gate, and settles the
/// cash/equity split. The allocation lock and the invoice insert happen in
/// one repository transaction.
pub struct InvoiceService {
    invoices: Arc<dyn InvoiceRepository + Send + Sync>,
    contractors: Arc<dyn ContractorRepository + Send + Sync>,
    allocations: Arc<dyn EquityAllocationRepository + Send + Sync>,
}

impl InvoiceService {
    pub fn new(
        invoices: Arc<dyn InvoiceRepository + Send + Sync>,
        contractors: Arc<dyn ContractorRepository + Send + Sync>,
        allocations: Arc<dyn EquityAllocationRepository + Send + Sync>,
    ) -> Self {
        Self {
            invoices,
            contractors,
            allocations,
        }
    }

    pub async fn create_invoice(&self, request: &InvoiceCreate) -> Result<Invoice, ApiError> {
        let contractor = self
            .contractors
            .get_by_id(request.company_worker_id)
            .await?
            .ok_or_else(|| {
                ApiError::not_found(format!("Contractor {} not found", request.company_worker_id))
            })?;

        let total_amount_in_usd_cents = billed_total(&contractor, request)?;
        let year = request.invoice_date.year();

        let allocation = self
            .allocations
            .find_by_worker_and_year(contractor.id, year)
            .await?;

        // One-time-per-year confirmation gate: an unlocked election must be
        // confirmed (and thereby locked) by the first invoice of the year.
        // A locked allocation never re-prompts.
        if let Some(alloc) = &allocation {
            if !alloc.locked && !request.confirm_equity_allocation {
                return Err(ApiError::conflict(format!(
                    "Confirm locking your {year} equity allocation at {}% before submitting this invoice",
                    alloc.equity_percentage
                )));
            }
        }

        let split = equity::split_for_allocation(total_amount_in_usd_cents, allocation.as_ref())
            .map_err(map_equity_error)?;

        let lock = allocation
            .as_ref()
            .filter(|a| !a.locked)
            .map(|_| AllocationLock {
                company_worker_id: contractor.id,
                year,
            });

        let invoice = NewInvoice {
            company_id: contractor.company_id,
            company_worker_id: contractor.id,
            invoice_date: request.invoice_date,
            total_minutes: match contractor.pay_rate_type {
                PayRateType::Hourly => request.total_minutes,
                _ => None,
            },
            total_amount_in_usd_cents: split.total_amount_in_usd_cents,
            cash_amount_in_cents: split.cash_amount_in_cents,
            equity_amount_in_cents: split.equity_amount_in_cents,
            equity_percentage: split.equity_percentage,
            description: request.description.clone(),
        };

        tracing::info!(
            company_worker_id = %contractor.id,
            year,
            total_cents = split.total_amount_in_usd_cents,
            equity_cents = split.equity_amount_in_cents,
            locking = lock.is_some(),
            "creating invoice"
        );

        self.invoices.create_settled(&invoice, lock).await
    }

    pub async fn approve_invoice(&self, id: Uuid) -> Result<Invoice, ApiError> {
        match self.invoices.approve(id).await? {
            Some(invoice) => Ok(invoice),
            None => Err(self.transition_failure(id, "approved").await?),
        }
    }

    pub async fn reject_invoice(&self, id: Uuid) -> Result<Invoice, ApiError> {
        match self.invoices.reject(id).await? {
            Some(invoice) => Ok(invoice),
            None => Err(self.transition_failure(id, "rejected").await?),
        }
    }

    pub async fn mark_invoice_paid(&self, id: Uuid) -> Result<Invoice, ApiError> {
        match self.invoices.mark_paid(id).await? {
            Some(invoice) => Ok(invoice),
            None => Err(self.transition_failure(id, "paid").await?),
        }
    }

    /// A status transition that matched no row is either a missing invoice
    /// or one in a state the transition does not accept.
    async fn transition_failure(&self, id: Uuid, target: &str) -> Result<ApiError, ApiError> {
        match self.invoices.get_by_id(id).await? {
            None => Ok(ApiError::not_found(format!("Invoice {id} not found"))),
            Some(invoice) => Ok(ApiError::conflict(format!(
                "Invoice cannot be {target} while {}",
                invoice.status
            ))),
        }
    }
}

fn billed_total(contractor: &Contractor, request: &InvoiceCreate) -> Result<i64, ApiError> {
    match contractor.pay_rate_type {
        PayRateType::Hourly => {
            let minutes = request.total_minutes.ok_or_else(|| {
                ApiError::validation("Hourly invoices require total_minutes")
            })?;
            equity::hourly_total_cents(minutes, contractor.pay_rate_in_subunits)
                .map_err(map_equity_error)
        }
        PayRateType::ProjectBased => {
            let amount = request.total_amount_in_usd_cents.ok_or_else(|| {
                ApiError::validation("Project-based invoices require total_amount_in_usd_cents")
            })?;
            if amount < 0 {
                return Err(ApiError::validation("Invoice total cannot be negative"));
            }
            Ok(amount)
        }
        PayRateType::Salary => Err(ApiError::validation(
            "Salaried contractors do not submit invoices",
        )),
    }
}

fn map_equity_error(err: EquityComputeError) -> ApiError {
    match err {
        EquityComputeError::NegativeTotal(_)
        | EquityComputeError::NegativeMinutes(_)
        | EquityComputeError::NegativeRate(_) => ApiError::validation(err.to_string()),
        // Stored percentages are DB-constrained; this is a data fault.
        EquityComputeError::PercentageOutOfRange(_) => ApiError::internal(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::models::{AllocationStatus, EquityAllocation, InvoiceStatus};

    // Mock implementations for testing

    struct MockContractorRepository {
        contractors: HashMap<Uuid, Contractor>,
    }

    impl MockContractorRepository {
        fn with(contractor: Contractor) -> Self {
            let mut contractors = HashMap::new();
            contractors.insert(contractor.id, contractor);
            Self { contractors }
        }
    }

    #[async_trait]
    impl ContractorRepository for MockContractorRepository {
        async fn create(
            &self,
            _contractor: &crate::models::ContractorCreate,
        ) -> Result<Contractor, ApiError> {
            unimplemented!("not used by these tests")
        }

        async fn get_by_id(&self, id: Uuid) -> Result<Option<Contractor>, ApiError> {
            Ok(self.contractors.get(&id).cloned())
        }

        async fn list_by_company(&self, _company_id: Uuid) -> Result<Vec<Contractor>, ApiError> {
            Ok(Vec::new())
        }

        async fn end_contract(
            &self,
            _id: Uuid,
            _ended_at: chrono::DateTime<Utc>,
        ) -> Result<Option<Contractor>, ApiError> {
            Ok(None)
        }
    }

    struct MockAllocationRepository {
        allocation: Option<EquityAllocation>,
    }

    #[async_trait]
    impl EquityAllocationRepository for MockAllocationRepository {
        async fn find_by_worker_and_year(
            &self,
            _company_worker_id: Uuid,
            _year: i32,
        ) -> Result<Option<EquityAllocation>, ApiError> {
            Ok(self.allocation.clone())
        }

        async fn elect(
            &self,
            _company_worker_id: Uuid,
            _year: i32,
            _equity_percentage: i32,
        ) -> Result<Option<EquityAllocation>, ApiError> {
            Ok(self.allocation.clone())
        }
    }

    #[derive(Default)]
    struct MockInvoiceRepository {
        created: Mutex<Vec<(NewInvoice, Option<AllocationLock>)>>,
    }

    #[async_trait]
    impl InvoiceRepository for MockInvoiceRepository {
        async fn create_settled(
            &self,
            invoice: &NewInvoice,
            lock: Option<AllocationLock>,
        ) -> Result<Invoice, ApiError> {
            self.created
                .lock()
                .unwrap()
                .push((invoice.clone(), lock));

            Ok(Invoice {
                id: Uuid::new_v4(),
                company_id: invoice.company_id,
                company_worker_id: invoice.company_worker_id,
                invoice_date: invoice.invoice_date,
                total_minutes: invoice.total_minutes,
                total_amount_in_usd_cents: invoice.total_amount_in_usd_cents,
                cash_amount_in_cents: invoice.cash_amount_in_cents,
                equity_amount_in_cents: invoice.equity_amount_in_cents,
                equity_percentage: invoice.equity_percentage,
                description: invoice.description.clone(),
                status: InvoiceStatus::Received,
                approvals: 0,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        }

        async fn get_by_id(&self, _id: Uuid) -> Result<Option<Invoice>, ApiError> {
            Ok(None)
        }

        async fn list_by_company(&self, _company_id: Uuid) -> Result<Vec<Invoice>, ApiError> {
            Ok(Vec::new())
        }

        async fn list_by_worker(&self, _company_worker_id: Uuid) -> Result<Vec<Invoice>, ApiError> {
            Ok(Vec::new())
        }

        async fn approve(&self, _id: Uuid) -> Result<Option<Invoice>, ApiError> {
            Ok(None)
        }

        async fn reject(&self, _id: Uuid) -> Result<Option<Invoice>, ApiError> {
            Ok(None)
        }

        async fn mark_paid(&self, _id: Uuid) -> Result<Option<Invoice>, ApiError> {
            Ok(None)
        }
    }

    fn contractor(pay_rate_type: PayRateType, pay_rate_in_subunits: i64) -> Contractor {
        Contractor {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            company_role_id: Uuid::new_v4(),
            pay_rate_type,
            pay_rate_in_subunits,
            started_at: Utc::now(),
            ended_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn allocation(worker_id: Uuid, equity_percentage: i32, locked: bool) -> EquityAllocation {
        EquityAllocation {
            id: Uuid::new_v4(),
            company_worker_id: worker_id,
            year: 2026,
            equity_percentage,
            locked,
            status: if locked {
                AllocationStatus::Approved
            } else {
                AllocationStatus::Pending
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(
        contractor: Contractor,
        allocation: Option<EquityAllocation>,
    ) -> (InvoiceService, Arc<MockInvoiceRepository>) {
        let invoices = Arc::new(MockInvoiceRepository::default());
        let service = InvoiceService::new(
            invoices.clone(),
            Arc::new(MockContractorRepository::with(contractor)),
            Arc::new(MockAllocationRepository { allocation }),
        );
        (service, invoices)
    }

    fn request(worker_id: Uuid) -> InvoiceCreate {
        InvoiceCreate {
            company_worker_id: worker_id,
            invoice_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            total_minutes: Some(205),
            total_amount_in_usd_cents: None,
            description: Some("March work".to_string()),
            confirm_equity_allocation: false,
        }
    }

    #[tokio::test]
    async fn test_hourly_invoice_with_locked_allocation() {
        let worker = contractor(PayRateType::Hourly, 6000);
        let worker_id = worker.id;
        let (service, invoices) =
            service(worker, Some(allocation(worker_id, 20, true)));

        let invoice = service.create_invoice(&request(worker_id)).await.unwrap();

        assert_eq!(invoice.total_amount_in_usd_cents, 20500);
        assert_eq!(invoice.equity_amount_in_cents, 4100);
        assert_eq!(invoice.cash_amount_in_cents, 16400);
        assert_eq!(invoice.equity_percentage, 20);

        // Locked allocations are observed, never re-locked
        let created = invoices.created.lock().unwrap();
        assert!(created[0].1.is_none());
    }

    #[tokio::test]
    async fn test_unlocked_allocation_requires_confirmation() {
        let worker = contractor(PayRateType::Hourly, 6000);
        let worker_id = worker.id;
        let (service, invoices) =
            service(worker, Some(allocation(worker_id, 20, false)));

        let err = service.create_invoice(&request(worker_id)).await.unwrap_err();

        assert!(matches!(err, ApiError::Conflict(_)));
        assert!(err.to_string().contains("20%"));
        assert!(invoices.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_submission_locks_the_allocation() {
        let worker = contractor(PayRateType::Hourly, 6000);
        let worker_id = worker.id;
        let (service, invoices) =
            service(worker, Some(allocation(worker_id, 20, false)));

        let mut req = request(worker_id);
        req.confirm_equity_allocation = true;

        let invoice = service.create_invoice(&req).await.unwrap();
        assert_eq!(invoice.equity_amount_in_cents, 4100);

        let created = invoices.created.lock().unwrap();
        let lock = created[0].1.expect("confirmed submission must request the lock");
        assert_eq!(lock.company_worker_id, worker_id);
        assert_eq!(lock.year, 2026);
    }

    #[tokio::test]
    async fn test_no_allocation_is_full_cash() {
        let worker = contractor(PayRateType::Hourly, 6000);
        let worker_id = worker.id;
        let (service, invoices) = service(worker, None);

        let invoice = service.create_invoice(&request(worker_id)).await.unwrap();

        assert_eq!(invoice.equity_percentage, 0);
        assert_eq!(invoice.equity_amount_in_cents, 0);
        assert_eq!(invoice.cash_amount_in_cents, 20500);
        assert!(invoices.created.lock().unwrap()[0].1.is_none());
    }

    #[tokio::test]
    async fn test_project_based_invoice_uses_flat_amount() {
        let worker = contractor(PayRateType::ProjectBased, 0);
        let worker_id = worker.id;
        let (service, _invoices) =
            service(worker, Some(allocation(worker_id, 50, true)));

        let mut req = request(worker_id);
        req.total_minutes = None;
        req.total_amount_in_usd_cents = Some(100_000);

        let invoice = service.create_invoice(&req).await.unwrap();

        assert_eq!(invoice.total_amount_in_usd_cents, 100_000);
        assert_eq!(invoice.equity_amount_in_cents, 50_000);
        assert_eq!(invoice.cash_amount_in_cents, 50_000);
        assert_eq!(invoice.total_minutes, None);
    }

    #[tokio::test]
    async fn test_hourly_invoice_requires_minutes() {
        let worker = contractor(PayRateType::Hourly, 6000);
        let worker_id = worker.id;
        let (service, _invoices) = service(worker, None);

        let mut req = request(worker_id);
        req.total_minutes = None;

        let err = service.create_invoice(&req).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_salaried_contractor_cannot_invoice() {
        let worker = contractor(PayRateType::Salary, 10_000_000);
        let worker_id = worker.id;
        let (service, _invoices) = service(worker, None);

        let err = service.create_invoice(&request(worker_id)).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_contractor_is_not_found() {
        let worker = contractor(PayRateType::Hourly, 6000);
        let (service, _invoices) = service(worker, None);

        let err = service
            .create_invoice(&request(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_negative_project_amount_is_rejected() {
        let worker = contractor(PayRateType::ProjectBased, 0);
        let worker_id = worker.id;
        let (service, _invoices) = service(worker, None);

        let mut req = request(worker_id);
        req.total_minutes = None;
        req.total_amount_in_usd_cents = Some(-500);

        let err = service.create_invoice(&req).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_corrupt_allocation_percentage_is_internal() {
        let worker = contractor(PayRateType::Hourly, 6000);
        let worker_id = worker.id;
        let (service, _invoices) =
            service(worker, Some(allocation(worker_id, 250, true)));

        let err = service.create_invoice(&request(worker_id)).await.unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
