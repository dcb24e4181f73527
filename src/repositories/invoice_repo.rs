use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{Invoice, NewInvoice},
};

const INVOICE_COLUMNS: &str = "id, company_id, company_worker_id, invoice_date, total_minutes, \
     total_amount_in_usd_cents, cash_amount_in_cents, equity_amount_in_cents, \
     equity_percentage, description, status, approvals, created_at, updated_at";

/// Request to lock a contractor-year equity allocation alongside an invoice
/// insert.
#[derive(Debug, Clone, Copy)]
pub struct AllocationLock {
    pub company_worker_id: Uuid,
    pub year: i32,
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Insert a settled invoice, locking the year's equity allocation in the
    /// same transaction when requested. The lock is a compare-and-set on
    /// `locked = FALSE`; an allocation locked by an earlier invoice is left
    /// as is.
    async fn create_settled(
        &self,
        invoice: &NewInvoice,
        lock: Option<AllocationLock>,
    ) -> Result<Invoice, ApiError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Invoice>, ApiError>;
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Invoice>, ApiError>;
    async fn list_by_worker(&self, company_worker_id: Uuid) -> Result<Vec<Invoice>, ApiError>;

    /// `received|approved → approved`, incrementing the approval counter.
    async fn approve(&self, id: Uuid) -> Result<Option<Invoice>, ApiError>;
    /// `received → rejected`.
    async fn reject(&self, id: Uuid) -> Result<Option<Invoice>, ApiError>;
    /// `approved → paid`.
    async fn mark_paid(&self, id: Uuid) -> Result<Option<Invoice>, ApiError>;
}

pub struct SqlxInvoiceRepository {
    pool: PgPool,
}

impl SqlxInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for SqlxInvoiceRepository {
    async fn create_settled(
        &self,
        invoice: &NewInvoice,
        lock: Option<AllocationLock>,
    ) -> Result<Invoice, ApiError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        if let Some(lock) = lock {
            sqlx::query(
                r#"
                UPDATE equity_allocations
                SET locked = TRUE, status = 'approved', updated_at = NOW()
                WHERE company_worker_id = $1 AND year = $2 AND locked = FALSE
                "#,
            )
            .bind(lock.company_worker_id)
            .bind(lock.year)
            .execute(&mut *tx)
            .await?;
        }

        let row = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            INSERT INTO invoices
                (id, company_id, company_worker_id, invoice_date, total_minutes,
                 total_amount_in_usd_cents, cash_amount_in_cents, equity_amount_in_cents,
                 equity_percentage, description, status, approvals, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'received', 0, $11, $11)
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(invoice.company_id)
        .bind(invoice.company_worker_id)
        .bind(invoice.invoice_date)
        .bind(invoice.total_minutes)
        .bind(invoice.total_amount_in_usd_cents)
        .bind(invoice.cash_amount_in_cents)
        .bind(invoice.equity_amount_in_cents)
        .bind(invoice.equity_percentage)
        .bind(&invoice.description)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Invoice>, ApiError> {
        let row = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Invoice>, ApiError> {
        let rows = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices
             WHERE company_id = $1 ORDER BY invoice_date DESC, created_at DESC"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_worker(&self, company_worker_id: Uuid) -> Result<Vec<Invoice>, ApiError> {
        let rows = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices
             WHERE company_worker_id = $1 ORDER BY invoice_date DESC, created_at DESC"
        ))
        .bind(company_worker_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn approve(&self, id: Uuid) -> Result<Option<Invoice>, ApiError> {
        let row = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = 'approved', approvals = approvals + 1, updated_at = NOW()
            WHERE id = $1 AND status IN ('received', 'approved')
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn reject(&self, id: Uuid) -> Result<Option<Invoice>, ApiError> {
        let row = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = 'rejected', updated_at = NOW()
            WHERE id = $1 AND status = 'received'
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn mark_paid(&self, id: Uuid) -> Result<Option<Invoice>, ApiError> {
        let row = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = 'paid', updated_at = NOW()
            WHERE id = $1 AND status = 'approved'
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
