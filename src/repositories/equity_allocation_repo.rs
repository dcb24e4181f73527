use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::ApiError, models::EquityAllocation};

const ALLOCATION_COLUMNS: &str =
    "id, company_worker_id, year, equity_percentage, locked, status, created_at, updated_at";

#[async_trait]
pub trait EquityAllocationRepository: Send + Sync {
    async fn find_by_worker_and_year(
        &self,
        company_worker_id: Uuid,
        year: i32,
    ) -> Result<Option<EquityAllocation>, ApiError>;

    /// Insert or update the election for a contractor-year. Returns `None`
    /// when the allocation is already locked and may no longer change.
    async fn elect(
        &self,
        company_worker_id: Uuid,
        year: i32,
        equity_percentage: i32,
    ) -> Result<Option<EquityAllocation>, ApiError>;
}

pub struct SqlxEquityAllocationRepository {
    pool: PgPool,
}

impl SqlxEquityAllocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquityAllocationRepository for SqlxEquityAllocationRepository {
    async fn find_by_worker_and_year(
        &self,
        company_worker_id: Uuid,
        year: i32,
    ) -> Result<Option<EquityAllocation>, ApiError> {
        let row = sqlx::query_as::<_, EquityAllocation>(&format!(
            "SELECT {ALLOCATION_COLUMNS} FROM equity_allocations
             WHERE company_worker_id = $1 AND year = $2"
        ))
        .bind(company_worker_id)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn elect(
        &self,
        company_worker_id: Uuid,
        year: i32,
        equity_percentage: i32,
    ) -> Result<Option<EquityAllocation>, ApiError> {
        // The conditional upsert leaves locked rows untouched; fetch_optional
        // then yields None and the caller reports the conflict.
        let row = sqlx::query_as::<_, EquityAllocation>(&format!(
            r#"
            INSERT INTO equity_allocations
                (id, company_worker_id, year, equity_percentage, locked, status,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, FALSE, 'pending', NOW(), NOW())
            ON CONFLICT (company_worker_id, year)
            DO UPDATE SET equity_percentage = EXCLUDED.equity_percentage,
                          updated_at = NOW()
            WHERE equity_allocations.locked = FALSE
            RETURNING {ALLOCATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(company_worker_id)
        .bind(year)
        .bind(equity_percentage)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
