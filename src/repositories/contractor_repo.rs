use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{Contractor, ContractorCreate},
};

const CONTRACTOR_COLUMNS: &str = "id, company_id, company_role_id, pay_rate_type, \
     pay_rate_in_subunits, started_at, ended_at, created_at, updated_at";

#[async_trait]
pub trait ContractorRepository: Send + Sync {
    async fn create(&self, contractor: &ContractorCreate) -> Result<Contractor, ApiError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Contractor>, ApiError>;
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Contractor>, ApiError>;
    async fn end_contract(
        &self,
        id: Uuid,
        ended_at: DateTime<Utc>,
    ) -> Result<Option<Contractor>, ApiError>;
}

pub struct SqlxContractorRepository {
    pool: PgPool,
}

impl SqlxContractorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContractorRepository for SqlxContractorRepository {
    async fn create(&self, contractor: &ContractorCreate) -> Result<Contractor, ApiError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let row = sqlx::query_as::<_, Contractor>(&format!(
            r#"
            INSERT INTO company_workers
                (id, company_id, company_role_id, pay_rate_type, pay_rate_in_subunits,
                 started_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {CONTRACTOR_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(contractor.company_id)
        .bind(contractor.company_role_id)
        .bind(contractor.pay_rate_type)
        .bind(contractor.pay_rate_in_subunits)
        .bind(contractor.started_at)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Contractor>, ApiError> {
        let row = sqlx::query_as::<_, Contractor>(&format!(
            "SELECT {CONTRACTOR_COLUMNS} FROM company_workers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Contractor>, ApiError> {
        let rows = sqlx::query_as::<_, Contractor>(&format!(
            "SELECT {CONTRACTOR_COLUMNS} FROM company_workers
             WHERE company_id = $1 ORDER BY started_at"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn end_contract(
        &self,
        id: Uuid,
        ended_at: DateTime<Utc>,
    ) -> Result<Option<Contractor>, ApiError> {
        let row = sqlx::query_as::<_, Contractor>(&format!(
            r#"
            UPDATE company_workers
            SET ended_at = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {CONTRACTOR_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(ended_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
