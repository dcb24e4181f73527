use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::ApiError, models::EquityGrant};

#[async_trait]
pub trait EquityGrantRepository: Send + Sync {
    async fn list_by_worker(&self, company_worker_id: Uuid) -> Result<Vec<EquityGrant>, ApiError>;
}

pub struct SqlxEquityGrantRepository {
    pool: PgPool,
}

impl SqlxEquityGrantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquityGrantRepository for SqlxEquityGrantRepository {
    async fn list_by_worker(&self, company_worker_id: Uuid) -> Result<Vec<EquityGrant>, ApiError> {
        let rows = sqlx::query_as::<_, EquityGrant>(
            r#"
            SELECT id, company_worker_id, year, number_of_shares,
                   share_price_in_usd_cents, created_at
            FROM equity_grants
            WHERE company_worker_id = $1
            ORDER BY year, created_at
            "#,
        )
        .bind(company_worker_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
