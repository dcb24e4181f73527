use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CompanyRole, CompanyRoleCreate, CompanyRoleRow, CompanyRoleUpdate, RateChange},
};

/// Columns of the role + current-rate join; the lateral subquery picks the
/// rate row with the greatest id.
const ROLE_WITH_RATE: &str = r#"
    SELECT r.id, r.company_id, r.name, r.trial_enabled, r.actively_hiring,
           r.expense_card_spending_limit_cents, r.deleted_at, r.created_at, r.updated_at,
           cr.id AS rate_id, cr.pay_rate_type, cr.pay_rate_in_subunits,
           cr.trial_pay_rate_in_subunits, cr.created_at AS rate_created_at
    FROM company_roles r
    JOIN LATERAL (
        SELECT id, pay_rate_type, pay_rate_in_subunits, trial_pay_rate_in_subunits, created_at
        FROM company_role_rates
        WHERE company_role_id = r.id
        ORDER BY id DESC
        LIMIT 1
    ) cr ON TRUE
"#;

#[async_trait]
pub trait CompanyRoleRepository: Send + Sync {
    async fn create(&self, role: &CompanyRoleCreate) -> Result<CompanyRole, ApiError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<CompanyRole>, ApiError>;
    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<CompanyRole>, ApiError>;
    async fn list_actively_hiring(&self, company_id: Uuid) -> Result<Vec<CompanyRole>, ApiError>;
    async fn update(
        &self,
        id: Uuid,
        update: &CompanyRoleUpdate,
    ) -> Result<Option<CompanyRole>, ApiError>;
    async fn soft_delete(&self, id: Uuid) -> Result<bool, ApiError>;
    async fn count_active_contractors(&self, role_id: Uuid) -> Result<i64, ApiError>;
}

pub struct SqlxCompanyRoleRepository {
    pool: PgPool,
}

impl SqlxCompanyRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_rate(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        role_id: Uuid,
        rate: &RateChange,
    ) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            INSERT INTO company_role_rates
                (company_role_id, pay_rate_type, pay_rate_in_subunits, trial_pay_rate_in_subunits)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(role_id)
        .bind(rate.pay_rate_type)
        .bind(rate.pay_rate_in_subunits)
        .bind(rate.trial_pay_rate_in_subunits)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CompanyRoleRepository for SqlxCompanyRoleRepository {
    async fn create(&self, role: &CompanyRoleCreate) -> Result<CompanyRole, ApiError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        // Role and its initial rate are written in one transaction; a role
        // without a rate must never be observable.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO company_roles
                (id, company_id, name, trial_enabled, actively_hiring,
                 expense_card_spending_limit_cents, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            "#,
        )
        .bind(id)
        .bind(role.company_id)
        .bind(&role.name)
        .bind(role.trial_enabled)
        .bind(role.actively_hiring)
        .bind(role.expense_card_spending_limit_cents)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        Self::insert_rate(&mut tx, id, &role.rate).await?;

        let row = sqlx::query_as::<_, CompanyRoleRow>(&format!("{ROLE_WITH_RATE} WHERE r.id = $1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<CompanyRole>, ApiError> {
        let row = sqlx::query_as::<_, CompanyRoleRow>(&format!("{ROLE_WITH_RATE} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<CompanyRole>, ApiError> {
        let rows = sqlx::query_as::<_, CompanyRoleRow>(&format!(
            "{ROLE_WITH_RATE} WHERE r.company_id = $1 AND r.deleted_at IS NULL ORDER BY r.created_at"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_actively_hiring(&self, company_id: Uuid) -> Result<Vec<CompanyRole>, ApiError> {
        let rows = sqlx::query_as::<_, CompanyRoleRow>(&format!(
            "{ROLE_WITH_RATE}
             WHERE r.company_id = $1 AND r.actively_hiring AND r.deleted_at IS NULL
             ORDER BY r.created_at"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        update: &CompanyRoleUpdate,
    ) -> Result<Option<CompanyRole>, ApiError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE company_roles
            SET name = COALESCE($2, name),
                trial_enabled = COALESCE($3, trial_enabled),
                actively_hiring = COALESCE($4, actively_hiring),
                expense_card_spending_limit_cents = COALESCE($5, expense_card_spending_limit_cents),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(update.trial_enabled)
        .bind(update.actively_hiring)
        .bind(update.expense_card_spending_limit_cents)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(rate) = &update.rate {
            Self::insert_rate(&mut tx, id, rate).await?;
        }

        let row = sqlx::query_as::<_, CompanyRoleRow>(&format!("{ROLE_WITH_RATE} WHERE r.id = $1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(row.into()))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE company_roles SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_active_contractors(&self, role_id: Uuid) -> Result<i64, ApiError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM company_workers
            WHERE company_role_id = $1
              AND (ended_at IS NULL OR ended_at > NOW())
            "#,
        )
        .bind(role_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
