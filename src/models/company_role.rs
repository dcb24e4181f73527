use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "pay_rate_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PayRateType {
    Hourly,
    ProjectBased,
    Salary,
}

impl std::fmt::Display for PayRateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayRateType::Hourly => write!(f, "hourly"),
            PayRateType::ProjectBased => write!(f, "project_based"),
            PayRateType::Salary => write!(f, "salary"),
        }
    }
}

/// A compensation record for a role. The current rate of a role is the
/// `company_role_rates` row with the greatest id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleRate {
    pub id: i64,
    pub company_role_id: Uuid,
    pub pay_rate_type: PayRateType,
    pub pay_rate_in_subunits: i64,
    pub trial_pay_rate_in_subunits: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A role a company hires contractors into, together with its current rate.
///
/// Rate attributes are exposed through explicit forwarding accessors; a role
/// without a rate is unrepresentable here since the repository join requires
/// one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRole {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub trial_enabled: bool,
    pub actively_hiring: bool,
    pub expense_card_spending_limit_cents: i64,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rate: RoleRate,
}

impl CompanyRole {
    pub fn pay_rate_type(&self) -> PayRateType {
        self.rate.pay_rate_type
    }

    pub fn pay_rate_in_subunits(&self) -> i64 {
        self.rate.pay_rate_in_subunits
    }

    pub fn trial_pay_rate_in_subunits(&self) -> Option<i64> {
        self.rate.trial_pay_rate_in_subunits
    }

    pub fn hourly(&self) -> bool {
        self.rate.pay_rate_type == PayRateType::Hourly
    }

    pub fn project_based(&self) -> bool {
        self.rate.pay_rate_type == PayRateType::ProjectBased
    }

    pub fn salary(&self) -> bool {
        self.rate.pay_rate_type == PayRateType::Salary
    }

    pub fn expense_card_has_limit(&self) -> bool {
        self.expense_card_spending_limit_cents > 0
    }
}

/// Flat row returned by the role + current-rate join.
#[derive(Debug, Clone, FromRow)]
pub struct CompanyRoleRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub trial_enabled: bool,
    pub actively_hiring: bool,
    pub expense_card_spending_limit_cents: i64,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rate_id: i64,
    pub pay_rate_type: PayRateType,
    pub pay_rate_in_subunits: i64,
    pub trial_pay_rate_in_subunits: Option<i64>,
    pub rate_created_at: DateTime<Utc>,
}

impl From<CompanyRoleRow> for CompanyRole {
    fn from(row: CompanyRoleRow) -> Self {
        Self {
            id: row.id,
            company_id: row.company_id,
            name: row.name,
            trial_enabled: row.trial_enabled,
            actively_hiring: row.actively_hiring,
            expense_card_spending_limit_cents: row.expense_card_spending_limit_cents,
            deleted_at: row.deleted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            rate: RoleRate {
                id: row.rate_id,
                company_role_id: row.id,
                pay_rate_type: row.pay_rate_type,
                pay_rate_in_subunits: row.pay_rate_in_subunits,
                trial_pay_rate_in_subunits: row.trial_pay_rate_in_subunits,
                created_at: row.rate_created_at,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateChange {
    pub pay_rate_type: PayRateType,
    pub pay_rate_in_subunits: i64,
    pub trial_pay_rate_in_subunits: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanyRoleCreate {
    pub company_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub trial_enabled: bool,
    #[serde(default)]
    pub actively_hiring: bool,
    #[serde(default)]
    pub expense_card_spending_limit_cents: i64,
    pub rate: RateChange,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyRoleUpdate {
    pub name: Option<String>,
    pub trial_enabled: Option<bool>,
    pub actively_hiring: Option<bool>,
    pub expense_card_spending_limit_cents: Option<i64>,
    /// When present, appended as the new current rate of the role.
    pub rate: Option<RateChange>,
}
