use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "invoice_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Received,
    Approved,
    Rejected,
    Paid,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Received => write!(f, "received"),
            InvoiceStatus::Approved => write!(f, "approved"),
            InvoiceStatus::Rejected => write!(f, "rejected"),
            InvoiceStatus::Paid => write!(f, "paid"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub company_id: Uuid,
    pub company_worker_id: Uuid,
    pub invoice_date: NaiveDate,
    pub total_minutes: Option<i32>,
    pub total_amount_in_usd_cents: i64,
    pub cash_amount_in_cents: i64,
    pub equity_amount_in_cents: i64,
    pub equity_percentage: i32,
    pub description: Option<String>,
    pub status: InvoiceStatus,
    pub approvals: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully computed invoice ready for insertion.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub company_id: Uuid,
    pub company_worker_id: Uuid,
    pub invoice_date: NaiveDate,
    pub total_minutes: Option<i32>,
    pub total_amount_in_usd_cents: i64,
    pub cash_amount_in_cents: i64,
    pub equity_amount_in_cents: i64,
    pub equity_percentage: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceCreate {
    pub company_worker_id: Uuid,
    pub invoice_date: NaiveDate,
    /// Hours worked, in minutes. Required for hourly contractors.
    pub total_minutes: Option<i32>,
    /// Flat amount in cents. Required for project-based contractors.
    pub total_amount_in_usd_cents: Option<i64>,
    pub description: Option<String>,
    /// Set once the user has confirmed locking this year's equity election.
    #[serde(default)]
    pub confirm_equity_allocation: bool,
}
