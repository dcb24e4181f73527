use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "allocation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AllocationStatus {
    Pending,
    Approved,
}

/// A contractor's elected equity percentage for one calendar year.
///
/// Locking is a one-shot transition: once `locked` is set by the first
/// confirmed invoice of the year, the percentage is immutable for that
/// contractor-year pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EquityAllocation {
    pub id: Uuid,
    pub company_worker_id: Uuid,
    pub year: i32,
    pub equity_percentage: i32,
    pub locked: bool,
    pub status: AllocationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EquityElection {
    pub equity_percentage: i32,
}

/// Shares granted against settled invoices. Share-count computation happens
/// upstream; grants are read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EquityGrant {
    pub id: Uuid,
    pub company_worker_id: Uuid,
    pub year: i32,
    pub number_of_shares: i64,
    pub share_price_in_usd_cents: i64,
    pub created_at: DateTime<Utc>,
}
