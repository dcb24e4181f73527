use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::PayRateType;

/// A contractor working for a company (`company_workers` table).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Contractor {
    pub id: Uuid,
    pub company_id: Uuid,
    pub company_role_id: Uuid,
    pub pay_rate_type: PayRateType,
    pub pay_rate_in_subunits: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contractor {
    /// A contract is active until its end date passes.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self.ended_at {
            None => true,
            Some(ended_at) => ended_at > now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractorCreate {
    pub company_id: Uuid,
    pub company_role_id: Uuid,
    pub pay_rate_type: PayRateType,
    pub pay_rate_in_subunits: i64,
    pub started_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn contractor(ended_at: Option<DateTime<Utc>>) -> Contractor {
        Contractor {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            company_role_id: Uuid::new_v4(),
            pay_rate_type: PayRateType::Hourly,
            pay_rate_in_subunits: 6000,
            started_at: Utc::now() - Duration::days(30),
            ended_at,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_ended_contract_is_active() {
        let now = Utc::now();
        assert!(contractor(None).is_active(now));
    }

    #[test]
    fn test_future_end_date_is_active() {
        let now = Utc::now();
        assert!(contractor(Some(now + Duration::days(7))).is_active(now));
    }

    #[test]
    fn test_past_end_date_is_inactive() {
        let now = Utc::now();
        assert!(!contractor(Some(now - Duration::days(1))).is_active(now));
    }
}
