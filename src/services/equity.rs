use serde::Serialize;

/// Invoice cash/equity split arithmetic.
///
/// All amounts are integer USD cents. Rounding is half-up on the equity
/// component; the cash component is the remainder, so the two always sum
/// exactly to the billed total and no cent is lost to rounding drift.
///
/// # Example
///
/// ```rust
/// use equipay_backend::services::equity;
///
/// // 3h25m at $60/hr with a 20% equity allocation
/// let total = equity::hourly_total_cents(205, 6000).unwrap();
/// let split = equity::split_total(total, 20).unwrap();
///
/// assert_eq!(total, 20500);
/// assert_eq!(split.equity_amount_in_cents, 4100);
/// assert_eq!(split.cash_amount_in_cents, 16400);
/// ```
use crate::models::EquityAllocation;

/// Computed cash/equity components of an invoice total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvoiceSplit {
    pub total_amount_in_usd_cents: i64,
    pub equity_percentage: i32,
    pub equity_amount_in_cents: i64,
    pub cash_amount_in_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EquityComputeError {
    #[error("Invoice total cannot be negative, got {0} cents")]
    NegativeTotal(i64),

    #[error("Invoice minutes cannot be negative, got {0}")]
    NegativeMinutes(i32),

    #[error("Hourly pay rate cannot be negative, got {0} subunits")]
    NegativeRate(i64),

    /// Stored allocations are constrained to 0..=100; anything else is a
    /// data-integrity fault and is surfaced rather than clamped.
    #[error("Equity percentage {0} is outside the valid range 0..=100")]
    PercentageOutOfRange(i32),
}

/// Billed total for an hourly invoice: minutes x hourly rate / 60, rounded
/// half-up to the nearest cent.
pub fn hourly_total_cents(
    total_minutes: i32,
    pay_rate_in_subunits: i64,
) -> Result<i64, EquityComputeError> {
    if total_minutes < 0 {
        return Err(EquityComputeError::NegativeMinutes(total_minutes));
    }
    if pay_rate_in_subunits < 0 {
        return Err(EquityComputeError::NegativeRate(pay_rate_in_subunits));
    }

    let product = total_minutes as i128 * pay_rate_in_subunits as i128;
    Ok(((product + 30) / 60) as i64)
}

/// Split a billed total into equity and cash components.
///
/// `equity = round_half_up(total x pct / 100)`, `cash = total - equity`.
pub fn split_total(
    total_amount_in_usd_cents: i64,
    equity_percentage: i32,
) -> Result<InvoiceSplit, EquityComputeError> {
    if total_amount_in_usd_cents < 0 {
        return Err(EquityComputeError::NegativeTotal(total_amount_in_usd_cents));
    }
    if !(0..=100).contains(&equity_percentage) {
        return Err(EquityComputeError::PercentageOutOfRange(equity_percentage));
    }

    let equity_amount_in_cents =
        ((total_amount_in_usd_cents as i128 * equity_percentage as i128 + 50) / 100) as i64;
    let cash_amount_in_cents = total_amount_in_usd_cents - equity_amount_in_cents;

    Ok(InvoiceSplit {
        total_amount_in_usd_cents,
        equity_percentage,
        equity_amount_in_cents,
        cash_amount_in_cents,
    })
}

/// Split a billed total against a contractor's allocation for the invoice
/// year. No allocation means the invoice is paid entirely in cash.
pub fn split_for_allocation(
    total_amount_in_usd_cents: i64,
    allocation: Option<&EquityAllocation>,
) -> Result<InvoiceSplit, EquityComputeError> {
    let equity_percentage = allocation.map(|a| a.equity_percentage).unwrap_or(0);
    split_total(total_amount_in_usd_cents, equity_percentage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AllocationStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn allocation(equity_percentage: i32) -> EquityAllocation {
        EquityAllocation {
            id: Uuid::new_v4(),
            company_worker_id: Uuid::new_v4(),
            year: 2026,
            equity_percentage,
            locked: true,
            status: AllocationStatus::Approved,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_hourly_invoice_three_hours_twenty_five_minutes() {
        // 3h25m at $60/hr
        let total = hourly_total_cents(205, 6000).unwrap();
        assert_eq!(total, 20500);

        let split = split_total(total, 20).unwrap();
        assert_eq!(split.equity_amount_in_cents, 4100);
        assert_eq!(split.cash_amount_in_cents, 16400);
    }

    #[test]
    fn test_hourly_invoice_hundred_hours() {
        // 100 hours at $60/hr with a 20% lock
        let total = hourly_total_cents(6000, 6000).unwrap();
        assert_eq!(total, 600_000);

        let split = split_total(total, 20).unwrap();
        assert_eq!(split.equity_amount_in_cents, 120_000);
        assert_eq!(split.cash_amount_in_cents, 480_000);
    }

    #[test]
    fn test_project_invoice_even_split() {
        // $1,000 project invoice with a 50% lock
        let split = split_total(100_000, 50).unwrap();
        assert_eq!(split.equity_amount_in_cents, 50_000);
        assert_eq!(split.cash_amount_in_cents, 50_000);
    }

    #[test]
    fn test_no_allocation_means_full_cash() {
        let split = split_for_allocation(20500, None).unwrap();
        assert_eq!(split.equity_percentage, 0);
        assert_eq!(split.equity_amount_in_cents, 0);
        assert_eq!(split.cash_amount_in_cents, 20500);
    }

    #[test]
    fn test_allocation_percentage_is_applied() {
        let alloc = allocation(25);
        let split = split_for_allocation(10_000, Some(&alloc)).unwrap();
        assert_eq!(split.equity_percentage, 25);
        assert_eq!(split.equity_amount_in_cents, 2500);
        assert_eq!(split.cash_amount_in_cents, 7500);
    }

    #[test]
    fn test_half_up_rounding_on_equity() {
        // 50% of 101 cents is 50.5; the equity side rounds up
        let split = split_total(101, 50).unwrap();
        assert_eq!(split.equity_amount_in_cents, 51);
        assert_eq!(split.cash_amount_in_cents, 50);

        // 1% of 50 cents is exactly half a cent
        let split = split_total(50, 1).unwrap();
        assert_eq!(split.equity_amount_in_cents, 1);
        assert_eq!(split.cash_amount_in_cents, 49);

        // below the half-cent threshold rounds down
        let split = split_total(49, 1).unwrap();
        assert_eq!(split.equity_amount_in_cents, 0);
        assert_eq!(split.cash_amount_in_cents, 49);
    }

    #[test]
    fn test_hourly_total_rounds_half_up() {
        // 30 minutes at 1 subunit/hr is exactly half a cent
        assert_eq!(hourly_total_cents(30, 1).unwrap(), 1);
        // 29 minutes stays below the threshold
        assert_eq!(hourly_total_cents(29, 1).unwrap(), 0);
        // 1 minute at $60/hr is exactly one dollar
        assert_eq!(hourly_total_cents(1, 6000).unwrap(), 100);
    }

    #[test]
    fn test_split_components_always_sum_to_total() {
        let totals = [0_i64, 1, 7, 49, 99, 101, 12_345, 20_500, 600_000, 999_999];

        for pct in 0..=100 {
            for &total in &totals {
                let split = split_total(total, pct).unwrap();
                assert_eq!(
                    split.cash_amount_in_cents + split.equity_amount_in_cents,
                    total,
                    "split of {total} at {pct}% must sum back to the total"
                );
                assert!(split.equity_amount_in_cents >= 0);
                assert!(split.cash_amount_in_cents >= 0);
            }
        }
    }

    #[test]
    fn test_full_equity_percentage() {
        let split = split_total(12_345, 100).unwrap();
        assert_eq!(split.equity_amount_in_cents, 12_345);
        assert_eq!(split.cash_amount_in_cents, 0);
    }

    #[test]
    fn test_zero_total_splits_to_zero() {
        let split = split_total(0, 80).unwrap();
        assert_eq!(split.equity_amount_in_cents, 0);
        assert_eq!(split.cash_amount_in_cents, 0);
    }

    #[test]
    fn test_negative_total_is_rejected() {
        assert_eq!(
            split_total(-1, 20),
            Err(EquityComputeError::NegativeTotal(-1))
        );
    }

    #[test]
    fn test_out_of_range_percentage_is_rejected() {
        assert_eq!(
            split_total(1000, -1),
            Err(EquityComputeError::PercentageOutOfRange(-1))
        );
        assert_eq!(
            split_total(1000, 101),
            Err(EquityComputeError::PercentageOutOfRange(101))
        );
    }

    #[test]
    fn test_negative_hourly_inputs_are_rejected() {
        assert_eq!(
            hourly_total_cents(-10, 6000),
            Err(EquityComputeError::NegativeMinutes(-10))
        );
        assert_eq!(
            hourly_total_cents(10, -1),
            Err(EquityComputeError::NegativeRate(-1))
        );
    }
}
