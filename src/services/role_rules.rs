use crate::models::PayRateType;

/// Eligibility rules for company roles.
///
/// These are precondition checks invoked before a save or a soft delete; the
/// messages are user-facing and attached to the rejected record verbatim.

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoleRuleViolation {
    #[error("Can only set trials with hourly contracts")]
    TrialRequiresHourly,

    #[error("Cannot delete role with active contractors")]
    ActiveContractors,
}

/// Trials are only available for hourly contracts.
pub fn check_trial_allowed(
    trial_enabled: bool,
    pay_rate_type: PayRateType,
) -> Result<(), RoleRuleViolation> {
    if trial_enabled && pay_rate_type != PayRateType::Hourly {
        return Err(RoleRuleViolation::TrialRequiresHourly);
    }
    Ok(())
}

/// A role may only be soft-deleted once every contract under it has ended.
pub fn check_deletable(active_contractors: i64) -> Result<(), RoleRuleViolation> {
    if active_contractors > 0 {
        return Err(RoleRuleViolation::ActiveContractors);
    }
    Ok(())
}
