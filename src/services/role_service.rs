use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CompanyRole, CompanyRoleCreate, CompanyRoleUpdate},
    repositories::CompanyRoleRepository,
    services::role_rules,
};

/// Role lifecycle orchestration: validation on save, guarded soft delete.
pub struct RoleService {
    roles: Arc<dyn CompanyRoleRepository + Send + Sync>,
}

impl RoleService {
    pub fn new(roles: Arc<dyn CompanyRoleRepository + Send + Sync>) -> Self {
        Self { roles }
    }

    pub async fn create_role(&self, create: &CompanyRoleCreate) -> Result<CompanyRole, ApiError> {
        if create.name.trim().is_empty() {
            return Err(ApiError::validation("Role name cannot be empty"));
        }
        if create.expense_card_spending_limit_cents < 0 {
            return Err(ApiError::validation(
                "Expense card spending limit cannot be negative",
            ));
        }

        role_rules::check_trial_allowed(create.trial_enabled, create.rate.pay_rate_type)
            .map_err(|e| ApiError::validation(e.to_string()))?;

        self.roles.create(create).await
    }

    pub async fn update_role(
        &self,
        id: Uuid,
        update: &CompanyRoleUpdate,
    ) -> Result<CompanyRole, ApiError> {
        let existing = self
            .roles
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Role {id} not found")))?;

        // Validate against the state the role would end up in.
        let trial_enabled = update.trial_enabled.unwrap_or(existing.trial_enabled);
        let pay_rate_type = update
            .rate
            .as_ref()
            .map(|r| r.pay_rate_type)
            .unwrap_or_else(|| existing.pay_rate_type());

        role_rules::check_trial_allowed(trial_enabled, pay_rate_type)
            .map_err(|e| ApiError::validation(e.to_string()))?;

        if let Some(limit) = update.expense_card_spending_limit_cents {
            if limit < 0 {
                return Err(ApiError::validation(
                    "Expense card spending limit cannot be negative",
                ));
            }
        }

        self.roles
            .update(id, update)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Role {id} not found")))
    }

    /// Soft-delete a role. The active-contractor precondition runs before the
    /// `deleted_at` transition; deleting an already-deleted role is a no-op.
    pub async fn delete_role(&self, id: Uuid) -> Result<(), ApiError> {
        self.roles
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Role {id} not found")))?;

        let active = self.roles.count_active_contractors(id).await?;
        role_rules::check_deletable(active).map_err(|e| ApiError::validation(e.to_string()))?;

        self.roles.soft_delete(id).await?;

        Ok(())
    }
}
