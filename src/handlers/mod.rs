pub mod company_handlers;
pub mod company_role_handlers;
pub mod contractor_handlers;
pub mod equity_handlers;
pub mod health_handlers;
pub mod invoice_handlers;

pub use health_handlers::{health_check, liveness_check};
