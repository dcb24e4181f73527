pub mod equity;
pub mod invoice_service;
pub mod role_rules;
pub mod role_service;

// Re-export commonly used types
pub use invoice_service::InvoiceService;
pub use role_service::RoleService;
