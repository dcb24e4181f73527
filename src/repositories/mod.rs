pub mod company_repo;
pub mod company_role_repo;
pub mod contractor_repo;
pub mod equity_allocation_repo;
pub mod equity_grant_repo;
pub mod invoice_repo;

pub use company_repo::CompanyRepository;
pub use company_role_repo::CompanyRoleRepository;
pub use contractor_repo::ContractorRepository;
pub use equity_allocation_repo::EquityAllocationRepository;
pub use equity_grant_repo::EquityGrantRepository;
pub use invoice_repo::{AllocationLock, InvoiceRepository};
