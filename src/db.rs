pub mod user_repo;
pub use user_repo::UserRepository;
pub mod rbac_repo;
pub use rbac_repo::RbacRepository;
pub mod crm_repo;
pub use crm_repo::CrmRepository;
pub mod tenant_repo;
pub use tenant_repo::TenantRepository;
pub mod unit_repo;
pub use unit_repo::UnitRepository;
pub mod contract_repo;
pub use contract_repo::ContractRepository;
pub mod billing_repo;
pub use billing_repo::BillingRepository;
