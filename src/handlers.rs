pub mod auth;
pub mod billing;
pub mod contracts;
pub mod crm;
pub mod rbac;
pub mod tenants;
pub mod units;
