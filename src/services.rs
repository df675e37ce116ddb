pub mod auth;
pub mod billing_service;
pub mod contract_service;
pub mod conversion_service;
pub mod crm_service;
pub mod document_service;
pub mod tenant_service;
pub mod unit_service;
