// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services::conversion_service::ConversionResult;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- RBAC ---
        handlers::rbac::list_permissions,
        handlers::rbac::create_role,

        // --- CRM ---
        handlers::crm::create_lead,
        handlers::crm::list_leads,
        handlers::crm::get_lead,
        handlers::crm::update_lead,
        handlers::crm::delete_lead,
        handlers::crm::convert_lead,

        // --- Clientes ---
        handlers::tenants::create_tenant,
        handlers::tenants::list_tenants,
        handlers::tenants::get_tenant,
        handlers::tenants::update_tenant,
        handlers::tenants::delete_tenant,

        // --- Boxes ---
        handlers::units::create_unit,
        handlers::units::list_units,
        handlers::units::get_unit,
        handlers::units::update_unit,
        handlers::units::delete_unit,

        // --- Contratos ---
        handlers::contracts::create_contract,
        handlers::contracts::list_contracts,
        handlers::contracts::get_contract,
        handlers::contracts::update_contract,
        handlers::contracts::delete_contract,

        // --- Faturamento ---
        handlers::billing::create_invoice,
        handlers::billing::list_invoices,
        handlers::billing::get_invoice,
        handlers::billing::update_invoice,
        handlers::billing::delete_invoice,
        handlers::billing::void_invoice,
        handlers::billing::mark_overdue,
        handlers::billing::download_invoice,
        handlers::billing::add_invoice_item,
        handlers::billing::update_invoice_item,
        handlers::billing::delete_invoice_item,
        handlers::billing::record_payment,
    ),
    components(
        schemas(
            models::auth::RegisterPayload,
            models::auth::LoginPayload,
            models::auth::LoginResponse,
            models::auth::MeResponse,
            models::rbac::PermissionEntry,
            models::rbac::CreateRolePayload,
            models::rbac::RoleResponse,
            models::crm::Lead,
            models::crm::LeadStage,
            models::tenants::Tenant,
            models::tenants::CustomerCategory,
            models::units::Unit,
            models::units::UnitStatus,
            models::contracts::Contract,
            models::contracts::ContractStatus,
            models::billing::Invoice,
            models::billing::InvoiceDetail,
            models::billing::InvoiceItem,
            models::billing::InvoiceStatus,
            models::billing::Payment,
            models::billing::PaymentMethod,
            models::billing::PaymentStatus,
            handlers::crm::CreateLeadPayload,
            handlers::crm::UpdateLeadPayload,
            handlers::crm::ConvertLeadPayload,
            handlers::crm::ConvertTenantPayload,
            handlers::crm::ConvertContractPayload,
            handlers::tenants::TenantPayload,
            handlers::units::CreateUnitPayload,
            handlers::units::UpdateUnitPayload,
            handlers::contracts::CreateContractPayload,
            handlers::contracts::UpdateContractPayload,
            handlers::billing::CreateInvoicePayload,
            handlers::billing::UpdateInvoicePayload,
            handlers::billing::VoidInvoicePayload,
            handlers::billing::InvoiceItemPayload,
            handlers::billing::RecordPaymentPayload,
            ConversionResult,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Autenticação e sessão"),
        (name = "RBAC", description = "Cargos e permissões"),
        (name = "CRM", description = "Leads e conversão"),
        (name = "Clientes", description = "Locatários"),
        (name = "Boxes", description = "Unidades de armazenamento"),
        (name = "Contratos", description = "Ciclo de vida dos contratos"),
        (name = "Faturamento", description = "Faturas, itens e pagamentos"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
