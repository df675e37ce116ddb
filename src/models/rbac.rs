// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;

// Cargos autorizados a escrever contratos (e a converter leads, que cria contrato).
pub const CONTRACT_WRITER_ROLES: &[&str] = &["admin", "admin_corporativo", "gerente"];

/// Capacidade fechada do módulo de faturamento.
///
/// Na API os tokens trafegam como strings no formato `{domain}.{verb}_{model}`
/// (ex: `billing.add_invoiceitem`), mas internamente usamos o enum: um token
/// digitado errado não compila / não parseia.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewInvoice,
    AddInvoice,
    ChangeInvoice,
    DeleteInvoice,
    AddInvoiceItem,
    ChangeInvoiceItem,
    DeleteInvoiceItem,
    RecordPayment,
    VoidInvoice,
    DownloadInvoice,
}

impl Capability {
    pub const ALL: &'static [Capability] = &[
        Capability::ViewInvoice,
        Capability::AddInvoice,
        Capability::ChangeInvoice,
        Capability::DeleteInvoice,
        Capability::AddInvoiceItem,
        Capability::ChangeInvoiceItem,
        Capability::DeleteInvoiceItem,
        Capability::RecordPayment,
        Capability::VoidInvoice,
        Capability::DownloadInvoice,
    ];

    /// Token de transporte, exatamente como gravado em `role_permissions.permission_slug`.
    pub fn slug(&self) -> &'static str {
        match self {
            Capability::ViewInvoice => "billing.view_invoice",
            Capability::AddInvoice => "billing.add_invoice",
            Capability::ChangeInvoice => "billing.change_invoice",
            Capability::DeleteInvoice => "billing.delete_invoice",
            Capability::AddInvoiceItem => "billing.add_invoiceitem",
            Capability::ChangeInvoiceItem => "billing.change_invoiceitem",
            Capability::DeleteInvoiceItem => "billing.delete_invoiceitem",
            Capability::RecordPayment => "billing.record_payment",
            Capability::VoidInvoice => "billing.void_invoice",
            Capability::DownloadInvoice => "billing.download_invoice",
        }
    }

    /// Parse estrito: token desconhecido vira `None`, nunca um fallback silencioso.
    pub fn from_slug(slug: &str) -> Option<Capability> {
        Capability::ALL.iter().copied().find(|c| c.slug() == slug)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Capability::ViewInvoice => "Visualizar faturas",
            Capability::AddInvoice => "Criar faturas",
            Capability::ChangeInvoice => "Alterar faturas",
            Capability::DeleteInvoice => "Excluir faturas em rascunho",
            Capability::AddInvoiceItem => "Adicionar itens à fatura",
            Capability::ChangeInvoiceItem => "Alterar itens da fatura",
            Capability::DeleteInvoiceItem => "Remover itens da fatura",
            Capability::RecordPayment => "Registrar pagamentos",
            Capability::VoidInvoice => "Cancelar faturas",
            Capability::DownloadInvoice => "Baixar o PDF da fatura",
        }
    }
}

/// O ator explícito da requisição: cargos + capacidades efetivas, carregados
/// uma única vez no login da requisição. Nenhuma verificação posterior consulta
/// estado ambiente ou banco; tudo é função pura sobre este valor.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Uuid,
    pub roles: Vec<String>,
    pub capabilities: HashSet<Capability>,
}

impl Actor {
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn has_any_role(&self, allowed: &[&str]) -> bool {
        self.roles.iter().any(|r| allowed.contains(&r.as_str()))
    }

    pub fn is_contract_writer(&self) -> bool {
        self.has_any_role(CONTRACT_WRITER_ROLES)
    }
}

// --- Catálogo / gestão de cargos ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionEntry {
    #[schema(example = "billing.record_payment")]
    pub slug: &'static str,
    #[schema(example = "Registrar pagamentos")]
    pub description: &'static str,
    #[schema(example = "BILLING")]
    pub module: &'static str,
}

impl PermissionEntry {
    /// O catálogo sai do enum, não do banco: é impossível listar um token que
    /// o código não reconheça.
    pub fn catalog() -> Vec<PermissionEntry> {
        Capability::ALL
            .iter()
            .map(|c| PermissionEntry {
                slug: c.slug(),
                description: c.description(),
                module: "BILLING",
            })
            .collect()
    }
}

// O Payload para criar/atualizar um cargo
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRolePayload {
    #[schema(example = "operador_financeiro")]
    pub slug: String,

    #[schema(example = json!(["billing.view_invoice", "billing.record_payment"]))]
    pub permissions: Vec<String>, // Slugs das permissões
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    #[schema(example = "operador_financeiro")]
    pub slug: String,
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor_with(roles: &[&str], caps: &[Capability]) -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            capabilities: caps.iter().copied().collect(),
        }
    }

    #[test]
    fn slug_faz_ida_e_volta_para_todas_as_capacidades() {
        for cap in Capability::ALL {
            assert_eq!(Capability::from_slug(cap.slug()), Some(*cap));
        }
    }

    #[test]
    fn token_desconhecido_e_rejeitado() {
        assert_eq!(Capability::from_slug("billing.recordpayment"), None);
        assert_eq!(Capability::from_slug("billing.record_paymnet"), None);
        assert_eq!(Capability::from_slug(""), None);
    }

    #[test]
    fn verificacao_de_capacidade_e_pura() {
        let actor = actor_with(&[], &[Capability::RecordPayment]);
        assert!(actor.has_capability(Capability::RecordPayment));
        assert!(!actor.has_capability(Capability::VoidInvoice));
    }

    #[test]
    fn conjunto_de_cargos_para_contratos() {
        let gerente = actor_with(&["gerente"], &[]);
        let vendedor = actor_with(&["vendedor"], &[]);
        assert!(gerente.is_contract_writer());
        assert!(!vendedor.is_contract_writer());
        assert!(!actor_with(&[], &[]).is_contract_writer());
    }
}
