// src/models/billing.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::common::status_machine::StatusMachine;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Draft,
    Issued,
    Paid,
    Overdue,
    Void,
}

impl StatusMachine for InvoiceStatus {
    // PAID e VOID são terminais. Não existe DRAFT -> PAID: a fatura
    // precisa ser emitida antes de ser quitada.
    const TRANSITIONS: &'static [(Self, Self)] = &[
        (InvoiceStatus::Draft, InvoiceStatus::Issued),
        (InvoiceStatus::Draft, InvoiceStatus::Void),
        (InvoiceStatus::Issued, InvoiceStatus::Paid),
        (InvoiceStatus::Issued, InvoiceStatus::Overdue),
        (InvoiceStatus::Issued, InvoiceStatus::Void),
        (InvoiceStatus::Overdue, InvoiceStatus::Paid),
        (InvoiceStatus::Overdue, InvoiceStatus::Void),
    ];

    fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Issued => "ISSUED",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
            InvoiceStatus::Void => "VOID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Pix,
    Dinheiro,
    Cartao,
    Boleto,
    Transferencia,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Confirmed,
    Failed,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,

    pub contract_id: Option<Uuid>,
    pub tenant_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2026-08-01")]
    pub issue_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-08-10")]
    pub due_date: NaiveDate,

    pub status: InvoiceStatus,

    // Derivado da soma dos itens; nunca autorado pelo cliente.
    #[schema(example = "450.00")]
    pub total_amount: Decimal,

    pub void_reason: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Nenhum campo de fatura PAID ou VOID pode ser editado; itens e
    /// pagamentos também ficam congelados. Checado antes de qualquer query.
    pub fn ensure_editable(&self) -> Result<(), AppError> {
        self.status.assert_mutable()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,

    #[schema(example = "Mensalidade Box A-012")]
    pub description: String,

    #[schema(example = 1)]
    pub quantity: i32,

    #[schema(example = "450.00")]
    pub unit_price: Decimal,

    pub created_at: DateTime<Utc>,
}

impl InvoiceItem {
    pub fn total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Σ quantidade × preço unitário, exato em decimal (sem drift de float).
pub fn compute_total(items: &[InvoiceItem]) -> Decimal {
    items.iter().map(InvoiceItem::total).sum()
}

/// Tolerância de arredondamento ao conferir o total persistido: 1 centavo.
pub fn rounding_epsilon() -> Decimal {
    Decimal::new(1, 2)
}

/// Motivo de cancelamento: obrigatório e não pode ser só espaço em branco.
/// Validado antes de qualquer query.
pub fn validate_void_reason(reason: &str) -> Result<&str, AppError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(AppError::EmptyVoidReason);
    }
    Ok(trimmed)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,

    pub invoice_id: Uuid,
    pub tenant_id: Uuid,

    #[schema(example = "450.00")]
    pub amount: Decimal,

    pub method: PaymentMethod,

    #[schema(example = "E2E-20260801-0001")]
    pub transaction_id: Option<String>,

    pub status: PaymentStatus,

    pub created_at: DateTime<Utc>,
}

// Fatura completa: cabeçalho + itens, como o detalhe da API devolve.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
    pub payments: Vec<Payment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i32, unit_price: &str) -> InvoiceItem {
        InvoiceItem {
            id: Uuid::new_v4(),
            invoice_id: Uuid::new_v4(),
            description: "Mensalidade".into(),
            quantity,
            unit_price: unit_price.parse().unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn total_e_soma_exata_dos_itens() {
        // Cenário: [{2 x 10.00}, {1 x 5.00}] => 25.00
        let items = vec![item(2, "10.00"), item(1, "5.00")];
        assert_eq!(compute_total(&items), "25.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn total_sem_itens_e_zero() {
        assert_eq!(compute_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn total_nao_sofre_drift_de_centavos() {
        // 3 x 0.10 em float clássico daria 0.30000000000000004
        let items = vec![item(3, "0.10")];
        assert_eq!(compute_total(&items), "0.30".parse::<Decimal>().unwrap());
    }

    #[test]
    fn tabela_de_transicoes_da_fatura() {
        use InvoiceStatus::*;
        let all = [Draft, Issued, Paid, Overdue, Void];
        for from in all {
            for to in all {
                let esperado = from == to
                    || matches!(
                        (from, to),
                        (Draft, Issued)
                            | (Draft, Void)
                            | (Issued, Paid)
                            | (Issued, Overdue)
                            | (Issued, Void)
                            | (Overdue, Paid)
                            | (Overdue, Void)
                    );
                assert_eq!(
                    from.can_transition(to),
                    esperado,
                    "{} -> {}",
                    from.as_str(),
                    to.as_str()
                );
            }
        }
    }

    #[test]
    fn rascunho_nao_vira_pago_sem_emissao() {
        assert!(InvoiceStatus::Draft
            .assert_transition(InvoiceStatus::Paid)
            .is_err());
    }

    #[test]
    fn motivo_de_cancelamento_vazio_e_rejeitado() {
        assert!(matches!(
            validate_void_reason(""),
            Err(AppError::EmptyVoidReason)
        ));
        assert!(matches!(
            validate_void_reason("   \t"),
            Err(AppError::EmptyVoidReason)
        ));
        assert_eq!(
            validate_void_reason("  duplicada  ").unwrap(),
            "duplicada"
        );
    }

    #[test]
    fn fatura_terminal_congela_edicao() {
        let mut invoice = Invoice {
            id: Uuid::new_v4(),
            contract_id: None,
            tenant_id: Uuid::new_v4(),
            issue_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            status: InvoiceStatus::Void,
            total_amount: Decimal::ZERO,
            void_reason: Some("duplicada".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        match invoice.ensure_editable().unwrap_err() {
            AppError::TerminalState { status } => assert_eq!(status, "VOID"),
            other => panic!("erro inesperado: {other:?}"),
        }

        invoice.status = InvoiceStatus::Paid;
        assert!(invoice.ensure_editable().is_err());

        invoice.status = InvoiceStatus::Issued;
        assert!(invoice.ensure_editable().is_ok());
    }
}
