// src/models/contracts.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::status_machine::StatusMachine;

// Mapeia o CREATE TYPE contract_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contract_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Draft,
    Active,
    Closed,
    Canceled,
}

impl StatusMachine for ContractStatus {
    // CLOSED e CANCELED não têm saída: terminais.
    const TRANSITIONS: &'static [(Self, Self)] = &[
        (ContractStatus::Draft, ContractStatus::Active),
        (ContractStatus::Active, ContractStatus::Closed),
        (ContractStatus::Active, ContractStatus::Canceled),
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "DRAFT",
            ContractStatus::Active => "ACTIVE",
            ContractStatus::Closed => "CLOSED",
            ContractStatus::Canceled => "CANCELED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,

    pub tenant_id: Uuid,
    pub unit_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2026-09-01")]
    pub move_in: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub move_out: Option<NaiveDate>,

    #[schema(example = "450.00")]
    pub monthly_rate: Decimal,
    #[schema(example = "450.00")]
    pub deposit: Option<Decimal>,

    pub terms: String,
    pub notes: Option<String>,

    pub status: ContractStatus,

    // Referências externas de auditoria/faturamento, quando integrados
    pub audit_ref: Option<String>,
    pub billing_ref: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::AppError;

    const ALL: [ContractStatus; 4] = [
        ContractStatus::Draft,
        ContractStatus::Active,
        ContractStatus::Closed,
        ContractStatus::Canceled,
    ];

    #[test]
    fn tabela_de_transicoes_completa() {
        for from in ALL {
            for to in ALL {
                let esperado = from == to
                    || matches!(
                        (from, to),
                        (ContractStatus::Draft, ContractStatus::Active)
                            | (ContractStatus::Active, ContractStatus::Closed)
                            | (ContractStatus::Active, ContractStatus::Canceled)
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
    fn rascunho_nao_fecha_direto() {
        // Cenário: contrato DRAFT, pedido de transição para CLOSED
        let err = ContractStatus::Draft
            .assert_transition(ContractStatus::Closed)
            .unwrap_err();
        match err {
            AppError::InvalidTransition { from, to } => {
                assert_eq!(from, "DRAFT");
                assert_eq!(to, "CLOSED");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn ativo_pode_ser_cancelado() {
        assert!(ContractStatus::Active
            .assert_transition(ContractStatus::Canceled)
            .is_ok());
    }

    #[test]
    fn terminais_sao_imutaveis() {
        assert!(ContractStatus::Closed.is_terminal());
        assert!(ContractStatus::Canceled.is_terminal());
        assert!(!ContractStatus::Draft.is_terminal());
        assert!(!ContractStatus::Active.is_terminal());

        for to in ALL {
            if to != ContractStatus::Closed {
                assert!(!ContractStatus::Closed.can_transition(to));
            }
            if to != ContractStatus::Canceled {
                assert!(!ContractStatus::Canceled.can_transition(to));
            }
        }
    }
}
