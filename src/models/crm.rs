// src/models/crm.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- ENUMS ---

// Mapeia o CREATE TYPE lead_stage do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_stage", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStage {
    New,
    Contacted,
    Qualified,
    Proposal,
    Won,
    Lost,
}

// --- LEAD ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,

    #[schema(example = "Carlos")]
    pub first_name: String,
    #[schema(example = "Pereira")]
    pub last_name: Option<String>,

    #[schema(example = "carlos@email.com")]
    pub email: Option<String>,
    #[schema(example = "+55 11 98888-0000")]
    pub phone: Option<String>,

    #[schema(example = "Indicação")]
    pub source: Option<String>,
    pub notes: Option<String>,

    pub stage: LeadStage,

    // Preenchido no máximo uma vez, pela conversão. Depois disso o lead congela.
    pub converted_tenant_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    /// Guarda de entrada do assistente de conversão: só lead GANHO e nunca convertido.
    pub fn can_convert(&self) -> bool {
        self.stage == LeadStage::Won && self.converted_tenant_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(stage: LeadStage, converted: Option<Uuid>) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            first_name: "Carlos".into(),
            last_name: Some("Pereira".into()),
            email: None,
            phone: None,
            source: None,
            notes: None,
            stage,
            converted_tenant_id: converted,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn somente_lead_ganho_e_nao_convertido_pode_converter() {
        assert!(lead(LeadStage::Won, None).can_convert());
        assert!(!lead(LeadStage::Qualified, None).can_convert());
        assert!(!lead(LeadStage::Lost, None).can_convert());
        assert!(!lead(LeadStage::Won, Some(Uuid::new_v4())).can_convert());
    }
}
