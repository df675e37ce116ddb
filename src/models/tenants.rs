// src/models/tenants.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// PF = pessoa física, PJ = pessoa jurídica
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "customer_category", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum CustomerCategory {
    Pf,
    Pj,
}

/// O locatário (cliente do self storage). Criado direto no cadastro
/// ou como efeito da conversão de um lead ganho.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,

    #[schema(example = "Carlos")]
    pub first_name: String,
    #[schema(example = "Pereira")]
    pub last_name: String,

    // CPF ou CNPJ, conforme a categoria
    #[schema(example = "123.456.789-00")]
    pub document: String,
    pub category: CustomerCategory,

    #[schema(example = "carlos@email.com")]
    pub email: Option<String>,
    #[schema(example = "+55 11 98888-0000")]
    pub phone: Option<String>,

    // Endereço flexível: o frontend manda um JSON, guardamos como JSONB.
    pub address: Option<Value>,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
