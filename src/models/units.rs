// src/models/units.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Mapeia o CREATE TYPE unit_status do banco.
// Os rótulos em maiúsculas são os mesmos que trafegam na API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "unit_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitStatus {
    Livre,
    Reservada,
    Ocupada,
    Bloqueada,
    EmVistoria,
}

/// Um box de armazenamento. O assistente de conversão apenas seleciona o box;
/// a ocupação acontece por escrita condicional na criação do contrato.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: Uuid,

    #[schema(example = "A-012")]
    pub code: String,

    #[schema(example = "1")]
    pub floor: Option<String>,

    #[schema(example = "6.5")]
    pub size_m2: Option<Decimal>,

    #[schema(example = "450.00")]
    pub monthly_price: Decimal,

    pub status: UnitStatus,

    // Expiração da reserva, quando o box está RESERVADA
    pub reserved_until: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
