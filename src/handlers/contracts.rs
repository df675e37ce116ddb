// src/handlers/contracts.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentActor,
    models::contracts::{Contract, ContractStatus},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContractPayload {
    pub tenant_id: Uuid,
    pub unit_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2026-09-01")]
    pub move_in: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub move_out: Option<NaiveDate>,

    #[schema(example = "450.00")]
    pub monthly_rate: Decimal,
    pub deposit: Option<Decimal>,

    #[validate(length(min = 1, message = "required"))]
    pub terms: String,
    pub notes: Option<String>,

    // DRAFT por padrão; ACTIVE ocupa o box na criação.
    #[schema(example = "DRAFT")]
    pub status: Option<ContractStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContractPayload {
    #[schema(value_type = String, format = Date)]
    pub move_in: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub move_out: Option<NaiveDate>,

    pub monthly_rate: Decimal,
    pub deposit: Option<Decimal>,

    #[validate(length(min = 1, message = "required"))]
    pub terms: String,
    pub notes: Option<String>,

    // Quando presente, passa pela máquina de status antes de qualquer escrita.
    #[schema(example = "CLOSED")]
    pub status: Option<ContractStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractFilter {
    pub status: Option<ContractStatus>,
    pub tenant_id: Option<Uuid>,
}

// POST /api/contracts
#[utoipa::path(
    post,
    path = "/api/contracts",
    tag = "Contratos",
    request_body = CreateContractPayload,
    responses(
        (status = 201, description = "Contrato criado", body = Contract),
        (status = 403, description = "Cargo sem permissão de escrita"),
        (status = 409, description = "Box indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_contract(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<CreateContractPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !actor.is_contract_writer() {
        return Err(AppError::PermissionDenied);
    }
    payload.validate()?;

    let contract = app_state
        .contract_service
        .create_contract(
            &app_state.db_pool,
            payload.tenant_id,
            payload.unit_id,
            payload.move_in,
            payload.move_out,
            payload.monthly_rate,
            payload.deposit,
            &payload.terms,
            payload.notes.as_deref(),
            payload.status.unwrap_or(ContractStatus::Draft),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(contract)))
}

// GET /api/contracts
#[utoipa::path(
    get,
    path = "/api/contracts",
    tag = "Contratos",
    params(
        ("status" = Option<ContractStatus>, Query, description = "Filtra por status"),
        ("tenantId" = Option<Uuid>, Query, description = "Filtra por cliente")
    ),
    responses((status = 200, description = "Lista de contratos", body = Vec<Contract>)),
    security(("api_jwt" = []))
)]
pub async fn list_contracts(
    State(app_state): State<AppState>,
    Query(filter): Query<ContractFilter>,
) -> Result<impl IntoResponse, AppError> {
    let contracts = app_state
        .contract_service
        .list_contracts(&app_state.db_pool, filter.status, filter.tenant_id)
        .await?;

    Ok((StatusCode::OK, Json(contracts)))
}

// GET /api/contracts/{id}
#[utoipa::path(
    get,
    path = "/api/contracts/{id}",
    tag = "Contratos",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 200, description = "Contrato", body = Contract),
        (status = 404, description = "Contrato não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_contract(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let contract = app_state
        .contract_service
        .get_contract(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(contract)))
}

// PATCH /api/contracts/{id}
//
// Fluxo completo do comando de transição: cargo -> máquina de status ->
// escrita condicional. CLOSED e CANCELED congelam o contrato inteiro.
#[utoipa::path(
    patch,
    path = "/api/contracts/{id}",
    tag = "Contratos",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    request_body = UpdateContractPayload,
    responses(
        (status = 200, description = "Contrato atualizado", body = Contract),
        (status = 403, description = "Cargo sem permissão de escrita"),
        (status = 409, description = "Transição inválida ou contrato terminal")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_contract(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateContractPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !actor.is_contract_writer() {
        return Err(AppError::PermissionDenied);
    }
    payload.validate()?;

    let contract = app_state
        .contract_service
        .update_contract(
            &app_state.db_pool,
            id,
            payload.move_in,
            payload.move_out,
            payload.monthly_rate,
            payload.deposit,
            &payload.terms,
            payload.notes.as_deref(),
            payload.status,
        )
        .await?;

    Ok((StatusCode::OK, Json(contract)))
}

// DELETE /api/contracts/{id}
#[utoipa::path(
    delete,
    path = "/api/contracts/{id}",
    tag = "Contratos",
    params(("id" = Uuid, Path, description = "ID do contrato")),
    responses(
        (status = 204, description = "Contrato removido"),
        (status = 403, description = "Cargo sem permissão de escrita"),
        (status = 409, description = "Apenas rascunhos podem ser excluídos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_contract(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    if !actor.is_contract_writer() {
        return Err(AppError::PermissionDenied);
    }

    app_state
        .contract_service
        .delete_contract(&app_state.db_pool, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
