// src/handlers/crm.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentActor,
    models::crm::{Lead, LeadStage},
    models::tenants::CustomerCategory,
    services::conversion_service::{ContractTermsForm, ConversionResult, TenantInfoForm},
};

// =============================================================================
//  ÁREA 1: LEADS (CRUD + funil)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Carlos")]
    pub first_name: String,

    #[schema(example = "Pereira")]
    pub last_name: Option<String>,

    #[validate(email(message = "invalid_email"))]
    #[schema(example = "carlos@email.com")]
    pub email: Option<String>,

    #[schema(example = "+55 11 98888-0000")]
    pub phone: Option<String>,

    #[schema(example = "Indicação")]
    pub source: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadPayload {
    #[validate(length(min = 1, message = "required"))]
    pub first_name: String,
    pub last_name: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,

    #[schema(example = "QUALIFIED")]
    pub stage: LeadStage,
}

#[derive(Debug, Deserialize)]
pub struct LeadFilter {
    pub stage: Option<LeadStage>,
}

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "CRM",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lead = app_state
        .crm_service
        .create_lead(
            &app_state.db_pool,
            &payload.first_name,
            payload.last_name.as_deref(),
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.source.as_deref(),
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "CRM",
    params(("stage" = Option<LeadStage>, Query, description = "Filtra por etapa do funil")),
    responses((status = 200, description = "Lista de leads", body = Vec<Lead>)),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    Query(filter): Query<LeadFilter>,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state
        .crm_service
        .list_leads(&app_state.db_pool, filter.stage)
        .await?;

    Ok((StatusCode::OK, Json(leads)))
}

// GET /api/leads/{id}
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "CRM",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let lead = app_state.crm_service.get_lead(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(lead)))
}

// PATCH /api/leads/{id}
#[utoipa::path(
    patch,
    path = "/api/leads/{id}",
    tag = "CRM",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = UpdateLeadPayload,
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 409, description = "Lead já convertido está congelado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let lead = app_state
        .crm_service
        .update_lead(
            &app_state.db_pool,
            id,
            &payload.first_name,
            payload.last_name.as_deref(),
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.source.as_deref(),
            payload.notes.as_deref(),
            payload.stage,
        )
        .await?;

    Ok((StatusCode::OK, Json(lead)))
}

// DELETE /api/leads/{id}
#[utoipa::path(
    delete,
    path = "/api/leads/{id}",
    tag = "CRM",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 204, description = "Lead removido"),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_lead(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = app_state
        .crm_service
        .delete_lead(&app_state.db_pool, id)
        .await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Lead"))
    }
}

// =============================================================================
//  ÁREA 2: CONVERSÃO (endpoint transacional do assistente)
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertTenantPayload {
    #[schema(example = "Carlos")]
    pub first_name: String,
    #[schema(example = "Pereira")]
    pub last_name: String,
    #[schema(example = "123.456.789-00")]
    pub document: String,
    #[schema(example = "PF")]
    pub category: Option<CustomerCategory>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertContractPayload {
    pub unit_id: Uuid,

    #[schema(value_type = Option<String>, format = Date, example = "2026-09-01")]
    pub move_in: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub move_out: Option<NaiveDate>,

    #[schema(example = "450.00")]
    pub monthly_rate: Option<Decimal>,
    pub deposit: Option<Decimal>,

    #[serde(default)]
    pub terms: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertLeadPayload {
    pub tenant: ConvertTenantPayload,
    pub contract: ConvertContractPayload,
}

// POST /api/leads/{id}/convert
//
// Uma requisição, tudo-ou-nada: cliente + contrato + marcação do lead.
// A validação de cada etapa do assistente roda aqui de novo — o servidor
// não confia no que o cliente já validou.
#[utoipa::path(
    post,
    path = "/api/leads/{id}/convert",
    tag = "CRM",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = ConvertLeadPayload,
    responses(
        (status = 201, description = "Lead convertido", body = ConversionResult),
        (status = 409, description = "Lead não apto, box indisponível ou já convertido"),
        (status = 422, description = "Etapa do assistente inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn convert_lead(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<Uuid>,
    Json(payload): Json<ConvertLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    // Conversão cria contrato: mesmo conjunto de cargos da escrita de contratos.
    if !actor.is_contract_writer() {
        return Err(AppError::PermissionDenied);
    }

    let tenant_info = TenantInfoForm {
        first_name: payload.tenant.first_name,
        last_name: payload.tenant.last_name,
        document: payload.tenant.document,
        category: payload.tenant.category,
        email: payload.tenant.email,
        phone: payload.tenant.phone,
    };

    let terms = ContractTermsForm {
        move_in: payload.contract.move_in,
        move_out: payload.contract.move_out,
        monthly_rate: payload.contract.monthly_rate,
        deposit: payload.contract.deposit,
        terms: payload.contract.terms,
        notes: payload.contract.notes,
    };

    let result = app_state
        .conversion_service
        .convert_lead(
            &app_state.db_pool,
            id,
            tenant_info,
            payload.contract.unit_id,
            terms,
            Utc::now().date_naive(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(result)))
}
