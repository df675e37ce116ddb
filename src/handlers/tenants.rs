// src/handlers/tenants.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::tenants::{CustomerCategory, Tenant},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Carlos")]
    pub first_name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Pereira")]
    pub last_name: String,

    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "123.456.789-00")]
    pub document: String,

    #[schema(example = "PF")]
    pub category: CustomerCategory,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,
    pub phone: Option<String>,

    pub address: Option<Value>,
    pub notes: Option<String>,
}

// POST /api/tenants
#[utoipa::path(
    post,
    path = "/api/tenants",
    tag = "Clientes",
    request_body = TenantPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Tenant),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_tenant(
    State(app_state): State<AppState>,
    Json(payload): Json<TenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tenant = app_state
        .tenant_service
        .create_tenant(
            &app_state.db_pool,
            &payload.first_name,
            &payload.last_name,
            &payload.document,
            payload.category,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.address.as_ref(),
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(tenant)))
}

// GET /api/tenants
#[utoipa::path(
    get,
    path = "/api/tenants",
    tag = "Clientes",
    responses((status = 200, description = "Lista de clientes", body = Vec<Tenant>)),
    security(("api_jwt" = []))
)]
pub async fn list_tenants(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let tenants = app_state.tenant_service.list_tenants(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(tenants)))
}

// GET /api/tenants/{id}
#[utoipa::path(
    get,
    path = "/api/tenants/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Tenant),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_tenant(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state.tenant_service.get_tenant(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(tenant)))
}

// PATCH /api/tenants/{id}
#[utoipa::path(
    patch,
    path = "/api/tenants/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = TenantPayload,
    responses(
        (status = 200, description = "Cliente atualizado", body = Tenant),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_tenant(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tenant = app_state
        .tenant_service
        .update_tenant(
            &app_state.db_pool,
            id,
            &payload.first_name,
            &payload.last_name,
            &payload.document,
            payload.category,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.address.as_ref(),
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(tenant)))
}

// DELETE /api/tenants/{id}
#[utoipa::path(
    delete,
    path = "/api/tenants/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    responses(
        (status = 204, description = "Cliente removido"),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_tenant(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = app_state
        .tenant_service
        .delete_tenant(&app_state.db_pool, id)
        .await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Cliente"))
    }
}
