// src/handlers/units.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::units::{Unit, UnitStatus},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "A-012")]
    pub code: String,

    #[schema(example = "1")]
    pub floor: Option<String>,

    #[schema(example = "6.5")]
    pub size_m2: Option<Decimal>,

    #[schema(example = "450.00")]
    pub monthly_price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnitPayload {
    #[validate(length(min = 1, message = "required"))]
    pub code: String,
    pub floor: Option<String>,
    pub size_m2: Option<Decimal>,
    pub monthly_price: Decimal,

    #[schema(example = "BLOQUEADA")]
    pub status: UnitStatus,
}

#[derive(Debug, Deserialize)]
pub struct UnitFilter {
    pub status: Option<UnitStatus>,
}

// POST /api/units
#[utoipa::path(
    post,
    path = "/api/units",
    tag = "Boxes",
    request_body = CreateUnitPayload,
    responses(
        (status = 201, description = "Box criado", body = Unit),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_unit(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateUnitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let unit = app_state
        .unit_service
        .create_unit(
            &app_state.db_pool,
            &payload.code,
            payload.floor.as_deref(),
            payload.size_m2,
            payload.monthly_price,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(unit)))
}

// GET /api/units
// A etapa de seleção do assistente de conversão lista com ?status=LIVRE.
#[utoipa::path(
    get,
    path = "/api/units",
    tag = "Boxes",
    params(("status" = Option<UnitStatus>, Query, description = "Filtra por status")),
    responses((status = 200, description = "Lista de boxes", body = Vec<Unit>)),
    security(("api_jwt" = []))
)]
pub async fn list_units(
    State(app_state): State<AppState>,
    Query(filter): Query<UnitFilter>,
) -> Result<impl IntoResponse, AppError> {
    let units = app_state
        .unit_service
        .list_units(&app_state.db_pool, filter.status)
        .await?;

    Ok((StatusCode::OK, Json(units)))
}

// GET /api/units/{id}
#[utoipa::path(
    get,
    path = "/api/units/{id}",
    tag = "Boxes",
    params(("id" = Uuid, Path, description = "ID do box")),
    responses(
        (status = 200, description = "Box", body = Unit),
        (status = 404, description = "Box não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_unit(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let unit = app_state.unit_service.get_unit(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(unit)))
}

// PATCH /api/units/{id}
#[utoipa::path(
    patch,
    path = "/api/units/{id}",
    tag = "Boxes",
    params(("id" = Uuid, Path, description = "ID do box")),
    request_body = UpdateUnitPayload,
    responses(
        (status = 200, description = "Box atualizado", body = Unit),
        (status = 404, description = "Box não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_unit(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUnitPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let unit = app_state
        .unit_service
        .update_unit(
            &app_state.db_pool,
            id,
            &payload.code,
            payload.floor.as_deref(),
            payload.size_m2,
            payload.monthly_price,
            payload.status,
        )
        .await?;

    Ok((StatusCode::OK, Json(unit)))
}

// DELETE /api/units/{id}
#[utoipa::path(
    delete,
    path = "/api/units/{id}",
    tag = "Boxes",
    params(("id" = Uuid, Path, description = "ID do box")),
    responses(
        (status = 204, description = "Box removido"),
        (status = 404, description = "Box não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_unit(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = app_state
        .unit_service
        .delete_unit(&app_state.db_pool, id)
        .await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Box"))
    }
}
