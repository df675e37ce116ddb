// src/handlers/rbac.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::collections::HashMap;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentActor,
    models::rbac::{Capability, CreateRolePayload, PermissionEntry, RoleResponse},
};

// GET /api/permissions
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "RBAC",
    responses((status = 200, description = "Catálogo de permissões", body = Vec<PermissionEntry>))
)]
pub async fn list_permissions() -> impl IntoResponse {
    (StatusCode::OK, Json(PermissionEntry::catalog()))
}

// POST /api/roles
//
// Define (ou redefine) o conjunto de permissões de um cargo. Os slugs
// passam pelo parse estrito: um token com typo derruba a requisição inteira.
#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "RBAC",
    request_body = CreateRolePayload,
    responses(
        (status = 201, description = "Cargo criado/atualizado", body = RoleResponse),
        (status = 422, description = "Token de permissão desconhecido"),
        (status = 403, description = "Apenas admin gerencia cargos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_role(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<CreateRolePayload>,
) -> Result<impl IntoResponse, AppError> {
    if !actor.has_any_role(&["admin", "admin_corporativo"]) {
        return Err(AppError::PermissionDenied);
    }

    let mut unknown: HashMap<String, String> = HashMap::new();
    for slug in &payload.permissions {
        if Capability::from_slug(slug).is_none() {
            unknown.insert(slug.clone(), "unknown_permission".to_string());
        }
    }
    if !unknown.is_empty() {
        return Err(AppError::StepValidationError(unknown));
    }

    let mut tx = app_state.db_pool.begin().await?;
    app_state
        .rbac_repo
        .set_role_permissions(&mut *tx, &payload.slug, &payload.permissions)
        .await?;
    tx.commit().await?;

    let permissions = app_state
        .rbac_repo
        .list_role_permissions(&app_state.db_pool, &payload.slug)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RoleResponse {
            slug: payload.slug,
            permissions,
        }),
    ))
}
