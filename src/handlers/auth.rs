// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, CurrentActor},
    models::auth::{LoginPayload, LoginResponse, MeResponse, RegisterPayload},
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Usuário criado"),
        (status = 409, description = "E-mail já em uso")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .auth_service
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Token JWT emitido", body = LoginResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(LoginResponse { token })))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário autenticado + cargos e permissões", body = MeResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    AuthenticatedUser(user): AuthenticatedUser,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, AppError> {
    let mut permissions: Vec<String> = actor
        .capabilities
        .iter()
        .map(|c| c.slug().to_string())
        .collect();
    permissions.sort();

    Ok((
        StatusCode::OK,
        Json(MeResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            roles: actor.roles,
            permissions,
        }),
    ))
}
