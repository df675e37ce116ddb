// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::User,
    models::rbac::{Actor, Capability},
};

// O middleware em si: valida o Bearer token e carrega o Actor explícito
// (cargos + capacidades efetivas) UMA vez. Daqui em diante nenhuma
// verificação de permissão toca banco ou estado global.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let user = app_state.auth_service.validate_token(token).await?;

            let roles = app_state
                .rbac_repo
                .list_user_roles(app_state.rbac_repo.pool(), user.id)
                .await?;

            let slugs = app_state
                .rbac_repo
                .list_user_permission_slugs(app_state.rbac_repo.pool(), user.id)
                .await?;

            // Tokens desconhecidos no banco são ignorados com aviso:
            // o enum fechado é quem dita o que existe.
            let mut capabilities: HashSet<Capability> = HashSet::new();
            for slug in &slugs {
                match Capability::from_slug(slug) {
                    Some(cap) => {
                        capabilities.insert(cap);
                    }
                    None => {
                        tracing::warn!("Permissão desconhecida ignorada: {}", slug);
                    }
                }
            }

            let actor = Actor {
                user_id: user.id,
                roles,
                capabilities,
            };

            // Insere usuário e ator nos "extensions" da requisição
            request.extensions_mut().insert(user);
            request.extensions_mut().insert(actor);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}

// Extrator do Actor carregado pelo auth_guard
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .map(CurrentActor)
            .ok_or(AppError::InvalidToken)
    }
}
