use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validação de etapa do assistente de conversão: campo -> código do erro.
    // Todos os campos inválidos voltam de uma vez, nunca um por vez.
    #[error("Erro de validação de etapa")]
    StepValidationError(HashMap<String, String>),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão negada")]
    PermissionDenied,

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    // Transição rejeitada pela tabela da máquina de status, antes de qualquer escrita.
    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },

    // Mutação sobre registro em status terminal (PAID, VOID, CLOSED, CANCELED).
    #[error("Registro em status terminal ({status}) não pode ser alterado")]
    TerminalState { status: &'static str },

    #[error("Exclusão não permitida no status {status}")]
    DeleteNotAllowed { status: &'static str },

    #[error("Motivo do cancelamento da fatura é obrigatório")]
    EmptyVoidReason,

    #[error("Lead não está apto para conversão")]
    LeadNotConvertible,

    #[error("Lead já foi convertido")]
    LeadAlreadyConverted,

    #[error("Box indisponível")]
    UnitNotAvailable,

    // Guarda contra reenvio do mesmo comando enquanto o primeiro está em voo.
    #[error("Operação já está em andamento")]
    DuplicateSubmission,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Falha ao gerar documento: {0}")]
    DocumentError(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Mesma ideia, mas com código de erro por campo (etapas do assistente).
            AppError::StepValidationError(details) => {
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }

            AppError::InvalidTransition { from, to } => {
                let body = Json(json!({
                    "error": "Transição de status não permitida.",
                    "from": from,
                    "to": to,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }

            AppError::TerminalState { status } => {
                let body = Json(json!({
                    "error": "Registro em status terminal não pode ser alterado.",
                    "status": status,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }

            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string()),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string()),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente.".to_string()),
            // Mensagem genérica de propósito: não revelamos qual permissão faltou.
            AppError::PermissionDenied => (StatusCode::FORBIDDEN, "Você não tem autorização para esta ação.".to_string()),
            AppError::NotFound(entity) => (StatusCode::NOT_FOUND, format!("{} não encontrado.", entity)),
            AppError::DeleteNotAllowed { status } => (StatusCode::CONFLICT, format!("Exclusão não permitida no status {}.", status)),
            AppError::EmptyVoidReason => (StatusCode::UNPROCESSABLE_ENTITY, "Informe o motivo do cancelamento da fatura.".to_string()),
            AppError::LeadNotConvertible => (StatusCode::CONFLICT, "Apenas leads ganhos e ainda não convertidos podem ser convertidos.".to_string()),
            AppError::LeadAlreadyConverted => (StatusCode::CONFLICT, "Este lead já foi convertido em cliente.".to_string()),
            AppError::UnitNotAvailable => (StatusCode::CONFLICT, "O box selecionado não está mais livre.".to_string()),
            AppError::DuplicateSubmission => (StatusCode::CONFLICT, "Aguarde: a operação anterior ainda está em andamento.".to_string()),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
