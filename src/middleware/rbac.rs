// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::rbac::{Actor, Capability},
};

/// 1. O Trait que define o que é uma Permissão exigida
pub trait PermissionDef: Send + Sync + 'static {
    fn capability() -> Capability;
}

/// 2. O Extractor (Guardião)
///
/// Avalia a capacidade contra o `Actor` que o auth_guard já carregou:
/// função pura, nenhuma consulta por verificação.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .extensions
            .get::<Actor>()
            .ok_or(AppError::InvalidToken)?;

        if !actor.has_capability(T::capability()) {
            // Mensagem genérica: quem não tem a permissão não descobre qual é.
            return Err(AppError::PermissionDenied);
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermViewInvoice;
impl PermissionDef for PermViewInvoice {
    fn capability() -> Capability {
        Capability::ViewInvoice
    }
}

pub struct PermAddInvoice;
impl PermissionDef for PermAddInvoice {
    fn capability() -> Capability {
        Capability::AddInvoice
    }
}

pub struct PermChangeInvoice;
impl PermissionDef for PermChangeInvoice {
    fn capability() -> Capability {
        Capability::ChangeInvoice
    }
}

pub struct PermDeleteInvoice;
impl PermissionDef for PermDeleteInvoice {
    fn capability() -> Capability {
        Capability::DeleteInvoice
    }
}

pub struct PermAddInvoiceItem;
impl PermissionDef for PermAddInvoiceItem {
    fn capability() -> Capability {
        Capability::AddInvoiceItem
    }
}

pub struct PermChangeInvoiceItem;
impl PermissionDef for PermChangeInvoiceItem {
    fn capability() -> Capability {
        Capability::ChangeInvoiceItem
    }
}

pub struct PermDeleteInvoiceItem;
impl PermissionDef for PermDeleteInvoiceItem {
    fn capability() -> Capability {
        Capability::DeleteInvoiceItem
    }
}

pub struct PermRecordPayment;
impl PermissionDef for PermRecordPayment {
    fn capability() -> Capability {
        Capability::RecordPayment
    }
}

pub struct PermVoidInvoice;
impl PermissionDef for PermVoidInvoice {
    fn capability() -> Capability {
        Capability::VoidInvoice
    }
}

pub struct PermDownloadInvoice;
impl PermissionDef for PermDownloadInvoice {
    fn capability() -> Capability {
        Capability::DownloadInvoice
    }
}
