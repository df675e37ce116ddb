// src/handlers/billing.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
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
    middleware::rbac::{
        PermAddInvoice, PermAddInvoiceItem, PermChangeInvoice, PermChangeInvoiceItem,
        PermDeleteInvoice, PermDeleteInvoiceItem, PermDownloadInvoice, PermRecordPayment,
        PermViewInvoice, PermVoidInvoice, RequirePermission,
    },
    models::billing::{Invoice, InvoiceDetail, InvoiceItem, InvoiceStatus, Payment, PaymentMethod},
};

// =============================================================================
//  ÁREA 1: FATURAS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    pub contract_id: Option<Uuid>,
    pub tenant_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2026-08-01")]
    pub issue_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-08-10")]
    pub due_date: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoicePayload {
    #[schema(value_type = Option<String>, format = Date)]
    pub issue_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,

    // VOID não passa por aqui: use o endpoint de cancelamento, que exige motivo.
    #[schema(example = "ISSUED")]
    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFilter {
    pub status: Option<InvoiceStatus>,
    pub tenant_id: Option<Uuid>,
}

// POST /api/invoices
#[utoipa::path(
    post,
    path = "/api/invoices",
    tag = "Faturamento",
    request_body = CreateInvoicePayload,
    responses(
        (status = 201, description = "Fatura criada em rascunho", body = Invoice),
        (status = 403, description = "Sem a permissão billing.add_invoice")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_invoice(
    _perm: RequirePermission<PermAddInvoice>,
    State(app_state): State<AppState>,
    Json(payload): Json<CreateInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let invoice = app_state
        .billing_service
        .create_invoice(
            &app_state.db_pool,
            payload.contract_id,
            payload.tenant_id,
            payload.issue_date,
            payload.due_date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(invoice)))
}

// GET /api/invoices
#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Faturamento",
    params(
        ("status" = Option<InvoiceStatus>, Query, description = "Filtra por status"),
        ("tenantId" = Option<Uuid>, Query, description = "Filtra por cliente")
    ),
    responses((status = 200, description = "Lista de faturas", body = Vec<Invoice>)),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    _perm: RequirePermission<PermViewInvoice>,
    State(app_state): State<AppState>,
    Query(filter): Query<InvoiceFilter>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = app_state
        .billing_service
        .list_invoices(&app_state.db_pool, filter.status, filter.tenant_id)
        .await?;

    Ok((StatusCode::OK, Json(invoices)))
}

// GET /api/invoices/{id}
#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    tag = "Faturamento",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "Fatura com itens e pagamentos", body = InvoiceDetail),
        (status = 404, description = "Fatura não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_invoice(
    _perm: RequirePermission<PermViewInvoice>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .billing_service
        .get_invoice_detail(&app_state.db_pool, id)
        .await?;

    Ok((StatusCode::OK, Json(detail)))
}

// PATCH /api/invoices/{id}
#[utoipa::path(
    patch,
    path = "/api/invoices/{id}",
    tag = "Faturamento",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    request_body = UpdateInvoicePayload,
    responses(
        (status = 200, description = "Fatura atualizada", body = Invoice),
        (status = 409, description = "Transição inválida ou fatura terminal")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_invoice(
    _perm: RequirePermission<PermChangeInvoice>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state
        .billing_service
        .update_invoice(
            &app_state.db_pool,
            id,
            payload.issue_date,
            payload.due_date,
            payload.status,
        )
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

// DELETE /api/invoices/{id}
#[utoipa::path(
    delete,
    path = "/api/invoices/{id}",
    tag = "Faturamento",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 204, description = "Fatura removida"),
        (status = 409, description = "Apenas rascunhos podem ser excluídos")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_invoice(
    _perm: RequirePermission<PermDeleteInvoice>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .billing_service
        .delete_invoice(&app_state.db_pool, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VoidInvoicePayload {
    #[schema(example = "Emitida em duplicidade")]
    pub void_reason: String,
}

// PATCH /api/invoices/{id}/void
#[utoipa::path(
    patch,
    path = "/api/invoices/{id}/void",
    tag = "Faturamento",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    request_body = VoidInvoicePayload,
    responses(
        (status = 200, description = "Fatura cancelada (irreversível)", body = Invoice),
        (status = 409, description = "Fatura já terminal"),
        (status = 422, description = "Motivo ausente")
    ),
    security(("api_jwt" = []))
)]
pub async fn void_invoice(
    _perm: RequirePermission<PermVoidInvoice>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VoidInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state
        .billing_service
        .void_invoice(&app_state.db_pool, id, &payload.void_reason)
        .await?;

    Ok((StatusCode::OK, Json(invoice)))
}

// POST /api/invoices/mark-overdue
#[utoipa::path(
    post,
    path = "/api/invoices/mark-overdue",
    tag = "Faturamento",
    responses((status = 200, description = "Faturas emitidas e vencidas viram OVERDUE")),
    security(("api_jwt" = []))
)]
pub async fn mark_overdue(
    _perm: RequirePermission<PermChangeInvoice>,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let count = app_state
        .billing_service
        .mark_overdue_invoices(&app_state.db_pool, Utc::now().date_naive())
        .await?;

    Ok((StatusCode::OK, Json(serde_json::json!({ "updated": count }))))
}

// GET /api/invoices/{id}/document
#[utoipa::path(
    get,
    path = "/api/invoices/{id}/document",
    tag = "Faturamento",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses(
        (status = 200, description = "PDF da fatura", content_type = "application/pdf"),
        (status = 403, description = "Sem a permissão billing.download_invoice")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_invoice(
    _perm: RequirePermission<PermDownloadInvoice>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let pdf = app_state
        .document_service
        .generate_invoice_pdf(&app_state.db_pool, id)
        .await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"fatura-{}.pdf\"", id),
            ),
        ],
        pdf,
    ))
}

// =============================================================================
//  ÁREA 2: ITENS DA FATURA
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemPayload {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Mensalidade Box A-012")]
    pub description: String,

    #[validate(range(min = 1, message = "min_quantity"))]
    #[schema(example = 1)]
    pub quantity: i32,

    #[schema(example = "450.00")]
    pub unit_price: Decimal,
}

impl InvoiceItemPayload {
    // `validator` não alcança Decimal; preço negativo é rejeitado aqui.
    fn ensure_non_negative_price(&self) -> Result<(), AppError> {
        if self.unit_price < Decimal::ZERO {
            let mut errors = std::collections::HashMap::new();
            errors.insert("unitPrice".to_string(), "must_be_non_negative".to_string());
            return Err(AppError::StepValidationError(errors));
        }
        Ok(())
    }
}

// POST /api/invoices/{id}/items
#[utoipa::path(
    post,
    path = "/api/invoices/{id}/items",
    tag = "Faturamento",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    request_body = InvoiceItemPayload,
    responses(
        (status = 201, description = "Item adicionado, total recalculado", body = InvoiceItem),
        (status = 409, description = "Fatura terminal não aceita itens")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_invoice_item(
    _perm: RequirePermission<PermAddInvoiceItem>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<InvoiceItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.ensure_non_negative_price()?;

    let item = app_state
        .billing_service
        .add_item(
            &app_state.db_pool,
            id,
            &payload.description,
            payload.quantity,
            payload.unit_price,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

// PATCH /api/invoices/{id}/items/{item_id}
#[utoipa::path(
    patch,
    path = "/api/invoices/{id}/items/{item_id}",
    tag = "Faturamento",
    params(
        ("id" = Uuid, Path, description = "ID da fatura"),
        ("item_id" = Uuid, Path, description = "ID do item")
    ),
    request_body = InvoiceItemPayload,
    responses(
        (status = 200, description = "Item atualizado, total recalculado", body = InvoiceItem),
        (status = 409, description = "Fatura terminal não aceita edição")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_invoice_item(
    _perm: RequirePermission<PermChangeInvoiceItem>,
    State(app_state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<InvoiceItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.ensure_non_negative_price()?;

    let item = app_state
        .billing_service
        .update_item(
            &app_state.db_pool,
            id,
            item_id,
            &payload.description,
            payload.quantity,
            payload.unit_price,
        )
        .await?;

    Ok((StatusCode::OK, Json(item)))
}

// DELETE /api/invoices/{id}/items/{item_id}
#[utoipa::path(
    delete,
    path = "/api/invoices/{id}/items/{item_id}",
    tag = "Faturamento",
    params(
        ("id" = Uuid, Path, description = "ID da fatura"),
        ("item_id" = Uuid, Path, description = "ID do item")
    ),
    responses(
        (status = 204, description = "Item removido, total recalculado"),
        (status = 409, description = "Fatura terminal não aceita remoção")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_invoice_item(
    _perm: RequirePermission<PermDeleteInvoiceItem>,
    State(app_state): State<AppState>,
    Path((id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .billing_service
        .remove_item(&app_state.db_pool, id, item_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 3: PAGAMENTOS
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentPayload {
    pub invoice: Uuid,

    #[schema(example = "450.00")]
    pub amount: Decimal,

    #[schema(example = "PIX")]
    pub method: PaymentMethod,

    #[schema(example = "E2E-20260801-0001")]
    pub transaction_id: Option<String>,
}

// POST /api/invoices/record-payment
//
// Registrar pagamento NÃO quita a fatura: a transição para PAID é uma
// decisão explícita de conciliação, feita pelo PATCH.
#[utoipa::path(
    post,
    path = "/api/invoices/record-payment",
    tag = "Faturamento",
    request_body = RecordPaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado", body = Payment),
        (status = 409, description = "Fatura terminal não aceita pagamentos"),
        (status = 403, description = "Sem a permissão billing.record_payment")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_payment(
    _perm: RequirePermission<PermRecordPayment>,
    State(app_state): State<AppState>,
    Json(payload): Json<RecordPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.amount <= Decimal::ZERO {
        let mut errors = std::collections::HashMap::new();
        errors.insert("amount".to_string(), "must_be_positive".to_string());
        return Err(AppError::StepValidationError(errors));
    }

    let payment = app_state
        .billing_service
        .record_payment(
            &app_state.db_pool,
            payload.invoice,
            payload.amount,
            payload.method,
            payload.transaction_id.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}
