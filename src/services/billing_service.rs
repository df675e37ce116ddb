// src/services/billing_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, status_machine::StatusMachine},
    db::BillingRepository,
    models::billing::{
        compute_total, rounding_epsilon, validate_void_reason, Invoice, InvoiceDetail,
        InvoiceItem, InvoiceStatus, Payment, PaymentMethod, PaymentStatus,
    },
};

#[derive(Clone)]
pub struct BillingService {
    repo: BillingRepository,
}

impl BillingService {
    pub fn new(repo: BillingRepository) -> Self {
        Self { repo }
    }

    // =========================================================================
    //  FATURAS
    // =========================================================================

    pub async fn create_invoice(
        &self,
        pool: &PgPool,
        contract_id: Option<Uuid>,
        tenant_id: Uuid,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Invoice, AppError> {
        self.repo
            .create_invoice(pool, contract_id, tenant_id, issue_date, due_date)
            .await
    }

    pub async fn list_invoices(
        &self,
        pool: &PgPool,
        status: Option<InvoiceStatus>,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<Invoice>, AppError> {
        self.repo.list_invoices(pool, status, tenant_id).await
    }

    pub async fn get_invoice(&self, pool: &PgPool, id: Uuid) -> Result<Invoice, AppError> {
        self.repo
            .get_invoice(pool, id)
            .await?
            .ok_or(AppError::NotFound("Fatura"))
    }

    /// Detalhe completo, conferindo o total persistido contra a soma dos
    /// itens. Divergência acima do epsilon não é confiada em silêncio.
    pub async fn get_invoice_detail(
        &self,
        pool: &PgPool,
        id: Uuid,
    ) -> Result<InvoiceDetail, AppError> {
        let invoice = self.get_invoice(pool, id).await?;
        let items = self.repo.list_items(pool, id).await?;
        let payments = self.repo.list_payments(pool, id).await?;

        self.check_total(&invoice, &items);

        Ok(InvoiceDetail {
            invoice,
            items,
            payments,
        })
    }

    fn check_total(&self, invoice: &Invoice, items: &[InvoiceItem]) {
        let computed = compute_total(items);
        let diff = (invoice.total_amount - computed).abs();
        if diff > rounding_epsilon() {
            // O banco é a fonte de verdade, mas a divergência precisa aparecer.
            tracing::warn!(
                "Total da fatura {} diverge: persistido {} / recalculado {}",
                invoice.id,
                invoice.total_amount,
                computed
            );
        }
    }

    /// PATCH de datas/status. Cancelamento tem endpoint próprio (exige motivo);
    /// por aqui VOID é rejeitado.
    pub async fn update_invoice(
        &self,
        pool: &PgPool,
        id: Uuid,
        issue_date: Option<NaiveDate>,
        due_date: Option<NaiveDate>,
        target_status: Option<InvoiceStatus>,
    ) -> Result<Invoice, AppError> {
        let mut tx = pool.begin().await?;

        let current = self
            .repo
            .get_invoice(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Fatura"))?;

        current.ensure_editable()?;

        let new_status = target_status.unwrap_or(current.status);
        if new_status == InvoiceStatus::Void {
            return Err(AppError::EmptyVoidReason);
        }
        current.status.assert_transition(new_status)?;

        let updated = self
            .repo
            .update_invoice(
                &mut *tx,
                id,
                issue_date.unwrap_or(current.issue_date),
                due_date.unwrap_or(current.due_date),
                new_status,
                current.status,
            )
            .await?;

        let invoice = match updated {
            Some(i) => i,
            None => {
                // Outro ator mexeu primeiro; a rejeição do servidor é a autoritativa.
                return Err(AppError::InvalidTransition {
                    from: current.status.as_str(),
                    to: new_status.as_str(),
                });
            }
        };

        tx.commit().await?;
        Ok(invoice)
    }

    /// Cancela a fatura. Motivo vazio é rejeitado ANTES de qualquer query;
    /// fatura PAID/VOID é terminal e rejeita com TerminalState.
    pub async fn void_invoice(
        &self,
        pool: &PgPool,
        id: Uuid,
        reason: &str,
    ) -> Result<Invoice, AppError> {
        let reason = validate_void_reason(reason)?;

        let mut tx = pool.begin().await?;

        let current = self
            .repo
            .get_invoice(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Fatura"))?;

        current.ensure_editable()?;
        current.status.assert_transition(InvoiceStatus::Void)?;

        let voided = self
            .repo
            .void_invoice(&mut *tx, id, reason, current.status)
            .await?
            .ok_or(AppError::TerminalState {
                status: current.status.as_str(),
            })?;

        tx.commit().await?;

        tracing::info!("Fatura {} cancelada: {}", id, reason);
        Ok(voided)
    }

    pub async fn mark_overdue_invoices(
        &self,
        pool: &PgPool,
        today: NaiveDate,
    ) -> Result<u64, AppError> {
        let count = self.repo.mark_overdue_invoices(pool, today).await?;
        if count > 0 {
            tracing::info!("{} fatura(s) marcadas como vencidas", count);
        }
        Ok(count)
    }

    /// Só rascunho pode ser excluído; o resto segue a máquina de status.
    pub async fn delete_invoice(&self, pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        let invoice = self.get_invoice(pool, id).await?;

        if invoice.status != InvoiceStatus::Draft {
            return Err(AppError::DeleteNotAllowed {
                status: invoice.status.as_str(),
            });
        }

        self.repo.delete_invoice(pool, id).await?;
        Ok(())
    }

    // =========================================================================
    //  ITENS (mutáveis apenas com a fatura fora de status terminal)
    // =========================================================================

    pub async fn add_item(
        &self,
        pool: &PgPool,
        invoice_id: Uuid,
        description: &str,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<InvoiceItem, AppError> {
        let mut tx = pool.begin().await?;

        let invoice = self
            .repo
            .get_invoice(&mut *tx, invoice_id)
            .await?
            .ok_or(AppError::NotFound("Fatura"))?;
        invoice.ensure_editable()?;

        let item = self
            .repo
            .add_item(&mut *tx, invoice_id, description, quantity, unit_price)
            .await?;

        // Inserção e recálculo do total são atômicos.
        self.repo
            .recalculate_invoice_total(&mut *tx, invoice_id)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn update_item(
        &self,
        pool: &PgPool,
        invoice_id: Uuid,
        item_id: Uuid,
        description: &str,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<InvoiceItem, AppError> {
        let mut tx = pool.begin().await?;

        let invoice = self
            .repo
            .get_invoice(&mut *tx, invoice_id)
            .await?
            .ok_or(AppError::NotFound("Fatura"))?;
        invoice.ensure_editable()?;

        let item = self
            .repo
            .update_item(&mut *tx, invoice_id, item_id, description, quantity, unit_price)
            .await?
            .ok_or(AppError::NotFound("Item da fatura"))?;

        self.repo
            .recalculate_invoice_total(&mut *tx, invoice_id)
            .await?;

        tx.commit().await?;
        Ok(item)
    }

    pub async fn remove_item(
        &self,
        pool: &PgPool,
        invoice_id: Uuid,
        item_id: Uuid,
    ) -> Result<(), AppError> {
        let mut tx = pool.begin().await?;

        let invoice = self
            .repo
            .get_invoice(&mut *tx, invoice_id)
            .await?
            .ok_or(AppError::NotFound("Fatura"))?;
        invoice.ensure_editable()?;

        let removed = self.repo.delete_item(&mut *tx, invoice_id, item_id).await?;
        if !removed {
            return Err(AppError::NotFound("Item da fatura"));
        }

        self.repo
            .recalculate_invoice_total(&mut *tx, invoice_id)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  PAGAMENTOS
    // =========================================================================

    /// Registra um pagamento. NÃO transiciona a fatura: a quitação é decisão
    /// manual de conciliação, por PATCH explícito. Quando a soma confirmada
    /// cobre o total, isso fica visível no log.
    pub async fn record_payment(
        &self,
        pool: &PgPool,
        invoice_id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
        transaction_id: Option<&str>,
    ) -> Result<Payment, AppError> {
        let mut tx = pool.begin().await?;

        let invoice = self
            .repo
            .get_invoice(&mut *tx, invoice_id)
            .await?
            .ok_or(AppError::NotFound("Fatura"))?;
        invoice.ensure_editable()?;

        let payment = self
            .repo
            .insert_payment(
                &mut *tx,
                invoice_id,
                invoice.tenant_id,
                amount,
                method,
                transaction_id,
                PaymentStatus::Confirmed,
            )
            .await?;

        let paid_total = self.repo.sum_confirmed_payments(&mut *tx, invoice_id).await?;

        tx.commit().await?;

        if paid_total >= invoice.total_amount {
            tracing::info!(
                "Fatura {} coberta pelos pagamentos ({} de {}); aguardando conciliação manual",
                invoice_id,
                paid_total,
                invoice.total_amount
            );
        }

        Ok(payment)
    }
}
