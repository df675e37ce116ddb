// src/db/billing_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::billing::{Invoice, InvoiceItem, InvoiceStatus, Payment, PaymentMethod, PaymentStatus},
};

const INVOICE_COLUMNS: &str = "id, contract_id, tenant_id, issue_date, due_date, status, \
     total_amount, void_reason, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, invoice_id, description, quantity, unit_price, created_at";

const PAYMENT_COLUMNS: &str =
    "id, invoice_id, tenant_id, amount, method, transaction_id, status, created_at";

#[derive(Clone)]
pub struct BillingRepository {
    pool: PgPool,
}

impl BillingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // =========================================================================
    //  FATURAS
    // =========================================================================

    pub async fn create_invoice<'e, E>(
        &self,
        executor: E,
        contract_id: Option<Uuid>,
        tenant_id: Uuid,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            INSERT INTO invoices (contract_id, tenant_id, issue_date, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(contract_id)
        .bind(tenant_id)
        .bind(issue_date)
        .bind(due_date)
        .fetch_one(executor)
        .await?;

        Ok(invoice)
    }

    pub async fn list_invoices<'e, E>(
        &self,
        executor: E,
        status: Option<InvoiceStatus>,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
            WHERE ($1::invoice_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR tenant_id = $2)
            ORDER BY issue_date DESC, created_at DESC
            "#
        ))
        .bind(status)
        .bind(tenant_id)
        .fetch_all(executor)
        .await?;

        Ok(invoices)
    }

    pub async fn get_invoice<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(invoice)
    }

    /// Atualiza datas + status com escrita condicional no status esperado
    /// (mesma defesa contra leitura desatualizada do contract_repo).
    pub async fn update_invoice<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        new_status: InvoiceStatus,
        expected_status: InvoiceStatus,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET issue_date = $2, due_date = $3, status = $4, updated_at = now()
            WHERE id = $1 AND status = $5
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(issue_date)
        .bind(due_date)
        .bind(new_status)
        .bind(expected_status)
        .fetch_optional(executor)
        .await?;

        Ok(invoice)
    }

    pub async fn void_invoice<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        reason: &str,
        expected_status: InvoiceStatus,
    ) -> Result<Option<Invoice>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            r#"
            UPDATE invoices
            SET status = 'VOID', void_reason = $2, updated_at = now()
            WHERE id = $1 AND status = $3
            RETURNING {INVOICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(reason)
        .bind(expected_status)
        .fetch_optional(executor)
        .await?;

        Ok(invoice)
    }

    /// Varredura de vencidas: ISSUED com vencimento anterior a hoje vira OVERDUE.
    pub async fn mark_overdue_invoices<'e, E>(
        &self,
        executor: E,
        today: NaiveDate,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE invoices SET status = 'OVERDUE', updated_at = now() \
             WHERE status = 'ISSUED' AND due_date < $1",
        )
        .bind(today)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_invoice<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// O total da fatura é sempre derivado da soma dos itens, nunca autorado.
    pub async fn recalculate_invoice_total<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (total,): (Decimal,) = sqlx::query_as(
            r#"
            UPDATE invoices
            SET total_amount = COALESCE(
                    (SELECT SUM(quantity * unit_price) FROM invoice_items WHERE invoice_id = $1),
                    0),
                updated_at = now()
            WHERE id = $1
            RETURNING total_amount
            "#,
        )
        .bind(invoice_id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }

    // =========================================================================
    //  ITENS
    // =========================================================================

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
    ) -> Result<Vec<InvoiceItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, InvoiceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = $1 ORDER BY created_at"
        ))
        .bind(invoice_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    pub async fn add_item<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        description: &str,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<InvoiceItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, InvoiceItem>(&format!(
            r#"
            INSERT INTO invoice_items (invoice_id, description, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(invoice_id)
        .bind(description)
        .bind(quantity)
        .bind(unit_price)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn update_item<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        item_id: Uuid,
        description: &str,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<Option<InvoiceItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, InvoiceItem>(&format!(
            r#"
            UPDATE invoice_items
            SET description = $3, quantity = $4, unit_price = $5
            WHERE id = $2 AND invoice_id = $1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(invoice_id)
        .bind(item_id)
        .bind(description)
        .bind(quantity)
        .bind(unit_price)
        .fetch_optional(executor)
        .await?;

        Ok(item)
    }

    pub async fn delete_item<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        item_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM invoice_items WHERE id = $2 AND invoice_id = $1")
            .bind(invoice_id)
            .bind(item_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  PAGAMENTOS
    // =========================================================================

    pub async fn insert_payment<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
        tenant_id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
        transaction_id: Option<&str>,
        status: PaymentStatus,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(&format!(
            r#"
            INSERT INTO payments (invoice_id, tenant_id, amount, method, transaction_id, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(invoice_id)
        .bind(tenant_id)
        .bind(amount)
        .bind(method)
        .bind(transaction_id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn list_payments<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
    ) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE invoice_id = $1 ORDER BY created_at"
        ))
        .bind(invoice_id)
        .fetch_all(executor)
        .await?;

        Ok(payments)
    }

    pub async fn sum_confirmed_payments<'e, E>(
        &self,
        executor: E,
        invoice_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (total,): (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(amount), 0) FROM payments \
             WHERE invoice_id = $1 AND status = 'CONFIRMED'",
        )
        .bind(invoice_id)
        .fetch_one(executor)
        .await?;

        Ok(total)
    }
}
