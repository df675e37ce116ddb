// src/db/contract_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::contracts::{Contract, ContractStatus},
};

const CONTRACT_COLUMNS: &str = "id, tenant_id, unit_id, move_in, move_out, monthly_rate, \
     deposit, terms, notes, status, audit_ref, billing_ref, created_at, updated_at";

#[derive(Clone)]
pub struct ContractRepository {
    pool: PgPool,
}

impl ContractRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_contract<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        unit_id: Uuid,
        move_in: NaiveDate,
        move_out: Option<NaiveDate>,
        monthly_rate: Decimal,
        deposit: Option<Decimal>,
        terms: &str,
        notes: Option<&str>,
        status: ContractStatus,
    ) -> Result<Contract, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contract = sqlx::query_as::<_, Contract>(&format!(
            r#"
            INSERT INTO contracts
                (tenant_id, unit_id, move_in, move_out, monthly_rate, deposit, terms, notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {CONTRACT_COLUMNS}
            "#
        ))
        .bind(tenant_id)
        .bind(unit_id)
        .bind(move_in)
        .bind(move_out)
        .bind(monthly_rate)
        .bind(deposit)
        .bind(terms)
        .bind(notes)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(contract)
    }

    pub async fn list_contracts<'e, E>(
        &self,
        executor: E,
        status: Option<ContractStatus>,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<Contract>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contracts = sqlx::query_as::<_, Contract>(&format!(
            r#"
            SELECT {CONTRACT_COLUMNS}
            FROM contracts
            WHERE ($1::contract_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR tenant_id = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(status)
        .bind(tenant_id)
        .fetch_all(executor)
        .await?;

        Ok(contracts)
    }

    pub async fn get_contract<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Contract>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contract = sqlx::query_as::<_, Contract>(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM contracts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(contract)
    }

    /// Atualiza campos + status. A cláusula `status = $10` no WHERE é a
    /// defesa contra leituras desatualizadas: se outro ator já transicionou
    /// o contrato, nenhuma linha é afetada e o chamador trata o conflito.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_contract<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        move_in: NaiveDate,
        move_out: Option<NaiveDate>,
        monthly_rate: Decimal,
        deposit: Option<Decimal>,
        terms: &str,
        notes: Option<&str>,
        new_status: ContractStatus,
        expected_status: ContractStatus,
    ) -> Result<Option<Contract>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let contract = sqlx::query_as::<_, Contract>(&format!(
            r#"
            UPDATE contracts
            SET move_in = $2, move_out = $3, monthly_rate = $4, deposit = $5,
                terms = $6, notes = $7, status = $8, updated_at = now()
            WHERE id = $1 AND status = $9
            RETURNING {CONTRACT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(move_in)
        .bind(move_out)
        .bind(monthly_rate)
        .bind(deposit)
        .bind(terms)
        .bind(notes)
        .bind(new_status)
        .bind(expected_status)
        .fetch_optional(executor)
        .await?;

        Ok(contract)
    }

    pub async fn delete_contract<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
