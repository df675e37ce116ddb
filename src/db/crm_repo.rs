// src/db/crm_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::crm::{Lead, LeadStage},
};

const LEAD_COLUMNS: &str = "id, first_name, last_name, email, phone, source, notes, \
     stage, converted_tenant_id, created_at, updated_at";

#[derive(Clone)]
pub struct CrmRepository {
    pool: PgPool,
}

impl CrmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn create_lead<'e, E>(
        &self,
        executor: E,
        first_name: &str,
        last_name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        source: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            r#"
            INSERT INTO leads (first_name, last_name, email, phone, source, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(phone)
        .bind(source)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(lead)
    }

    pub async fn list_leads<'e, E>(
        &self,
        executor: E,
        stage: Option<LeadStage>,
    ) -> Result<Vec<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let leads = sqlx::query_as::<_, Lead>(&format!(
            r#"
            SELECT {LEAD_COLUMNS}
            FROM leads
            WHERE ($1::lead_stage IS NULL OR stage = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(stage)
        .fetch_all(executor)
        .await?;

        Ok(leads)
    }

    pub async fn get_lead<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(lead)
    }

    pub async fn update_lead<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        first_name: &str,
        last_name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        source: Option<&str>,
        notes: Option<&str>,
        stage: LeadStage,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            r#"
            UPDATE leads
            SET first_name = $2, last_name = $3, email = $4, phone = $5,
                source = $6, notes = $7, stage = $8, updated_at = now()
            WHERE id = $1
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(phone)
        .bind(source)
        .bind(notes)
        .bind(stage)
        .fetch_optional(executor)
        .await?;

        Ok(lead)
    }

    /// Marca o lead como convertido, no máximo uma vez: a cláusula
    /// `converted_tenant_id IS NULL` garante que dois submits concorrentes
    /// nunca convertam o mesmo lead duas vezes.
    pub async fn mark_converted<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        tenant_id: Uuid,
    ) -> Result<Option<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            r#"
            UPDATE leads
            SET converted_tenant_id = $2, updated_at = now()
            WHERE id = $1 AND converted_tenant_id IS NULL
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;

        Ok(lead)
    }

    pub async fn delete_lead<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
