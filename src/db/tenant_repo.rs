// src/db/tenant_repo.rs

use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tenants::{CustomerCategory, Tenant},
};

const TENANT_COLUMNS: &str = "id, first_name, last_name, document, category, email, phone, \
     address, notes, created_at, updated_at";

#[derive(Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_tenant<'e, E>(
        &self,
        executor: E,
        first_name: &str,
        last_name: &str,
        document: &str,
        category: CustomerCategory,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&Value>,
        notes: Option<&str>,
    ) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            r#"
            INSERT INTO tenants (first_name, last_name, document, category, email, phone, address, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TENANT_COLUMNS}
            "#
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(document)
        .bind(category)
        .bind(email)
        .bind(phone)
        .bind(address)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(tenant)
    }

    pub async fn list_tenants<'e, E>(&self, executor: E) -> Result<Vec<Tenant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tenants = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants ORDER BY first_name, last_name"
        ))
        .fetch_all(executor)
        .await?;

        Ok(tenants)
    }

    pub async fn get_tenant<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Tenant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(tenant)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_tenant<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        document: &str,
        category: CustomerCategory,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&Value>,
        notes: Option<&str>,
    ) -> Result<Option<Tenant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tenant = sqlx::query_as::<_, Tenant>(&format!(
            r#"
            UPDATE tenants
            SET first_name = $2, last_name = $3, document = $4, category = $5,
                email = $6, phone = $7, address = $8, notes = $9, updated_at = now()
            WHERE id = $1
            RETURNING {TENANT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(document)
        .bind(category)
        .bind(email)
        .bind(phone)
        .bind(address)
        .bind(notes)
        .fetch_optional(executor)
        .await?;

        Ok(tenant)
    }

    pub async fn delete_tenant<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
