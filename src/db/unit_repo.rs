// src/db/unit_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::units::{Unit, UnitStatus},
};

const UNIT_COLUMNS: &str =
    "id, code, floor, size_m2, monthly_price, status, reserved_until, created_at, updated_at";

#[derive(Clone)]
pub struct UnitRepository {
    pool: PgPool,
}

impl UnitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn create_unit<'e, E>(
        &self,
        executor: E,
        code: &str,
        floor: Option<&str>,
        size_m2: Option<Decimal>,
        monthly_price: Decimal,
    ) -> Result<Unit, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let unit = sqlx::query_as::<_, Unit>(&format!(
            r#"
            INSERT INTO units (code, floor, size_m2, monthly_price)
            VALUES ($1, $2, $3, $4)
            RETURNING {UNIT_COLUMNS}
            "#
        ))
        .bind(code)
        .bind(floor)
        .bind(size_m2)
        .bind(monthly_price)
        .fetch_one(executor)
        .await?;

        Ok(unit)
    }

    pub async fn list_units<'e, E>(
        &self,
        executor: E,
        status: Option<UnitStatus>,
    ) -> Result<Vec<Unit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let units = sqlx::query_as::<_, Unit>(&format!(
            r#"
            SELECT {UNIT_COLUMNS}
            FROM units
            WHERE ($1::unit_status IS NULL OR status = $1)
            ORDER BY code
            "#
        ))
        .bind(status)
        .fetch_all(executor)
        .await?;

        Ok(units)
    }

    pub async fn get_unit<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Unit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let unit = sqlx::query_as::<_, Unit>(&format!(
            "SELECT {UNIT_COLUMNS} FROM units WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(unit)
    }

    pub async fn update_unit<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        code: &str,
        floor: Option<&str>,
        size_m2: Option<Decimal>,
        monthly_price: Decimal,
        status: UnitStatus,
    ) -> Result<Option<Unit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let unit = sqlx::query_as::<_, Unit>(&format!(
            r#"
            UPDATE units
            SET code = $2, floor = $3, size_m2 = $4, monthly_price = $5,
                status = $6, updated_at = now()
            WHERE id = $1
            RETURNING {UNIT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(code)
        .bind(floor)
        .bind(size_m2)
        .bind(monthly_price)
        .bind(status)
        .fetch_optional(executor)
        .await?;

        Ok(unit)
    }

    /// Ocupação otimista: só ocupa se o box ainda estiver LIVRE.
    /// Quem perder a corrida recebe `None` e a transação inteira desfaz.
    pub async fn occupy_unit<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Unit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let unit = sqlx::query_as::<_, Unit>(&format!(
            r#"
            UPDATE units
            SET status = 'OCUPADA', reserved_until = NULL, updated_at = now()
            WHERE id = $1 AND status = 'LIVRE'
            RETURNING {UNIT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(unit)
    }

    /// Libera o box quando o contrato encerra ou é cancelado.
    pub async fn release_unit<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Unit>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let unit = sqlx::query_as::<_, Unit>(&format!(
            r#"
            UPDATE units
            SET status = 'LIVRE', reserved_until = NULL, updated_at = now()
            WHERE id = $1 AND status = 'OCUPADA'
            RETURNING {UNIT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(unit)
    }

    pub async fn delete_unit<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM units WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
