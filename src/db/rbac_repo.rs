// src/db/rbac_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Cargos do usuário (tags planas em minúsculas, ex: "gerente").
    pub async fn list_user_roles<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT role_slug FROM user_roles WHERE user_id = $1 ORDER BY role_slug")
                .bind(user_id)
                .fetch_all(executor)
                .await?;

        Ok(rows.into_iter().map(|(slug,)| slug).collect())
    }

    /// Tokens de permissão efetivos do usuário, via seus cargos.
    pub async fn list_user_permission_slugs<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT rp.permission_slug
            FROM user_roles ur
            JOIN role_permissions rp ON rp.role_slug = ur.role_slug
            WHERE ur.user_id = $1
            ORDER BY rp.permission_slug
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(|(slug,)| slug).collect())
    }

    /// Substitui o conjunto de permissões de um cargo.
    /// Recebe a conexão da transação: apagar + reinserir precisa ser atômico.
    pub async fn set_role_permissions(
        &self,
        conn: &mut sqlx::PgConnection,
        role_slug: &str,
        permission_slugs: &[String],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM role_permissions WHERE role_slug = $1")
            .bind(role_slug)
            .execute(&mut *conn)
            .await?;

        for slug in permission_slugs {
            sqlx::query(
                "INSERT INTO role_permissions (role_slug, permission_slug) VALUES ($1, $2)",
            )
            .bind(role_slug)
            .bind(slug)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    pub async fn list_role_permissions<'e, E>(
        &self,
        executor: E,
        role_slug: &str,
    ) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT permission_slug FROM role_permissions WHERE role_slug = $1 ORDER BY permission_slug",
        )
        .bind(role_slug)
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(|(slug,)| slug).collect())
    }
}
