// src/services/tenant_service.rs

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TenantRepository,
    models::tenants::{CustomerCategory, Tenant},
};

#[derive(Clone)]
pub struct TenantService {
    repo: TenantRepository,
}

impl TenantService {
    pub fn new(repo: TenantRepository) -> Self {
        Self { repo }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_tenant(
        &self,
        pool: &PgPool,
        first_name: &str,
        last_name: &str,
        document: &str,
        category: CustomerCategory,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&Value>,
        notes: Option<&str>,
    ) -> Result<Tenant, AppError> {
        self.repo
            .create_tenant(
                pool, first_name, last_name, document, category, email, phone, address, notes,
            )
            .await
    }

    pub async fn list_tenants(&self, pool: &PgPool) -> Result<Vec<Tenant>, AppError> {
        self.repo.list_tenants(pool).await
    }

    pub async fn get_tenant(&self, pool: &PgPool, id: Uuid) -> Result<Tenant, AppError> {
        self.repo
            .get_tenant(pool, id)
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_tenant(
        &self,
        pool: &PgPool,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        document: &str,
        category: CustomerCategory,
        email: Option<&str>,
        phone: Option<&str>,
        address: Option<&Value>,
        notes: Option<&str>,
    ) -> Result<Tenant, AppError> {
        self.repo
            .update_tenant(
                pool, id, first_name, last_name, document, category, email, phone, address, notes,
            )
            .await?
            .ok_or(AppError::NotFound("Cliente"))
    }

    pub async fn delete_tenant(&self, pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        self.repo.delete_tenant(pool, id).await
    }
}
