// src/services/unit_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UnitRepository,
    models::units::{Unit, UnitStatus},
};

#[derive(Clone)]
pub struct UnitService {
    repo: UnitRepository,
}

impl UnitService {
    pub fn new(repo: UnitRepository) -> Self {
        Self { repo }
    }

    pub async fn create_unit(
        &self,
        pool: &PgPool,
        code: &str,
        floor: Option<&str>,
        size_m2: Option<Decimal>,
        monthly_price: Decimal,
    ) -> Result<Unit, AppError> {
        self.repo
            .create_unit(pool, code, floor, size_m2, monthly_price)
            .await
    }

    /// Listagem com filtro de status; a seleção do assistente de conversão
    /// usa `status=LIVRE`.
    pub async fn list_units(
        &self,
        pool: &PgPool,
        status: Option<UnitStatus>,
    ) -> Result<Vec<Unit>, AppError> {
        self.repo.list_units(pool, status).await
    }

    pub async fn get_unit(&self, pool: &PgPool, id: Uuid) -> Result<Unit, AppError> {
        self.repo
            .get_unit(pool, id)
            .await?
            .ok_or(AppError::NotFound("Box"))
    }

    pub async fn update_unit(
        &self,
        pool: &PgPool,
        id: Uuid,
        code: &str,
        floor: Option<&str>,
        size_m2: Option<Decimal>,
        monthly_price: Decimal,
        status: UnitStatus,
    ) -> Result<Unit, AppError> {
        self.repo
            .update_unit(pool, id, code, floor, size_m2, monthly_price, status)
            .await?
            .ok_or(AppError::NotFound("Box"))
    }

    pub async fn delete_unit(&self, pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
        self.repo.delete_unit(pool, id).await
    }
}
