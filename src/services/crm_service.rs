// src/services/crm_service.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CrmRepository,
    models::crm::{Lead, LeadStage},
};

#[derive(Clone)]
pub struct CrmService {
    repo: CrmRepository,
}

impl CrmService {
    pub fn new(repo: CrmRepository) -> Self {
        Self { repo }
    }

    #[allow(clippy::too_many_arguments)]
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
        self.repo
            .create_lead(executor, first_name, last_name, email, phone, source, notes)
            .await
    }

    pub async fn list_leads<'e, E>(
        &self,
        executor: E,
        stage: Option<LeadStage>,
    ) -> Result<Vec<Lead>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_leads(executor, stage).await
    }

    pub async fn get_lead<'e, E>(&self, executor: E, id: Uuid) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .get_lead(executor, id)
            .await?
            .ok_or(AppError::NotFound("Lead"))
    }

    /// Atualiza dados de contato e etapa do funil. Um lead já convertido
    /// está congelado: qualquer alteração posterior é rejeitada.
    #[allow(clippy::too_many_arguments)]
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
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres> + Copy,
    {
        let current = self.get_lead(executor, id).await?;

        if current.converted_tenant_id.is_some() {
            return Err(AppError::LeadAlreadyConverted);
        }

        self.repo
            .update_lead(
                executor, id, first_name, last_name, email, phone, source, notes, stage,
            )
            .await?
            .ok_or(AppError::NotFound("Lead"))
    }

    pub async fn delete_lead<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.delete_lead(executor, id).await
    }
}
