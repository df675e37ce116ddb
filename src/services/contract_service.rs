// src/services/contract_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, status_machine::StatusMachine},
    db::{ContractRepository, UnitRepository},
    models::contracts::{Contract, ContractStatus},
};

#[derive(Clone)]
pub struct ContractService {
    repo: ContractRepository,
    unit_repo: UnitRepository,
}

impl ContractService {
    pub fn new(repo: ContractRepository, unit_repo: UnitRepository) -> Self {
        Self { repo, unit_repo }
    }

    /// Criação direta (fora da conversão). Nasce DRAFT ou ACTIVE; nascer
    /// ACTIVE ocupa o box na mesma transação, com escrita condicional.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_contract(
        &self,
        pool: &PgPool,
        tenant_id: Uuid,
        unit_id: Uuid,
        move_in: NaiveDate,
        move_out: Option<NaiveDate>,
        monthly_rate: Decimal,
        deposit: Option<Decimal>,
        terms: &str,
        notes: Option<&str>,
        initial_status: ContractStatus,
    ) -> Result<Contract, AppError> {
        // DRAFT é o estado inicial da máquina; ACTIVE é DRAFT -> ACTIVE na criação.
        if initial_status != ContractStatus::Draft {
            ContractStatus::Draft.assert_transition(initial_status)?;
        }

        let mut tx = pool.begin().await?;

        if initial_status == ContractStatus::Active {
            let occupied = self.unit_repo.occupy_unit(&mut *tx, unit_id).await?;
            if occupied.is_none() {
                return Err(AppError::UnitNotAvailable);
            }
        }

        let contract = self
            .repo
            .create_contract(
                &mut *tx,
                tenant_id,
                unit_id,
                move_in,
                move_out,
                monthly_rate,
                deposit,
                terms,
                notes,
                initial_status,
            )
            .await?;

        tx.commit().await?;
        Ok(contract)
    }

    pub async fn list_contracts(
        &self,
        pool: &PgPool,
        status: Option<ContractStatus>,
        tenant_id: Option<Uuid>,
    ) -> Result<Vec<Contract>, AppError> {
        self.repo.list_contracts(pool, status, tenant_id).await
    }

    pub async fn get_contract(&self, pool: &PgPool, id: Uuid) -> Result<Contract, AppError> {
        self.repo
            .get_contract(pool, id)
            .await?
            .ok_or(AppError::NotFound("Contrato"))
    }

    /// Atualização guardada: terminal congela tudo; mudança de status passa
    /// pela tabela de transições ANTES de qualquer escrita; a ocupação do box
    /// acompanha o contrato na mesma transação.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_contract(
        &self,
        pool: &PgPool,
        id: Uuid,
        move_in: NaiveDate,
        move_out: Option<NaiveDate>,
        monthly_rate: Decimal,
        deposit: Option<Decimal>,
        terms: &str,
        notes: Option<&str>,
        target_status: Option<ContractStatus>,
    ) -> Result<Contract, AppError> {
        let mut tx = pool.begin().await?;

        let current = self
            .repo
            .get_contract(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Contrato"))?;

        // CLOSED e CANCELED: nenhum campo muda mais.
        current.status.assert_mutable()?;

        let new_status = target_status.unwrap_or(current.status);
        current.status.assert_transition(new_status)?;

        if new_status != current.status {
            match new_status {
                ContractStatus::Active => {
                    let occupied = self
                        .unit_repo
                        .occupy_unit(&mut *tx, current.unit_id)
                        .await?;
                    if occupied.is_none() {
                        return Err(AppError::UnitNotAvailable);
                    }
                }
                ContractStatus::Closed | ContractStatus::Canceled => {
                    // Encerrou ou cancelou: o box volta para o estoque livre.
                    self.unit_repo.release_unit(&mut *tx, current.unit_id).await?;
                }
                _ => {}
            }
        }

        // Escrita condicional no status lido: se outro ator transicionou o
        // contrato no meio do caminho, não afetamos linha nenhuma e o
        // conflito sobe como transição inválida (a rejeição do servidor é
        // a autoritativa).
        let updated = self
            .repo
            .update_contract(
                &mut *tx,
                id,
                move_in,
                move_out,
                monthly_rate,
                deposit,
                terms,
                notes,
                new_status,
                current.status,
            )
            .await?;

        let contract = match updated {
            Some(c) => c,
            None => {
                return Err(AppError::InvalidTransition {
                    from: current.status.as_str(),
                    to: new_status.as_str(),
                });
            }
        };

        tx.commit().await?;

        if new_status != current.status {
            tracing::info!(
                "Contrato {} transicionado: {} -> {}",
                id,
                current.status.as_str(),
                new_status.as_str()
            );
        }

        Ok(contract)
    }

    /// Só contrato em rascunho pode ser excluído; ACTIVE encerra pela máquina.
    pub async fn delete_contract(&self, pool: &PgPool, id: Uuid) -> Result<(), AppError> {
        let contract = self
            .repo
            .get_contract(pool, id)
            .await?
            .ok_or(AppError::NotFound("Contrato"))?;

        if contract.status != ContractStatus::Draft {
            return Err(AppError::DeleteNotAllowed {
                status: contract.status.as_str(),
            });
        }

        self.repo.delete_contract(pool, id).await?;
        Ok(())
    }
}
