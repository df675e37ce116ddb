// src/services/conversion_service.rs
//
// Conversão de lead ganho em cliente + contrato: um assistente linear de
// quatro etapas e um submit transacional. A máquina de etapas é pura e
// testável sem banco; o efeito acontece inteiro em uma transação só.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ContractRepository, CrmRepository, TenantRepository, UnitRepository},
    models::{
        contracts::ContractStatus,
        crm::Lead,
        tenants::CustomerCategory,
        units::UnitStatus,
    },
};

// =============================================================================
//  A MÁQUINA DE ETAPAS (pura)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStep {
    TenantInfo,
    UnitSelection,
    ContractTerms,
    Confirmation,
}

impl ConversionStep {
    fn next(&self) -> Option<ConversionStep> {
        match self {
            ConversionStep::TenantInfo => Some(ConversionStep::UnitSelection),
            ConversionStep::UnitSelection => Some(ConversionStep::ContractTerms),
            ConversionStep::ContractTerms => Some(ConversionStep::Confirmation),
            ConversionStep::Confirmation => None,
        }
    }

    fn previous(&self) -> Option<ConversionStep> {
        match self {
            ConversionStep::TenantInfo => None,
            ConversionStep::UnitSelection => Some(ConversionStep::TenantInfo),
            ConversionStep::ContractTerms => Some(ConversionStep::UnitSelection),
            ConversionStep::Confirmation => Some(ConversionStep::ContractTerms),
        }
    }
}

/// Dados da etapa 1, pré-preenchidos com o contato do lead.
#[derive(Debug, Clone, Default)]
pub struct TenantInfoForm {
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub category: Option<CustomerCategory>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Dados da etapa 3.
#[derive(Debug, Clone, Default)]
pub struct ContractTermsForm {
    pub move_in: Option<NaiveDate>,
    pub move_out: Option<NaiveDate>,
    pub monthly_rate: Option<Decimal>,
    pub deposit: Option<Decimal>,
    pub terms: String,
    pub notes: Option<String>,
}

/// Pedido pronto para o submit, montado só quando todas as etapas validaram.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub tenant: TenantInfoForm,
    pub unit_id: Uuid,
    pub terms: ContractTermsForm,
}

#[derive(Debug)]
pub struct ConversionWizard {
    lead_id: Uuid,
    step: ConversionStep,
    pub tenant_info: TenantInfoForm,
    pub selected_unit: Option<Uuid>,
    pub terms: ContractTermsForm,
    submitting: bool,
}

impl ConversionWizard {
    /// Guarda de entrada: só abre para lead GANHO e nunca convertido.
    /// Vale na primeira E na segunda tentativa — reentrar num lead já
    /// convertido falha aqui, sem nenhum efeito colateral.
    pub fn begin(lead: &Lead) -> Result<Self, AppError> {
        if lead.converted_tenant_id.is_some() {
            return Err(AppError::LeadAlreadyConverted);
        }
        if !lead.can_convert() {
            return Err(AppError::LeadNotConvertible);
        }

        Ok(Self {
            lead_id: lead.id,
            step: ConversionStep::TenantInfo,
            tenant_info: TenantInfoForm {
                first_name: lead.first_name.clone(),
                last_name: lead.last_name.clone().unwrap_or_default(),
                email: lead.email.clone(),
                phone: lead.phone.clone(),
                ..Default::default()
            },
            selected_unit: None,
            terms: ContractTermsForm::default(),
            submitting: false,
        })
    }

    pub fn lead_id(&self) -> Uuid {
        self.lead_id
    }

    pub fn step(&self) -> ConversionStep {
        self.step
    }

    /// Avança uma etapa. Só passa se a etapa atual validar; os erros de
    /// todos os campos voltam juntos.
    pub fn advance(&mut self, today: NaiveDate) -> Result<(), AppError> {
        self.validate_current(today)?;
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(())
    }

    /// Volta uma etapa preservando tudo que já foi digitado.
    pub fn back(&mut self) {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
        }
    }

    fn validate_current(&self, today: NaiveDate) -> Result<(), AppError> {
        match self.step {
            ConversionStep::TenantInfo => self.validate_tenant_info(),
            ConversionStep::UnitSelection => self.validate_unit_selection(),
            ConversionStep::ContractTerms => self.validate_terms(today),
            ConversionStep::Confirmation => Ok(()),
        }
    }

    fn validate_tenant_info(&self) -> Result<(), AppError> {
        let mut errors: HashMap<String, String> = HashMap::new();
        let info = &self.tenant_info;

        if info.first_name.trim().is_empty() {
            errors.insert("firstName".into(), "required".into());
        }
        if info.last_name.trim().is_empty() {
            errors.insert("lastName".into(), "required".into());
        }
        if info.document.trim().is_empty() {
            errors.insert("document".into(), "required".into());
        }
        if info.category.is_none() {
            errors.insert("category".into(), "required".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::StepValidationError(errors))
        }
    }

    fn validate_unit_selection(&self) -> Result<(), AppError> {
        if self.selected_unit.is_none() {
            let mut errors = HashMap::new();
            errors.insert("unitId".into(), "required".into());
            return Err(AppError::StepValidationError(errors));
        }
        Ok(())
    }

    fn validate_terms(&self, today: NaiveDate) -> Result<(), AppError> {
        let mut errors: HashMap<String, String> = HashMap::new();
        let terms = &self.terms;

        match terms.move_in {
            None => {
                errors.insert("moveIn".into(), "required".into());
            }
            Some(move_in) if move_in < today => {
                errors.insert("moveIn".into(), "past_date".into());
            }
            Some(move_in) => {
                if let Some(move_out) = terms.move_out {
                    if move_out <= move_in {
                        errors.insert("moveOut".into(), "before_move_in".into());
                    }
                }
            }
        }

        match terms.monthly_rate {
            None => {
                errors.insert("monthlyRate".into(), "required".into());
            }
            Some(rate) if rate <= Decimal::ZERO => {
                errors.insert("monthlyRate".into(), "must_be_positive".into());
            }
            Some(_) => {}
        }

        if let Some(deposit) = terms.deposit {
            if deposit < Decimal::ZERO {
                errors.insert("deposit".into(), "must_be_positive".into());
            }
        }

        if terms.terms.trim().is_empty() {
            errors.insert("terms".into(), "required".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::StepValidationError(errors))
        }
    }

    /// Fecha a intenção de submit. Rejeita fora da CONFIRMATION e rejeita
    /// um segundo submit enquanto o primeiro está em voo.
    pub fn begin_submit(&mut self) -> Result<ConversionRequest, AppError> {
        if self.step != ConversionStep::Confirmation {
            let mut errors = HashMap::new();
            errors.insert("step".into(), "confirmation_required".into());
            return Err(AppError::StepValidationError(errors));
        }
        if self.submitting {
            return Err(AppError::DuplicateSubmission);
        }
        self.submitting = true;

        Ok(ConversionRequest {
            tenant: self.tenant_info.clone(),
            // As etapas já validaram; a seleção existe.
            unit_id: self.selected_unit.ok_or(AppError::UnitNotAvailable)?,
            terms: self.terms.clone(),
        })
    }

    /// Submit falhou: libera nova tentativa, permanecendo na CONFIRMATION
    /// com todos os dados intactos.
    pub fn submission_failed(&mut self) {
        self.submitting = false;
    }
}

// =============================================================================
//  O ORQUESTRADOR (efeito transacional)
// =============================================================================

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub tenant_id: Uuid,
    pub contract_id: Uuid,
    pub lead_id: Uuid,
}

#[derive(Clone)]
pub struct ConversionService {
    crm_repo: CrmRepository,
    tenant_repo: TenantRepository,
    unit_repo: UnitRepository,
    contract_repo: ContractRepository,
}

impl ConversionService {
    pub fn new(
        crm_repo: CrmRepository,
        tenant_repo: TenantRepository,
        unit_repo: UnitRepository,
        contract_repo: ContractRepository,
    ) -> Self {
        Self {
            crm_repo,
            tenant_repo,
            unit_repo,
            contract_repo,
        }
    }

    /// Converte o lead dirigindo o assistente de ponta a ponta e aplicando o
    /// efeito em UMA transação: cria o cliente, ocupa o box (escrita
    /// condicional), cria o contrato e marca o lead como convertido.
    /// Qualquer falha desfaz tudo — nunca sobra cliente órfão sem contrato.
    pub async fn convert_lead(
        &self,
        pool: &PgPool,
        lead_id: Uuid,
        tenant_info: TenantInfoForm,
        unit_id: Uuid,
        terms: ContractTermsForm,
        today: NaiveDate,
    ) -> Result<ConversionResult, AppError> {
        let lead = self
            .crm_repo
            .get_lead(pool, lead_id)
            .await?
            .ok_or(AppError::NotFound("Lead"))?;

        // Etapa 1: dados do cliente
        let mut wizard = ConversionWizard::begin(&lead)?;
        wizard.tenant_info = tenant_info;
        wizard.advance(today)?;

        // Etapa 2: seleção do box (precisa estar LIVRE na listagem;
        // a garantia real vem da escrita condicional lá embaixo)
        let unit = self
            .unit_repo
            .get_unit(pool, unit_id)
            .await?
            .ok_or(AppError::NotFound("Box"))?;
        if unit.status != UnitStatus::Livre {
            return Err(AppError::UnitNotAvailable);
        }
        wizard.selected_unit = Some(unit.id);
        wizard.advance(today)?;

        // Etapa 3: termos do contrato
        wizard.terms = terms;
        wizard.advance(today)?;

        // Etapa 4: confirmação
        let request = wizard.begin_submit()?;

        let category = request
            .tenant
            .category
            .ok_or(AppError::LeadNotConvertible)?;

        let mut tx = pool.begin().await?;

        let tenant = self
            .tenant_repo
            .create_tenant(
                &mut *tx,
                &request.tenant.first_name,
                &request.tenant.last_name,
                &request.tenant.document,
                category,
                request.tenant.email.as_deref(),
                request.tenant.phone.as_deref(),
                None,
                None,
            )
            .await?;

        // Quem perder a corrida pelo box cai aqui e a transação desfaz.
        let occupied = self.unit_repo.occupy_unit(&mut *tx, request.unit_id).await?;
        if occupied.is_none() {
            return Err(AppError::UnitNotAvailable);
        }

        // Contrato nasce ATIVO: o box acabou de ser ocupado na mesma transação.
        let contract = self
            .contract_repo
            .create_contract(
                &mut *tx,
                tenant.id,
                request.unit_id,
                request.terms.move_in.ok_or(AppError::LeadNotConvertible)?,
                request.terms.move_out,
                request
                    .terms
                    .monthly_rate
                    .ok_or(AppError::LeadNotConvertible)?,
                request.terms.deposit,
                &request.terms.terms,
                request.terms.notes.as_deref(),
                ContractStatus::Active,
            )
            .await?;

        // Marca exatamente uma vez; concorrente que chegar depois não acha
        // linha com converted_tenant_id nulo e a transação desfaz.
        let marked = self
            .crm_repo
            .mark_converted(&mut *tx, lead.id, tenant.id)
            .await?;
        if marked.is_none() {
            return Err(AppError::LeadAlreadyConverted);
        }

        tx.commit().await?;

        tracing::info!(
            "Lead {} convertido: cliente {} / contrato {}",
            lead.id,
            tenant.id,
            contract.id
        );

        Ok(ConversionResult {
            tenant_id: tenant.id,
            contract_id: contract.id,
            lead_id: lead.id,
        })
    }
}

// =============================================================================
//  TESTES (máquina pura, sem banco)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::crm::LeadStage;
    use chrono::Utc;

    fn won_lead() -> Lead {
        Lead {
            id: Uuid::new_v4(),
            first_name: "Carlos".into(),
            last_name: Some("Pereira".into()),
            email: Some("carlos@email.com".into()),
            phone: Some("+55 11 98888-0000".into()),
            source: None,
            notes: None,
            stage: LeadStage::Won,
            converted_tenant_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 6).unwrap()
    }

    fn filled_wizard() -> ConversionWizard {
        let mut wizard = ConversionWizard::begin(&won_lead()).unwrap();
        wizard.tenant_info.document = "123.456.789-00".into();
        wizard.tenant_info.category = Some(CustomerCategory::Pf);
        wizard.advance(today()).unwrap();

        wizard.selected_unit = Some(Uuid::new_v4());
        wizard.advance(today()).unwrap();

        wizard.terms = ContractTermsForm {
            move_in: Some(today()),
            move_out: None,
            monthly_rate: Some("450.00".parse().unwrap()),
            deposit: None,
            terms: "Contrato padrão de locação de box.".into(),
            notes: None,
        };
        wizard.advance(today()).unwrap();
        wizard
    }

    #[test]
    fn entrada_exige_lead_ganho_e_nao_convertido() {
        let mut lead = won_lead();
        assert!(ConversionWizard::begin(&lead).is_ok());

        lead.stage = LeadStage::Proposal;
        assert!(matches!(
            ConversionWizard::begin(&lead),
            Err(AppError::LeadNotConvertible)
        ));

        lead.stage = LeadStage::Won;
        lead.converted_tenant_id = Some(Uuid::new_v4());
        assert!(matches!(
            ConversionWizard::begin(&lead),
            Err(AppError::LeadAlreadyConverted)
        ));
    }

    #[test]
    fn entrada_em_lead_convertido_rejeita_sempre() {
        // Idempotência da guarda: duas tentativas, duas rejeições, zero efeito.
        let mut lead = won_lead();
        lead.converted_tenant_id = Some(Uuid::new_v4());
        for _ in 0..2 {
            assert!(matches!(
                ConversionWizard::begin(&lead),
                Err(AppError::LeadAlreadyConverted)
            ));
        }
    }

    #[test]
    fn etapa_um_pre_preenche_contato_do_lead() {
        let wizard = ConversionWizard::begin(&won_lead()).unwrap();
        assert_eq!(wizard.step(), ConversionStep::TenantInfo);
        assert_eq!(wizard.tenant_info.first_name, "Carlos");
        assert_eq!(wizard.tenant_info.last_name, "Pereira");
        assert_eq!(wizard.tenant_info.email.as_deref(), Some("carlos@email.com"));
    }

    #[test]
    fn etapa_um_acumula_todos_os_erros_de_uma_vez() {
        let mut wizard = ConversionWizard::begin(&won_lead()).unwrap();
        wizard.tenant_info.first_name = String::new();
        wizard.tenant_info.last_name = String::new();

        match wizard.advance(today()).unwrap_err() {
            AppError::StepValidationError(errors) => {
                // firstName, lastName, document e category faltando, juntos
                assert_eq!(errors.len(), 4);
                assert_eq!(errors.get("firstName").map(String::as_str), Some("required"));
                assert_eq!(errors.get("document").map(String::as_str), Some("required"));
                assert_eq!(errors.get("category").map(String::as_str), Some("required"));
            }
            other => panic!("erro inesperado: {other:?}"),
        }
        // A falha não avança a etapa
        assert_eq!(wizard.step(), ConversionStep::TenantInfo);
    }

    #[test]
    fn etapa_dois_exige_selecao() {
        let mut wizard = ConversionWizard::begin(&won_lead()).unwrap();
        wizard.tenant_info.document = "123".into();
        wizard.tenant_info.category = Some(CustomerCategory::Pj);
        wizard.advance(today()).unwrap();

        assert_eq!(wizard.step(), ConversionStep::UnitSelection);
        assert!(wizard.advance(today()).is_err());

        wizard.selected_unit = Some(Uuid::new_v4());
        assert!(wizard.advance(today()).is_ok());
    }

    #[test]
    fn etapa_tres_valida_datas_e_valores() {
        let mut wizard = ConversionWizard::begin(&won_lead()).unwrap();
        wizard.tenant_info.document = "123".into();
        wizard.tenant_info.category = Some(CustomerCategory::Pf);
        wizard.advance(today()).unwrap();
        wizard.selected_unit = Some(Uuid::new_v4());
        wizard.advance(today()).unwrap();

        wizard.terms = ContractTermsForm {
            move_in: Some(today().pred_opt().unwrap()), // ontem
            move_out: None,
            monthly_rate: None,
            deposit: None,
            terms: String::new(),
            notes: None,
        };

        match wizard.advance(today()).unwrap_err() {
            AppError::StepValidationError(errors) => {
                assert_eq!(errors.get("moveIn").map(String::as_str), Some("past_date"));
                assert_eq!(errors.get("monthlyRate").map(String::as_str), Some("required"));
                assert_eq!(errors.get("terms").map(String::as_str), Some("required"));
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn voltar_preserva_dados_digitados() {
        let mut wizard = filled_wizard();
        assert_eq!(wizard.step(), ConversionStep::Confirmation);

        wizard.back();
        assert_eq!(wizard.step(), ConversionStep::ContractTerms);
        wizard.back();
        assert_eq!(wizard.step(), ConversionStep::UnitSelection);

        // Nada se perdeu
        assert!(wizard.selected_unit.is_some());
        assert_eq!(wizard.tenant_info.document, "123.456.789-00");
        assert!(wizard.terms.monthly_rate.is_some());

        // E dá para avançar de novo sem redigitar
        assert!(wizard.advance(today()).is_ok());
        assert!(wizard.advance(today()).is_ok());
        assert_eq!(wizard.step(), ConversionStep::Confirmation);
    }

    #[test]
    fn voltar_da_primeira_etapa_e_noop() {
        let mut wizard = ConversionWizard::begin(&won_lead()).unwrap();
        wizard.back();
        assert_eq!(wizard.step(), ConversionStep::TenantInfo);
    }

    #[test]
    fn submit_so_na_confirmacao() {
        let mut wizard = ConversionWizard::begin(&won_lead()).unwrap();
        assert!(wizard.begin_submit().is_err());
    }

    #[test]
    fn submit_duplicado_e_rejeitado_em_voo() {
        let mut wizard = filled_wizard();
        assert!(wizard.begin_submit().is_ok());
        assert!(matches!(
            wizard.begin_submit(),
            Err(AppError::DuplicateSubmission)
        ));
    }

    #[test]
    fn falha_no_submit_permite_nova_tentativa_sem_redigitar() {
        let mut wizard = filled_wizard();
        assert!(wizard.begin_submit().is_ok());

        wizard.submission_failed();
        assert_eq!(wizard.step(), ConversionStep::Confirmation);

        let request = wizard.begin_submit().unwrap();
        assert_eq!(request.tenant.document, "123.456.789-00");
    }
}
