// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        BillingRepository, ContractRepository, CrmRepository, RbacRepository, TenantRepository,
        UnitRepository, UserRepository,
    },
    services::{
        auth::AuthService, billing_service::BillingService, contract_service::ContractService,
        conversion_service::ConversionService, crm_service::CrmService,
        document_service::DocumentService, tenant_service::TenantService,
        unit_service::UnitService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,

    pub auth_service: AuthService,
    pub rbac_repo: RbacRepository,

    pub crm_service: CrmService,
    pub conversion_service: ConversionService,
    pub tenant_service: TenantService,
    pub unit_service: UnitService,
    pub contract_service: ContractService,
    pub billing_service: BillingService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let rbac_repo = RbacRepository::new(db_pool.clone());
        let crm_repo = CrmRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let unit_repo = UnitRepository::new(db_pool.clone());
        let contract_repo = ContractRepository::new(db_pool.clone());
        let billing_repo = BillingRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret.clone());
        let crm_service = CrmService::new(crm_repo.clone());
        let conversion_service = ConversionService::new(
            crm_repo,
            tenant_repo.clone(),
            unit_repo.clone(),
            contract_repo.clone(),
        );
        let tenant_service = TenantService::new(tenant_repo.clone());
        let unit_service = UnitService::new(unit_repo.clone());
        let contract_service = ContractService::new(contract_repo, unit_repo);
        let billing_service = BillingService::new(billing_repo.clone());
        let document_service = DocumentService::new(billing_repo, tenant_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            rbac_repo,
            crm_service,
            conversion_service,
            tenant_service,
            unit_service,
            contract_service,
            billing_service,
            document_service,
        })
    }
}
