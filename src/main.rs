//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

// Importações principais
use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let crm_routes = Router::new()
        .route(
            "/",
            post(handlers::crm::create_lead).get(handlers::crm::list_leads),
        )
        .route(
            "/{id}",
            get(handlers::crm::get_lead)
                .patch(handlers::crm::update_lead)
                .delete(handlers::crm::delete_lead),
        )
        // O endpoint transacional da conversão: uma requisição, tudo-ou-nada
        .route("/{id}/convert", post(handlers::crm::convert_lead))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let tenant_routes = Router::new()
        .route(
            "/",
            post(handlers::tenants::create_tenant).get(handlers::tenants::list_tenants),
        )
        .route(
            "/{id}",
            get(handlers::tenants::get_tenant)
                .patch(handlers::tenants::update_tenant)
                .delete(handlers::tenants::delete_tenant),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let unit_routes = Router::new()
        .route(
            "/",
            post(handlers::units::create_unit).get(handlers::units::list_units),
        )
        .route(
            "/{id}",
            get(handlers::units::get_unit)
                .patch(handlers::units::update_unit)
                .delete(handlers::units::delete_unit),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let contract_routes = Router::new()
        .route(
            "/",
            post(handlers::contracts::create_contract).get(handlers::contracts::list_contracts),
        )
        .route(
            "/{id}",
            get(handlers::contracts::get_contract)
                .patch(handlers::contracts::update_contract)
                .delete(handlers::contracts::delete_contract),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let billing_routes = Router::new()
        .route(
            "/",
            post(handlers::billing::create_invoice).get(handlers::billing::list_invoices),
        )
        .route("/record-payment", post(handlers::billing::record_payment))
        .route("/mark-overdue", post(handlers::billing::mark_overdue))
        .route(
            "/{id}",
            get(handlers::billing::get_invoice)
                .patch(handlers::billing::update_invoice)
                .delete(handlers::billing::delete_invoice),
        )
        .route("/{id}/void", patch(handlers::billing::void_invoice))
        .route("/{id}/document", get(handlers::billing::download_invoice))
        .route(
            "/{id}/items",
            post(handlers::billing::add_invoice_item),
        )
        .route(
            "/{id}/items/{item_id}",
            patch(handlers::billing::update_invoice_item)
                .delete(handlers::billing::delete_invoice_item),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let rbac_routes = Router::new()
        .route("/", post(handlers::rbac::create_role))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/permissions", get(handlers::rbac::list_permissions))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/leads", crm_routes)
        .nest("/api/tenants", tenant_routes)
        .nest("/api/units", unit_routes)
        .nest("/api/contracts", contract_routes)
        .nest("/api/invoices", billing_routes)
        .nest("/api/roles", rbac_routes)
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
