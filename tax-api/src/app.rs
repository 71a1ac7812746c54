use axum::{
    Router, middleware,
    routing::{get, post},
};
use tax_core::TaxService;
use tax_core::db::RepositoryRegistry;
use tax_db_sqlite::SqliteRepositoryFactory;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::auth;
use crate::config::{AdminCredentials, AppInfo};
use crate::error::panic_response;
use crate::handlers;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: TaxService,
    pub admin: AdminCredentials,
    pub app_info: AppInfo,
}

impl AppState {
    pub fn new(
        service: TaxService,
        admin: AdminCredentials,
        app_info: AppInfo,
    ) -> Self {
        Self {
            service,
            admin,
            app_info,
        }
    }
}

/// Registry with every storage backend compiled into this binary.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// All routes. Only `/admin` sits behind basic auth.
pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route(
            "/deductions/personal",
            post(handlers::set_personal_deduction),
        )
        .route(
            "/deductions/k-receipt",
            post(handlers::set_k_receipt_deduction),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/tax/calculations", post(handlers::calculate_tax))
        .route("/tax/calculations/upload-csv", post(handlers::upload_csv))
        .nest("/admin", admin)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
