pub mod config;
pub mod error;
pub mod handlers;
pub mod infrastructure;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::VaultConfig;
use crate::services::file_service::FileService;
use crate::services::scanner::ScanClient;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub files: Arc<FileService>,
    pub scanner: Arc<dyn ScanClient>,
    pub config: VaultConfig,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route(
            "/files/upload-data",
            post(handlers::files::get_upload_data).layer(from_fn_with_state(
                state.clone(),
                middleware::auth::auth_middleware,
            )),
        )
        .route(
            "/files/confirm",
            post(handlers::files::confirm_upload).layer(from_fn_with_state(
                state.clone(),
                middleware::auth::auth_middleware,
            )),
        )
        .route(
            "/files/read-url",
            get(handlers::files::get_read_url).layer(from_fn_with_state(
                state.clone(),
                middleware::auth::auth_middleware,
            )),
        )
        .with_state(state)
}
