pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod users;
pub mod validation;

use std::sync::Arc;
use actix_web::{web, HttpResponse};
use tracing::info;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::AuthService;
pub use db::{DbOperations, MemoryUserStore, User, UserRepository};

/// Health check endpoint handler
/// Returns a JSON response with server status, environment and timestamp
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Registers every route and the JSON body error handler.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::ValidationError(err.to_string()).into()),
    )
    .route("/health", web::get().to(health_check))
    .route("/users/signup", web::post().to(auth::handlers::signup))
    .route("/users/login", web::post().to(auth::handlers::login))
    .route("/users", web::get().to(users::list_users))
    .route("/users/{user_id}", web::get().to(users::get_user))
    .route("/users/{user_id}", web::put().to(users::update_user));
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub store: Arc<dyn UserRepository>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Connects to Postgres and applies migrations when enabled.
    pub async fn new(config: Settings) -> Result<Self> {
        let db = DbOperations::connect(&config.database).await?;
        if config.database.run_migrations {
            db.run_migrations().await?;
        }
        info!("Account store ready");

        Ok(Self::with_store(config, Arc::new(db)))
    }

    pub fn with_store(config: Settings, store: Arc<dyn UserRepository>) -> Self {
        let auth_service = AuthService::new(store.clone(), &config.auth);
        Self {
            config: Arc::new(config),
            store,
            auth_service: Arc::new(auth_service),
        }
    }
}
