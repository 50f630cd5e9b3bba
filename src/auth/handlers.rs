use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use crate::AppState;
use crate::db::models::{NewUser, User};
use crate::error::AppError;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub msg: &'static str,
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// POST /users/signup
pub async fn signup(
    req: web::Json<NewUser>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received signup request");

    match state.auth_service.register(req.into_inner()).await {
        Ok(registration) => {
            info!("Signup successful for user {}", registration.user.id);
            Ok(HttpResponse::Ok().json(SignupResponse {
                msg: "user item was created successfully",
                user: registration.user,
                token: registration.tokens.token,
                refresh_token: registration.tokens.refresh_token,
            }))
        }
        Err(e) => {
            warn!("Signup failed: {}", e);
            Err(e)
        }
    }
}

/// POST /users/login
pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request");

    match state.auth_service.authenticate(&req.email, &req.password).await {
        Ok(tokens) => Ok(HttpResponse::Ok().json(tokens)),
        Err(e) => {
            warn!("Login failed: {}", e);
            Err(e)
        }
    }
}
