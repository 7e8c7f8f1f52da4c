use axum::{extract::State, routing::post, Json, Router};

use crate::models::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::models::user::UserResponse;
use crate::services::auth_service::AuthService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Configura las rutas de autenticación
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let service = AuthService::new(state.pool.clone(), &state.config);
    let response = service.register(request).await?;
    Ok(Json(response))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let service = AuthService::new(state.pool.clone(), &state.config);
    let response = service.login(request).await?;
    Ok(Json(response))
}
