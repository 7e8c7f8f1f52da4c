//! Middleware de autenticación JWT
//!
//! Este módulo maneja la autenticación JWT, extracción de tokens
//! y verificación de usuarios autenticados. La identidad verificada se
//! inserta como extensión del request para los handlers.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::models::user::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{verify_token, JwtConfig};

/// Identidad del caller autenticado, extraída del JWT
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl CurrentUser {
    /// Rechaza al caller si no es admin
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role != UserRole::Admin {
            return Err(AppError::Forbidden("Admin privileges required".to_string()));
        }
        Ok(())
    }
}

/// Valida el token Bearer y agrega CurrentUser al request
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Authorization header must be a Bearer token".to_string())
    })?;

    let config = JwtConfig::from(&state.config);
    let claims = verify_token(token, &config)?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Jwt("Invalid token subject".to_string()))?;

    request.extensions_mut().insert(CurrentUser {
        id: user_id,
        role: claims.role,
    });

    Ok(next.run(request).await)
}
