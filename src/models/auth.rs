//! Modelos de autenticación
//!
//! Requests y responses de registro y login de usuarios.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::UserResponse;

/// Request de registro de usuario
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 80))]
    pub username: String,

    #[validate(length(min = 6, max = 120))]
    pub password: String,
}

/// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Response de login con el token JWT emitido
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}
