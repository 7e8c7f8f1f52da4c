//! Servicio de autenticación
//!
//! Registro y login de usuarios con bcrypt + JWT. El motor de reservas
//! no conoce sesiones: recibe la identidad como parámetros explícitos.

use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::models::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::models::user::{UserResponse, UserRole};
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthService {
    repository: UserRepository,
    jwt_config: JwtConfig,
}

impl AuthService {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            jwt_config: JwtConfig::from(config),
        }
    }

    /// Registra un usuario normal. Los admins se crean con el seed inicial.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<UserResponse> {
        request.validate()?;

        if self.repository.username_exists(&request.username).await? {
            return Err(AppError::Validation(format!(
                "username '{}' already exists",
                request.username
            )));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let user = self
            .repository
            .create(request.username, password_hash, UserRole::User)
            .await?;

        Ok(UserResponse::from(user))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;

        let user = self
            .repository
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        if !valid {
            return Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        let token = generate_token(user.id, user.role(), &self.jwt_config)?;

        Ok(LoginResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    /// Crea la cuenta admin si todavía no existe
    pub async fn seed_admin(&self, username: &str, password: &str) -> AppResult<()> {
        if self.repository.username_exists(username).await? {
            return Ok(());
        }

        let password_hash =
            hash(password, DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))?;

        self.repository
            .create(username.to_string(), password_hash, UserRole::Admin)
            .await?;

        info!("👤 Usuario admin '{}' creado", username);
        Ok(())
    }
}
