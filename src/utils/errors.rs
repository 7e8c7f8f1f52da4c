//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Capacity conflict: {0}")]
    CapacityConflict(String),

    #[error("Occupied spots exist: {0}")]
    OccupiedSpotsExist(String),

    #[error("Duplicate active reservation: {0}")]
    DuplicateActiveReservation(String),

    #[error("No available spot: {0}")]
    NoAvailableSpot(String),

    #[error("Clock skew: {0}")]
    ClockSkew(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Hash error: {0}")]
    Hash(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Código estable que el frontend usa para distinguir errores
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::CapacityConflict(_) => "CAPACITY_CONFLICT",
            AppError::OccupiedSpotsExist(_) => "OCCUPIED_SPOTS_EXIST",
            AppError::DuplicateActiveReservation(_) => "DUPLICATE_ACTIVE_RESERVATION",
            AppError::NoAvailableSpot(_) => "NO_AVAILABLE_SPOT",
            AppError::ClockSkew(_) => "CLOCK_SKEW",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Jwt(_) => "JWT_ERROR",
            AppError::Hash(_) => "HASH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Hash(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Validation(_) | AppError::ClockSkew(_) => StatusCode::BAD_REQUEST,
            AppError::CapacityConflict(_)
            | AppError::OccupiedSpotsExist(_)
            | AppError::DuplicateActiveReservation(_)
            | AppError::NoAvailableSpot(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code().to_string();

        let error_response = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                ErrorResponse {
                    error: "Database Error".to_string(),
                    message: "An error occurred while accessing the database".to_string(),
                    details: Some(json!({ "sql_error": e.to_string() })),
                    code,
                }
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ErrorResponse {
                    error: "Internal Server Error".to_string(),
                    message: "An unexpected error occurred".to_string(),
                    details: Some(json!({ "internal_error": msg })),
                    code,
                }
            }
            AppError::Hash(msg) => {
                tracing::error!("Hash error: {}", msg);
                ErrorResponse {
                    error: "Hash Error".to_string(),
                    message: "An error occurred while processing credentials".to_string(),
                    details: None,
                    code,
                }
            }
            other => ErrorResponse {
                error: status.canonical_reason().unwrap_or("Error").to_string(),
                message: other.to_string(),
                details: None,
                code,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_errors_map_to_conflict() {
        let errors = [
            AppError::CapacityConflict("resize".into()),
            AppError::OccupiedSpotsExist("delete".into()),
            AppError::DuplicateActiveReservation("book".into()),
            AppError::NoAvailableSpot("book".into()),
        ];
        for e in errors {
            assert_eq!(e.status_code(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn test_clock_skew_is_bad_request() {
        assert_eq!(
            AppError::ClockSkew("exit before entry".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AppError::NoAvailableSpot(String::new()).code(), "NO_AVAILABLE_SPOT");
        assert_eq!(AppError::NotFound(String::new()).code(), "NOT_FOUND");
        assert_eq!(
            AppError::DuplicateActiveReservation(String::new()).code(),
            "DUPLICATE_ACTIVE_RESERVATION"
        );
    }

    #[test]
    fn test_not_found_helper_message() {
        let err = not_found_error("ParkingLot", "abc");
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("ParkingLot"));
    }
}
