//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de entrada del motor de reservas.

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::utils::errors::{AppError, AppResult};

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que la tarifa horaria sea positiva
pub fn require_positive_rate(rate: Decimal) -> AppResult<()> {
    if rate <= Decimal::ZERO {
        return Err(AppError::Validation(
            "hourly_rate must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Validar que la capacidad sea al menos 1
pub fn require_valid_capacity(capacity: i32) -> AppResult<()> {
    if capacity < 1 {
        return Err(AppError::Validation(
            "capacity must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Validar que los campos de texto requeridos no estén en blanco
pub fn require_non_blank(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_rate_must_be_positive() {
        assert!(require_positive_rate(Decimal::new(105, 1)).is_ok()); // 10.5
        assert!(require_positive_rate(Decimal::ZERO).is_err());
        assert!(require_positive_rate(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_capacity_must_be_at_least_one() {
        assert!(require_valid_capacity(1).is_ok());
        assert!(require_valid_capacity(250).is_ok());
        assert!(require_valid_capacity(0).is_err());
        assert!(require_valid_capacity(-3).is_err());
    }

    #[test]
    fn test_blank_fields_rejected() {
        assert!(require_non_blank("name", "Centro").is_ok());
        assert!(require_non_blank("name", "   ").is_err());
        assert!(require_non_blank("address", "").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("x").is_ok());
        assert!(validate_not_empty(" ").is_err());
    }
}
