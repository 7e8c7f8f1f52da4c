//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: el registro
//! de lots, la asignación de spots, el ledger de reservas y la
//! autenticación de usuarios.

pub mod auth_service;
pub mod booking_service;
pub mod lot_service;
pub mod reservation_service;
