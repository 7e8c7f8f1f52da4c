//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod analytics;
pub mod auth;
pub mod parking_lot;
pub mod parking_spot;
pub mod reservation;
pub mod user;
