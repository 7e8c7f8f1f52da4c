//! Repositorios de acceso a datos
//!
//! Cada repositorio encapsula el SQL de un agregado. Las operaciones
//! multi-paso del motor corren dentro de una única transacción con locks
//! de fila sobre el lot afectado.

pub mod lot_repository;
pub mod reservation_repository;
pub mod spot_repository;
pub mod user_repository;
