//! Modelos de Analytics
//!
//! Este módulo contiene los modelos para el resumen de ocupación
//! que alimenta los dashboards de administración.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Distribución de ocupación de un lot
#[derive(Debug, Serialize, FromRow)]
pub struct LotDistributionRow {
    pub lot_id: Uuid,
    pub name: String,
    pub total_spots: i64,
    pub occupied_spots: i64,
    pub available_spots: i64,
}

/// Resumen global de ocupación del sistema
#[derive(Debug, Serialize)]
pub struct OccupancySummaryResponse {
    pub total_lots: i64,
    pub total_spots: i64,
    pub occupied_spots: i64,
    pub available_spots: i64,
    pub lots: Vec<LotDistributionRow>,
}
