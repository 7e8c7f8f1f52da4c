//! Modelo de ParkingLot
//!
//! Este módulo contiene el struct ParkingLot y sus variantes para CRUD
//! operations. Mapea exactamente a la tabla parking_lots del schema.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::parking_spot::SpotResponse;

/// ParkingLot principal - mapea exactamente a la tabla parking_lots.
/// Invariante: capacity es igual al número de spots del lot.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ParkingLot {
    pub id: Uuid,
    pub name: String,
    pub hourly_rate: Decimal,
    pub address: String,
    pub postal_code: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

/// Request para crear un nuevo parking lot
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLotRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub hourly_rate: Decimal,

    #[validate(length(min = 1, max = 200))]
    pub address: String,

    #[validate(length(min = 1, max = 10))]
    pub postal_code: String,

    #[validate(range(min = 1))]
    pub capacity: i32,
}

/// Request para actualizar los metadatos de un lot (sin tocar capacity)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLotRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub hourly_rate: Decimal,

    #[validate(length(min = 1, max = 200))]
    pub address: String,

    #[validate(length(min = 1, max = 10))]
    pub postal_code: String,
}

/// Request para cambiar la capacidad de un lot
#[derive(Debug, Deserialize, Validate)]
pub struct ResizeLotRequest {
    #[validate(range(min = 1))]
    pub capacity: i32,
}

/// Response de lot con conteos de ocupación para listados
#[derive(Debug, Serialize)]
pub struct LotSummaryResponse {
    pub id: Uuid,
    pub name: String,
    pub hourly_rate: Decimal,
    pub address: String,
    pub postal_code: String,
    pub capacity: i32,
    pub total_spots: i64,
    pub occupied_spots: i64,
    pub available_spots: i64,
}

/// Fila agregada de ocupación por lot
#[derive(Debug, FromRow)]
pub struct LotOccupancyRow {
    pub id: Uuid,
    pub name: String,
    pub hourly_rate: Decimal,
    pub address: String,
    pub postal_code: String,
    pub capacity: i32,
    pub total_spots: i64,
    pub occupied_spots: i64,
}

impl From<LotOccupancyRow> for LotSummaryResponse {
    fn from(row: LotOccupancyRow) -> Self {
        let available = row.total_spots - row.occupied_spots;
        Self {
            id: row.id,
            name: row.name,
            hourly_rate: row.hourly_rate,
            address: row.address,
            postal_code: row.postal_code,
            capacity: row.capacity,
            total_spots: row.total_spots,
            occupied_spots: row.occupied_spots,
            available_spots: available,
        }
    }
}

/// Response detallada de un lot con todos sus spots
#[derive(Debug, Serialize)]
pub struct LotDetailResponse {
    pub lot: LotSummaryResponse,
    pub spots: Vec<SpotResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_request_rejects_blank_name() {
        let request = CreateLotRequest {
            name: "".to_string(),
            hourly_rate: Decimal::new(100, 1),
            address: "Calle Mayor 1".to_string(),
            postal_code: "28001".to_string(),
            capacity: 10,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_zero_capacity() {
        let request = CreateLotRequest {
            name: "Centro".to_string(),
            hourly_rate: Decimal::new(100, 1),
            address: "Calle Mayor 1".to_string(),
            postal_code: "28001".to_string(),
            capacity: 0,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_summary_computes_available_spots() {
        let row = LotOccupancyRow {
            id: Uuid::new_v4(),
            name: "Centro".to_string(),
            hourly_rate: Decimal::new(105, 1),
            address: "Calle Mayor 1".to_string(),
            postal_code: "28001".to_string(),
            capacity: 10,
            total_spots: 10,
            occupied_spots: 3,
        };
        let summary = LotSummaryResponse::from(row);
        assert_eq!(summary.available_spots, 7);
    }
}
