//! Modelo de ParkingSpot
//!
//! Un spot numerado dentro de un lot, disponible u ocupado.
//! Mapea exactamente a la tabla parking_spots del schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado del spot - en la tabla se guarda como texto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    Available,
    Occupied,
}

impl SpotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotStatus::Available => "available",
            SpotStatus::Occupied => "occupied",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(SpotStatus::Available),
            "occupied" => Some(SpotStatus::Occupied),
            _ => None,
        }
    }
}

/// ParkingSpot principal - mapea exactamente a la tabla parking_spots.
/// Invariante: status es occupied si y solo si existe exactamente una
/// reserva abierta que referencia este spot.
#[derive(Debug, Clone, FromRow)]
pub struct ParkingSpot {
    pub id: Uuid,
    pub lot_id: Uuid,
    pub spot_number: i32,
    pub status: String,
}

impl ParkingSpot {
    pub fn status(&self) -> SpotStatus {
        SpotStatus::parse(&self.status).unwrap_or(SpotStatus::Available)
    }

    pub fn is_occupied(&self) -> bool {
        self.status() == SpotStatus::Occupied
    }
}

/// Detalles de la reserva abierta que ocupa un spot
#[derive(Debug, Serialize, FromRow)]
pub struct SpotReservationInfo {
    pub reservation_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub entered_at: DateTime<Utc>,
}

/// Response de spot para la API
#[derive(Debug, Serialize)]
pub struct SpotResponse {
    pub id: Uuid,
    pub lot_id: Uuid,
    pub spot_number: i32,
    pub status: SpotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<SpotReservationInfo>,
}

impl SpotResponse {
    pub fn from_spot(spot: ParkingSpot, reservation: Option<SpotReservationInfo>) -> Self {
        let status = spot.status();
        Self {
            id: spot.id,
            lot_id: spot.lot_id,
            spot_number: spot.spot_number,
            status,
            reservation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(SpotStatus::parse("available"), Some(SpotStatus::Available));
        assert_eq!(SpotStatus::parse("occupied"), Some(SpotStatus::Occupied));
        assert_eq!(SpotStatus::parse("O"), None);
    }

    #[test]
    fn test_is_occupied() {
        let spot = ParkingSpot {
            id: Uuid::new_v4(),
            lot_id: Uuid::new_v4(),
            spot_number: 1,
            status: "occupied".to_string(),
        };
        assert!(spot.is_occupied());

        let spot = ParkingSpot {
            status: "available".to_string(),
            ..spot
        };
        assert!(!spot.is_occupied());
    }
}
