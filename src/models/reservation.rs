//! Modelo de Reservation
//!
//! Una reserva registra la ocupación de un spot por un usuario desde una
//! hora de entrada hasta una hora de salida opcional. El historial es
//! append-only: la fila se muta una sola vez al cerrarse.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::errors::{AppError, AppResult};

/// Reservation principal - mapea exactamente a la tabla reservations.
/// exited_at en NULL significa reserva abierta.
#[derive(Debug, Clone, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
    pub total_cost: Option<Decimal>,
}

impl Reservation {
    pub fn is_open(&self) -> bool {
        self.exited_at.is_none()
    }

    /// Coste determinista entre dos timestamps a la tarifa dada,
    /// redondeado a 2 decimales. Rechaza salidas anteriores a la entrada.
    pub fn cost_between(
        entered_at: DateTime<Utc>,
        exited_at: DateTime<Utc>,
        hourly_rate: Decimal,
    ) -> AppResult<Decimal> {
        if exited_at < entered_at {
            return Err(AppError::ClockSkew(format!(
                "exit time {} is before entry time {}",
                exited_at, entered_at
            )));
        }
        let seconds = (exited_at - entered_at).num_seconds();
        let hours = Decimal::from(seconds) / Decimal::from(3600);
        Ok((hours * hourly_rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Coste en curso de una reserva abierta, calculado contra "ahora".
    /// Solo para mostrar: nunca se persiste.
    pub fn running_cost(&self, hourly_rate: Decimal, now: DateTime<Utc>) -> Decimal {
        Self::cost_between(self.entered_at, now.max(self.entered_at), hourly_rate)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Fila de reserva con el contexto de spot y lot para listados.
/// Los joins son LEFT: un lot o spot borrado no borra el historial.
#[derive(Debug, FromRow)]
pub struct ReservationDetailRow {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub user_id: Uuid,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
    pub total_cost: Option<Decimal>,
    pub spot_number: Option<i32>,
    pub lot_id: Option<Uuid>,
    pub lot_name: Option<String>,
    pub hourly_rate: Option<Decimal>,
}

/// Response de reserva para la API
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub spot_number: Option<i32>,
    pub lot_id: Option<Uuid>,
    pub lot_name: Option<String>,
    pub entered_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exited_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<Decimal>,
    /// Coste estimado a fecha de hoy para reservas abiertas
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_cost: Option<Decimal>,
}

impl ReservationResponse {
    pub fn from_row(row: ReservationDetailRow, now: DateTime<Utc>) -> Self {
        let current_cost = match (row.exited_at, row.hourly_rate) {
            (None, Some(rate)) => {
                let reservation = Reservation {
                    id: row.id,
                    spot_id: row.spot_id,
                    user_id: row.user_id,
                    entered_at: row.entered_at,
                    exited_at: None,
                    total_cost: None,
                };
                Some(reservation.running_cost(rate, now))
            }
            _ => None,
        };

        Self {
            id: row.id,
            spot_id: row.spot_id,
            spot_number: row.spot_number,
            lot_id: row.lot_id,
            lot_name: row.lot_name,
            entered_at: row.entered_at,
            exited_at: row.exited_at,
            total_cost: row.total_cost,
            current_cost,
        }
    }
}

/// Response del historial de reservas de un usuario
#[derive(Debug, Serialize)]
pub struct ReservationHistoryResponse {
    pub reservations: Vec<ReservationResponse>,
    pub total_past_cost: Decimal,
}

/// Request de booking: el usuario elige lot, nunca spot concreto
#[derive(Debug, serde::Deserialize)]
pub struct BookSpotRequest {
    pub lot_id: Uuid,
}

/// Response de un booking recién abierto
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub reservation_id: Uuid,
    pub lot_id: Uuid,
    pub spot_id: Uuid,
    pub spot_number: i32,
    pub entered_at: DateTime<Utc>,
}

/// Response del cierre de una reserva
#[derive(Debug, Serialize)]
pub struct ClosedReservationResponse {
    pub reservation_id: Uuid,
    pub spot_id: Uuid,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
    pub total_cost: Option<Decimal>,
}

impl From<Reservation> for ClosedReservationResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            reservation_id: reservation.id,
            spot_id: reservation.spot_id,
            entered_at: reservation.entered_at,
            exited_at: reservation.exited_at,
            total_cost: reservation.total_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn rate(units: i64, scale: u32) -> Decimal {
        Decimal::new(units, scale)
    }

    #[test]
    fn test_cost_two_and_a_half_hours_at_ten() {
        let entered = Utc::now();
        let exited = entered + Duration::hours(2) + Duration::minutes(30);
        let cost = Reservation::cost_between(entered, exited, rate(100, 1)).unwrap();
        assert_eq!(cost, rate(2500, 2)); // 25.00
    }

    #[test]
    fn test_cost_zero_duration_is_zero() {
        let entered = Utc::now();
        let cost = Reservation::cost_between(entered, entered, rate(100, 1)).unwrap();
        assert_eq!(cost, Decimal::ZERO);
    }

    #[test]
    fn test_cost_rounds_to_two_decimals() {
        let entered = Utc::now();
        // 20 minutos a 10.00/h = 3.333... -> 3.33
        let exited = entered + Duration::minutes(20);
        let cost = Reservation::cost_between(entered, exited, rate(1000, 2)).unwrap();
        assert_eq!(cost, rate(333, 2));
    }

    #[test]
    fn test_cost_midpoint_rounds_away_from_zero() {
        let entered = Utc::now();
        // 9 segundos a 10.00/h = 0.025 -> 0.03
        let exited = entered + Duration::seconds(9);
        let cost = Reservation::cost_between(entered, exited, rate(1000, 2)).unwrap();
        assert_eq!(cost, rate(3, 2));
    }

    #[test]
    fn test_exit_before_entry_is_clock_skew() {
        let entered = Utc::now();
        let exited = entered - Duration::seconds(1);
        let err = Reservation::cost_between(entered, exited, rate(100, 1)).unwrap_err();
        assert!(matches!(err, AppError::ClockSkew(_)));
    }

    #[test]
    fn test_running_cost_never_negative() {
        let entered = Utc::now();
        let reservation = Reservation {
            id: Uuid::new_v4(),
            spot_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            entered_at: entered,
            exited_at: None,
            total_cost: None,
        };
        // reloj local atrasado respecto a entered_at
        let cost = reservation.running_cost(rate(100, 1), entered - Duration::minutes(5));
        assert_eq!(cost, Decimal::ZERO);
    }

    #[test]
    fn test_response_computes_current_cost_only_when_open() {
        let now = Utc::now();
        let open_row = ReservationDetailRow {
            id: Uuid::new_v4(),
            spot_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            entered_at: now - Duration::hours(1),
            exited_at: None,
            total_cost: None,
            spot_number: Some(3),
            lot_id: Some(Uuid::new_v4()),
            lot_name: Some("Centro".to_string()),
            hourly_rate: Some(rate(100, 1)),
        };
        let response = ReservationResponse::from_row(open_row, now);
        assert_eq!(response.current_cost, Some(rate(1000, 2)));

        let closed_row = ReservationDetailRow {
            id: Uuid::new_v4(),
            spot_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            entered_at: now - Duration::hours(2),
            exited_at: Some(now),
            total_cost: Some(rate(2000, 2)),
            spot_number: Some(1),
            lot_id: Some(Uuid::new_v4()),
            lot_name: Some("Centro".to_string()),
            hourly_rate: Some(rate(100, 1)),
        };
        let response = ReservationResponse::from_row(closed_row, now);
        assert!(response.current_cost.is_none());
        assert_eq!(response.total_cost, Some(rate(2000, 2)));
    }
}
