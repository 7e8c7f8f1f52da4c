//! Ledger de reservas
//!
//! Ciclo de vida de las reservas: cierre con cálculo de coste y consultas
//! de historial. Una reserva pasa de abierta a cerrada una sola vez; el
//! cierre libera el spot en la misma transacción.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::reservation::{
    Reservation, ReservationHistoryResponse, ReservationResponse,
};
use crate::repositories::reservation_repository::ReservationRepository;
use crate::utils::errors::{AppError, AppResult};

pub struct ReservationService {
    reservations: ReservationRepository,
}

impl ReservationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reservations: ReservationRepository::new(pool),
        }
    }

    /// Cierra la reserva activa del usuario y devuelve el coste final.
    pub async fn close_reservation(
        &self,
        reservation_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Reservation> {
        let closed = self
            .reservations
            .close(reservation_id, user_id, Utc::now())
            .await?;

        info!(
            "🏁 Reserva {} cerrada, coste total {}",
            closed.id,
            closed
                .total_cost
                .map(|c| c.to_string())
                .unwrap_or_else(|| "0".to_string())
        );
        Ok(closed)
    }

    /// Reserva activa del usuario con su coste en curso.
    pub async fn get_active_reservation(&self, user_id: Uuid) -> AppResult<ReservationResponse> {
        let row = self
            .reservations
            .find_active_for_user(user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("no active reservation for this user".to_string())
            })?;

        Ok(ReservationResponse::from_row(row, Utc::now()))
    }

    /// Historial completo del usuario, más reciente primero, con la suma
    /// de costes de las reservas ya cerradas.
    pub async fn list_reservations_for_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<ReservationHistoryResponse> {
        let rows = self.reservations.list_for_user(user_id).await?;
        let now = Utc::now();

        let reservations: Vec<ReservationResponse> = rows
            .into_iter()
            .map(|row| ReservationResponse::from_row(row, now))
            .collect();

        let total_past_cost = reservations
            .iter()
            .filter_map(|r| r.total_cost)
            .sum::<Decimal>();

        Ok(ReservationHistoryResponse {
            reservations,
            total_past_cost,
        })
    }
}
