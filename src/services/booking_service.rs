//! Asignación de spots
//!
//! El camino crítico de concurrencia: elegir y reclamar el primer spot
//! disponible de un lot. La selección y el claim son una unidad atómica,
//! dos bookings concurrentes del mismo lot nunca obtienen el mismo spot.

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::parking_spot::SpotResponse;
use crate::models::reservation::BookingResponse;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::repositories::spot_repository::SpotRepository;
use crate::utils::errors::{not_found_error, AppResult};

pub struct BookingService {
    spots: SpotRepository,
    reservations: ReservationRepository,
}

impl BookingService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            spots: SpotRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool),
        }
    }

    /// Reserva el spot disponible con el número más bajo del lot.
    pub async fn book_first_available(
        &self,
        lot_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<BookingResponse> {
        let (spot, reservation) = self
            .spots
            .claim_first_available(lot_id, user_id, Utc::now())
            .await?;

        info!(
            "🚗 Usuario {} reservó el spot {} del lot {}",
            user_id, spot.spot_number, lot_id
        );

        Ok(BookingResponse {
            reservation_id: reservation.id,
            lot_id: spot.lot_id,
            spot_id: spot.id,
            spot_number: spot.spot_number,
            entered_at: reservation.entered_at,
        })
    }

    pub async fn list_spots(&self) -> AppResult<Vec<SpotResponse>> {
        let spots = self.spots.list_all().await?;
        let mut responses = Vec::with_capacity(spots.len());
        for spot in spots {
            let reservation = if spot.is_occupied() {
                self.reservations.find_open_for_spot(spot.id).await?
            } else {
                None
            };
            responses.push(SpotResponse::from_spot(spot, reservation));
        }
        Ok(responses)
    }

    pub async fn get_spot(&self, spot_id: Uuid) -> AppResult<SpotResponse> {
        let spot = self
            .spots
            .find_by_id(spot_id)
            .await?
            .ok_or_else(|| not_found_error("ParkingSpot", &spot_id.to_string()))?;

        let reservation = if spot.is_occupied() {
            self.reservations.find_open_for_spot(spot.id).await?
        } else {
            None
        };

        Ok(SpotResponse::from_spot(spot, reservation))
    }
}
