//! Registro de parking lots
//!
//! Alta, edición, cambio de capacidad y borrado de lots, manteniendo el
//! invariante de que capacity coincide con el número de spots del lot.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::models::analytics::{LotDistributionRow, OccupancySummaryResponse};
use crate::models::parking_lot::{
    CreateLotRequest, LotDetailResponse, LotSummaryResponse, ParkingLot, ResizeLotRequest,
    UpdateLotRequest,
};
use crate::models::parking_spot::SpotResponse;
use crate::repositories::lot_repository::LotRepository;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::repositories::spot_repository::SpotRepository;
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::{require_non_blank, require_positive_rate, require_valid_capacity};

pub struct LotService {
    lots: LotRepository,
    spots: SpotRepository,
    reservations: ReservationRepository,
}

impl LotService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            lots: LotRepository::new(pool.clone()),
            spots: SpotRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool),
        }
    }

    pub async fn create_lot(&self, request: CreateLotRequest) -> AppResult<ParkingLot> {
        request.validate()?;
        require_positive_rate(request.hourly_rate)?;
        require_valid_capacity(request.capacity)?;
        require_non_blank("name", &request.name)?;
        require_non_blank("address", &request.address)?;
        require_non_blank("postal_code", &request.postal_code)?;

        let lot = self
            .lots
            .create_with_spots(
                request.name,
                request.hourly_rate,
                request.address,
                request.postal_code,
                request.capacity,
            )
            .await?;

        info!("🅿️ Lot '{}' creado con {} spots", lot.name, lot.capacity);
        Ok(lot)
    }

    pub async fn update_lot(&self, id: Uuid, request: UpdateLotRequest) -> AppResult<ParkingLot> {
        request.validate()?;
        require_positive_rate(request.hourly_rate)?;

        self.lots
            .update_details(
                id,
                request.name,
                request.hourly_rate,
                request.address,
                request.postal_code,
            )
            .await
    }

    pub async fn resize_lot(&self, id: Uuid, request: ResizeLotRequest) -> AppResult<ParkingLot> {
        request.validate()?;
        require_valid_capacity(request.capacity)?;

        let lot = self.lots.resize(id, request.capacity).await?;
        info!("🅿️ Lot '{}' redimensionado a {} spots", lot.name, lot.capacity);
        Ok(lot)
    }

    pub async fn delete_lot(&self, id: Uuid) -> AppResult<()> {
        self.lots.delete(id).await?;
        info!("🗑️ Lot {} borrado", id);
        Ok(())
    }

    pub async fn list_lots(&self) -> AppResult<Vec<LotSummaryResponse>> {
        let rows = self.lots.list_with_occupancy().await?;
        Ok(rows.into_iter().map(LotSummaryResponse::from).collect())
    }

    /// Lot con todos sus spots; los ocupados incluyen su reserva abierta.
    pub async fn get_lot(&self, id: Uuid) -> AppResult<LotDetailResponse> {
        let summary = self
            .lots
            .occupancy_for_lot(id)
            .await?
            .map(LotSummaryResponse::from)
            .ok_or_else(|| not_found_error("ParkingLot", &id.to_string()))?;

        let spots = self.spots.list_for_lot(id).await?;
        let mut responses = Vec::with_capacity(spots.len());
        for spot in spots {
            let reservation = if spot.is_occupied() {
                self.reservations.find_open_for_spot(spot.id).await?
            } else {
                None
            };
            responses.push(SpotResponse::from_spot(spot, reservation));
        }

        Ok(LotDetailResponse {
            lot: summary,
            spots: responses,
        })
    }

    /// Resumen global de ocupación para el dashboard de administración.
    pub async fn occupancy_summary(&self) -> AppResult<OccupancySummaryResponse> {
        let rows = self.lots.list_with_occupancy().await?;

        let mut total_spots = 0;
        let mut occupied_spots = 0;
        let lots: Vec<LotDistributionRow> = rows
            .into_iter()
            .map(|row| {
                total_spots += row.total_spots;
                occupied_spots += row.occupied_spots;
                LotDistributionRow {
                    lot_id: row.id,
                    name: row.name,
                    total_spots: row.total_spots,
                    occupied_spots: row.occupied_spots,
                    available_spots: row.total_spots - row.occupied_spots,
                }
            })
            .collect();

        Ok(OccupancySummaryResponse {
            total_lots: lots.len() as i64,
            total_spots,
            occupied_spots,
            available_spots: total_spots - occupied_spots,
            lots,
        })
    }
}
