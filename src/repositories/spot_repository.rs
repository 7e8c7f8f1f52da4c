use crate::models::parking_spot::{ParkingSpot, SpotStatus};
use crate::models::reservation::Reservation;
use crate::repositories::reservation_repository;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

pub struct SpotRepository {
    pool: PgPool,
}

impl SpotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ParkingSpot>> {
        let spot = sqlx::query_as::<_, ParkingSpot>("SELECT * FROM parking_spots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(spot)
    }

    pub async fn list_all(&self) -> AppResult<Vec<ParkingSpot>> {
        let spots = sqlx::query_as::<_, ParkingSpot>(
            "SELECT * FROM parking_spots ORDER BY lot_id, spot_number",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(spots)
    }

    pub async fn list_for_lot(&self, lot_id: Uuid) -> AppResult<Vec<ParkingSpot>> {
        let spots = sqlx::query_as::<_, ParkingSpot>(
            "SELECT * FROM parking_spots WHERE lot_id = $1 ORDER BY spot_number",
        )
        .bind(lot_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(spots)
    }

    /// Reclama el primer spot disponible del lot y abre su reserva,
    /// todo dentro de una única transacción.
    ///
    /// El lock del lot serializa bookings concurrentes del mismo lot y
    /// también los serializa contra resize/delete. El spot elegido es
    /// siempre el de número más bajo, así la asignación es reproducible.
    pub async fn claim_first_available(
        &self,
        lot_id: Uuid,
        user_id: Uuid,
        entered_at: DateTime<Utc>,
    ) -> AppResult<(ParkingSpot, Reservation)> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM parking_lots WHERE id = $1 FOR UPDATE")
            .bind(lot_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found_error("ParkingLot", &lot_id.to_string()))?;

        let has_active: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM reservations WHERE user_id = $1 AND exited_at IS NULL)",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if has_active.0 {
            return Err(AppError::DuplicateActiveReservation(format!(
                "user {} already holds an active reservation",
                user_id
            )));
        }

        let spot = sqlx::query_as::<_, ParkingSpot>(
            r#"
            SELECT * FROM parking_spots
            WHERE lot_id = $1 AND status = $2
            ORDER BY spot_number
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(lot_id)
        .bind(SpotStatus::Available.as_str())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NoAvailableSpot(format!("no available spots in lot {}", lot_id))
        })?;

        let spot = occupy(&mut tx, spot.id).await?;
        let reservation =
            reservation_repository::insert_open(&mut tx, spot.id, user_id, entered_at).await?;

        tx.commit().await?;
        Ok((spot, reservation))
    }
}

/// Marca un spot como ocupado dentro de la transacción del caller.
async fn occupy(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    spot_id: Uuid,
) -> AppResult<ParkingSpot> {
    let spot = sqlx::query_as::<_, ParkingSpot>(
        "UPDATE parking_spots SET status = $2 WHERE id = $1 RETURNING *",
    )
    .bind(spot_id)
    .bind(SpotStatus::Occupied.as_str())
    .fetch_one(&mut **tx)
    .await?;

    Ok(spot)
}

/// Libera un spot dentro de la transacción de cierre de reserva.
/// Debe invocarse exactamente una vez por cierre.
pub async fn release(conn: &mut PgConnection, spot_id: Uuid) -> AppResult<()> {
    sqlx::query("UPDATE parking_spots SET status = $2 WHERE id = $1")
        .bind(spot_id)
        .bind(SpotStatus::Available.as_str())
        .execute(conn)
        .await?;

    Ok(())
}
