use crate::models::parking_lot::{LotOccupancyRow, ParkingLot};
use crate::models::parking_spot::SpotStatus;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

pub struct LotRepository {
    pool: PgPool,
}

impl LotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crea el lot y sus spots numerados 1..=capacity en una transacción.
    pub async fn create_with_spots(
        &self,
        name: String,
        hourly_rate: Decimal,
        address: String,
        postal_code: String,
        capacity: i32,
    ) -> AppResult<ParkingLot> {
        let mut tx = self.pool.begin().await?;

        let lot = sqlx::query_as::<_, ParkingLot>(
            r#"
            INSERT INTO parking_lots (id, name, hourly_rate, address, postal_code, capacity, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(hourly_rate)
        .bind(address)
        .bind(postal_code)
        .bind(capacity)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        insert_spot_range(&mut tx, lot.id, 1, capacity).await?;

        tx.commit().await?;
        Ok(lot)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ParkingLot>> {
        let lot = sqlx::query_as::<_, ParkingLot>("SELECT * FROM parking_lots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(lot)
    }

    /// Actualiza solo los metadatos del lot; la capacidad se cambia con resize.
    pub async fn update_details(
        &self,
        id: Uuid,
        name: String,
        hourly_rate: Decimal,
        address: String,
        postal_code: String,
    ) -> AppResult<ParkingLot> {
        let lot = sqlx::query_as::<_, ParkingLot>(
            r#"
            UPDATE parking_lots
            SET name = $2, hourly_rate = $3, address = $4, postal_code = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(hourly_rate)
        .bind(address)
        .bind(postal_code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found_error("ParkingLot", &id.to_string()))?;

        Ok(lot)
    }

    /// Cambia la capacidad del lot creando o borrando spots.
    ///
    /// El lock del lot serializa el resize contra bookings del mismo lot.
    /// Un shrink se rechaza entero si algún spot con número mayor que la
    /// nueva capacidad está ocupado: no hay borrado parcial.
    pub async fn resize(&self, id: Uuid, new_capacity: i32) -> AppResult<ParkingLot> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, ParkingLot>(
            "SELECT * FROM parking_lots WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found_error("ParkingLot", &id.to_string()))?;

        if new_capacity > current.capacity {
            insert_spot_range(&mut tx, id, current.capacity + 1, new_capacity).await?;
        } else if new_capacity < current.capacity {
            let occupied_above: (bool,) = sqlx::query_as(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM parking_spots
                    WHERE lot_id = $1 AND spot_number > $2 AND status = $3
                )
                "#,
            )
            .bind(id)
            .bind(new_capacity)
            .bind(SpotStatus::Occupied.as_str())
            .fetch_one(&mut *tx)
            .await?;

            if occupied_above.0 {
                return Err(AppError::CapacityConflict(format!(
                    "cannot shrink lot {} to {} spots: occupied spots above that number exist",
                    id, new_capacity
                )));
            }

            sqlx::query("DELETE FROM parking_spots WHERE lot_id = $1 AND spot_number > $2")
                .bind(id)
                .bind(new_capacity)
                .execute(&mut *tx)
                .await?;
        }

        let lot = sqlx::query_as::<_, ParkingLot>(
            "UPDATE parking_lots SET capacity = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(new_capacity)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(lot)
    }

    /// Borra el lot y todos sus spots, solo si ninguno está ocupado.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_as::<_, ParkingLot>("SELECT * FROM parking_lots WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found_error("ParkingLot", &id.to_string()))?;

        let occupied: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM parking_spots WHERE lot_id = $1 AND status = $2",
        )
        .bind(id)
        .bind(SpotStatus::Occupied.as_str())
        .fetch_one(&mut *tx)
        .await?;

        if occupied.0 > 0 {
            return Err(AppError::OccupiedSpotsExist(format!(
                "cannot delete lot {}: {} occupied spots",
                id, occupied.0
            )));
        }

        // Los spots caen por ON DELETE CASCADE; el historial de reservas queda.
        sqlx::query("DELETE FROM parking_lots WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_with_occupancy(&self) -> AppResult<Vec<LotOccupancyRow>> {
        let rows = sqlx::query_as::<_, LotOccupancyRow>(
            r#"
            SELECT l.id, l.name, l.hourly_rate, l.address, l.postal_code, l.capacity,
                   COUNT(s.id) AS total_spots,
                   COUNT(s.id) FILTER (WHERE s.status = 'occupied') AS occupied_spots
            FROM parking_lots l
            LEFT JOIN parking_spots s ON s.lot_id = l.id
            GROUP BY l.id
            ORDER BY l.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn occupancy_for_lot(&self, id: Uuid) -> AppResult<Option<LotOccupancyRow>> {
        let row = sqlx::query_as::<_, LotOccupancyRow>(
            r#"
            SELECT l.id, l.name, l.hourly_rate, l.address, l.postal_code, l.capacity,
                   COUNT(s.id) AS total_spots,
                   COUNT(s.id) FILTER (WHERE s.status = 'occupied') AS occupied_spots
            FROM parking_lots l
            LEFT JOIN parking_spots s ON s.lot_id = l.id
            WHERE l.id = $1
            GROUP BY l.id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}

/// Inserta los spots numerados from..=to para un lot, todos disponibles.
async fn insert_spot_range(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    lot_id: Uuid,
    from: i32,
    to: i32,
) -> AppResult<()> {
    for spot_number in from..=to {
        sqlx::query(
            r#"
            INSERT INTO parking_spots (id, lot_id, spot_number, status)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(lot_id)
        .bind(spot_number)
        .bind(SpotStatus::Available.as_str())
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
