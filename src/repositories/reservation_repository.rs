use crate::models::parking_spot::SpotReservationInfo;
use crate::models::reservation::{Reservation, ReservationDetailRow};
use crate::repositories::spot_repository;
use crate::utils::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const DETAIL_COLUMNS: &str = r#"
    r.id, r.spot_id, r.user_id, r.entered_at, r.exited_at, r.total_cost,
    s.spot_number AS spot_number, s.lot_id AS lot_id,
    l.name AS lot_name, l.hourly_rate AS hourly_rate
"#;

pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cierra la reserva abierta del usuario: fija la salida, calcula el
    /// coste y libera el spot, todo dentro de una única transacción.
    /// No existe ventana en la que la reserva esté cerrada y el spot
    /// siga ocupado.
    pub async fn close(
        &self,
        reservation_id: Uuid,
        user_id: Uuid,
        exited_at: DateTime<Utc>,
    ) -> AppResult<Reservation> {
        let mut tx = self.pool.begin().await?;

        let open = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE id = $1 AND user_id = $2 AND exited_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(reservation_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "no active reservation {} for this user",
                reservation_id
            ))
        })?;

        let rate: (Decimal,) = sqlx::query_as(
            r#"
            SELECT l.hourly_rate
            FROM parking_spots s
            JOIN parking_lots l ON l.id = s.lot_id
            WHERE s.id = $1
            "#,
        )
        .bind(open.spot_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!(
                "spot {} of open reservation {} no longer exists",
                open.spot_id, open.id
            ))
        })?;

        let total_cost = Reservation::cost_between(open.entered_at, exited_at, rate.0)?;

        let closed = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET exited_at = $2, total_cost = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(open.id)
        .bind(exited_at)
        .bind(total_cost)
        .fetch_one(&mut *tx)
        .await?;

        spot_repository::release(&mut *tx, open.spot_id).await?;

        tx.commit().await?;
        Ok(closed)
    }

    pub async fn find_active_for_user(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<ReservationDetailRow>> {
        let query = format!(
            r#"
            SELECT {DETAIL_COLUMNS}
            FROM reservations r
            LEFT JOIN parking_spots s ON s.id = r.spot_id
            LEFT JOIN parking_lots l ON l.id = s.lot_id
            WHERE r.user_id = $1 AND r.exited_at IS NULL
            "#
        );
        let row = sqlx::query_as::<_, ReservationDetailRow>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// Historial completo del usuario, reservas más recientes primero.
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<ReservationDetailRow>> {
        let query = format!(
            r#"
            SELECT {DETAIL_COLUMNS}
            FROM reservations r
            LEFT JOIN parking_spots s ON s.id = r.spot_id
            LEFT JOIN parking_lots l ON l.id = s.lot_id
            WHERE r.user_id = $1
            ORDER BY r.entered_at DESC
            "#
        );
        let rows = sqlx::query_as::<_, ReservationDetailRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Reserva abierta que ocupa un spot, con el usuario que la abrió.
    pub async fn find_open_for_spot(
        &self,
        spot_id: Uuid,
    ) -> AppResult<Option<SpotReservationInfo>> {
        let info = sqlx::query_as::<_, SpotReservationInfo>(
            r#"
            SELECT r.id AS reservation_id, r.user_id, u.username, r.entered_at
            FROM reservations r
            JOIN users u ON u.id = r.user_id
            WHERE r.spot_id = $1 AND r.exited_at IS NULL
            "#,
        )
        .bind(spot_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(info)
    }
}

/// Abre una reserva dentro de la transacción de booking del caller.
/// Precondición (garantizada por el lock del lot y los chequeos previos):
/// ni el spot ni el usuario tienen otra reserva abierta.
pub async fn insert_open(
    tx: &mut Transaction<'_, Postgres>,
    spot_id: Uuid,
    user_id: Uuid,
    entered_at: DateTime<Utc>,
) -> AppResult<Reservation> {
    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        INSERT INTO reservations (id, spot_id, user_id, entered_at, exited_at, total_cost)
        VALUES ($1, $2, $3, $4, NULL, NULL)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(spot_id)
    .bind(user_id)
    .bind(entered_at)
    .fetch_one(&mut **tx)
    .await?;

    Ok(reservation)
}
