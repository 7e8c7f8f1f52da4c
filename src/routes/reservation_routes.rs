use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::middleware::auth::CurrentUser;
use crate::models::reservation::{
    BookSpotRequest, BookingResponse, ClosedReservationResponse, ReservationHistoryResponse,
    ReservationResponse,
};
use crate::services::booking_service::BookingService;
use crate::services::reservation_service::ReservationService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Configura las rutas de reservas del usuario autenticado
pub fn create_reservation_router() -> Router<AppState> {
    Router::new()
        .route("/", post(book_spot))
        .route("/:id/release", post(release_spot))
        .route("/active", get(get_active_reservation))
        .route("/history", get(get_reservation_history))
}

async fn book_spot(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<BookSpotRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let service = BookingService::new(state.pool.clone());
    let booking = service.book_first_available(request.lot_id, user.id).await?;
    Ok(Json(booking))
}

async fn release_spot(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClosedReservationResponse>, AppError> {
    let service = ReservationService::new(state.pool.clone());
    let closed = service.close_reservation(id, user.id).await?;
    Ok(Json(ClosedReservationResponse::from(closed)))
}

async fn get_active_reservation(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ReservationResponse>, AppError> {
    let service = ReservationService::new(state.pool.clone());
    let reservation = service.get_active_reservation(user.id).await?;
    Ok(Json(reservation))
}

async fn get_reservation_history(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ReservationHistoryResponse>, AppError> {
    let service = ReservationService::new(state.pool.clone());
    let history = service.list_reservations_for_user(user.id).await?;
    Ok(Json(history))
}
