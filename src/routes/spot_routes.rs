use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::middleware::auth::CurrentUser;
use crate::models::parking_spot::SpotResponse;
use crate::services::booking_service::BookingService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Configura las rutas de inspección de spots (solo admins)
pub fn create_spot_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_spots))
        .route("/:id", get(get_spot))
}

async fn list_spots(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<SpotResponse>>, AppError> {
    user.require_admin()?;
    let service = BookingService::new(state.pool.clone());
    let spots = service.list_spots().await?;
    Ok(Json(spots))
}

async fn get_spot(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<SpotResponse>, AppError> {
    user.require_admin()?;
    let service = BookingService::new(state.pool.clone());
    let spot = service.get_spot(id).await?;
    Ok(Json(spot))
}
