use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::middleware::auth::CurrentUser;
use crate::models::analytics::OccupancySummaryResponse;
use crate::services::lot_service::LotService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Configura las rutas de analytics del dashboard (solo admins)
pub fn create_analytics_router() -> Router<AppState> {
    Router::new().route("/summary", get(get_summary))
}

async fn get_summary(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<OccupancySummaryResponse>, AppError> {
    user.require_admin()?;
    let service = LotService::new(state.pool.clone());
    let summary = service.occupancy_summary().await?;
    Ok(Json(summary))
}
