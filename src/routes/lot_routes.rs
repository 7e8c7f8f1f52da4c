use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde_json::json;
use uuid::Uuid;

use crate::middleware::auth::CurrentUser;
use crate::models::parking_lot::{
    CreateLotRequest, LotDetailResponse, LotSummaryResponse, ParkingLot, ResizeLotRequest,
    UpdateLotRequest,
};
use crate::services::lot_service::LotService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Configura las rutas de parking lots.
/// Las mutaciones son solo para admins; las lecturas para cualquier
/// usuario autenticado.
pub fn create_lot_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_lot))
        .route("/", get(list_lots))
        .route("/:id", get(get_lot))
        .route("/:id", put(update_lot))
        .route("/:id/capacity", put(resize_lot))
        .route("/:id", delete(delete_lot))
}

async fn create_lot(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<CreateLotRequest>,
) -> Result<Json<ParkingLot>, AppError> {
    user.require_admin()?;
    let service = LotService::new(state.pool.clone());
    let lot = service.create_lot(request).await?;
    Ok(Json(lot))
}

async fn update_lot(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLotRequest>,
) -> Result<Json<ParkingLot>, AppError> {
    user.require_admin()?;
    let service = LotService::new(state.pool.clone());
    let lot = service.update_lot(id, request).await?;
    Ok(Json(lot))
}

async fn resize_lot(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ResizeLotRequest>,
) -> Result<Json<ParkingLot>, AppError> {
    user.require_admin()?;
    let service = LotService::new(state.pool.clone());
    let lot = service.resize_lot(id, request).await?;
    Ok(Json(lot))
}

async fn delete_lot(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    user.require_admin()?;
    let service = LotService::new(state.pool.clone());
    service.delete_lot(id).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Parking lot eliminado exitosamente"
    })))
}

async fn list_lots(
    State(state): State<AppState>,
) -> Result<Json<Vec<LotSummaryResponse>>, AppError> {
    let service = LotService::new(state.pool.clone());
    let lots = service.list_lots().await?;
    Ok(Json(lots))
}

async fn get_lot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LotDetailResponse>, AppError> {
    let service = LotService::new(state.pool.clone());
    let lot = service.get_lot(id).await?;
    Ok(Json(lot))
}
