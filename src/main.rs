mod config;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::database::DatabaseConfig;
use config::environment::EnvironmentConfig;
use middleware::cors::cors_middleware;
use services::auth_service::AuthService;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🅿️  Parking Reservation API");
    info!("===========================");

    // Inicializar base de datos
    let db_config = DatabaseConfig::default();
    let pool = match db_config.create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let config = EnvironmentConfig::default();

    // Crear usuario admin inicial si no existe
    let auth_service = AuthService::new(pool.clone(), &config);
    if let Err(e) = auth_service
        .seed_admin(&config.admin_username, &config.admin_password)
        .await
    {
        error!("❌ Error creando el usuario admin inicial: {}", e);
        return Err(anyhow::anyhow!("Error de inicialización: {}", e));
    }

    // Crear router de la API
    let app_state = AppState::new(pool, config.clone());

    let protected = Router::new()
        .nest("/api/lots", routes::lot_routes::create_lot_router())
        .nest("/api/spots", routes::spot_routes::create_spot_router())
        .nest(
            "/api/reservations",
            routes::reservation_routes::create_reservation_router(),
        )
        .nest(
            "/api/analytics",
            routes::analytics_routes::create_analytics_router(),
        )
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth::auth_middleware,
        ));

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        .merge(protected)
        .layer(cors_middleware())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Endpoints - Auth:");
    info!("   POST /api/auth/register - Registrar usuario");
    info!("   POST /api/auth/login - Login");
    info!("🅿️ Endpoints - Lots:");
    info!("   POST   /api/lots - Crear lot (admin)");
    info!("   GET    /api/lots - Listar lots con ocupación");
    info!("   GET    /api/lots/:id - Detalle de lot con spots");
    info!("   PUT    /api/lots/:id - Actualizar metadatos (admin)");
    info!("   PUT    /api/lots/:id/capacity - Cambiar capacidad (admin)");
    info!("   DELETE /api/lots/:id - Borrar lot (admin)");
    info!("🚗 Endpoints - Spots:");
    info!("   GET  /api/spots - Listar spots (admin)");
    info!("   GET  /api/spots/:id - Detalle de spot (admin)");
    info!("📋 Endpoints - Reservations:");
    info!("   POST /api/reservations - Reservar primer spot disponible");
    info!("   POST /api/reservations/:id/release - Liberar spot");
    info!("   GET  /api/reservations/active - Reserva activa con coste en curso");
    info!("   GET  /api/reservations/history - Historial de reservas");
    info!("📊 Endpoints - Analytics:");
    info!("   GET  /api/analytics/summary - Resumen de ocupación (admin)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "parking-reservation",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
