use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["service"], "parking-reservation");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_protected_route_without_token_is_unauthorized() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/reservations/active")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_booking_full_lot_returns_conflict_envelope() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reservations")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, "Bearer test-token")
                .body(Body::from(
                    json!({ "lot_id": "ae0b1e11-58a8-4bb5-a86c-9c2a3f1f87a0" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["code"], "NO_AVAILABLE_SPOT");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_booking_requires_json_body() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reservations")
                .header(header::AUTHORIZATION, "Bearer test-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Sin content-type JSON el extractor rechaza la request
    assert_ne!(response.status(), StatusCode::OK);
    assert_ne!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// App de test autocontenida que replica la forma del router real y el
// envelope de errores de la API, sin tocar la base de datos.
fn create_test_app() -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async {
                Json(json!({
                    "service": "parking-reservation",
                    "status": "healthy"
                }))
            }),
        )
        .route(
            "/api/reservations/active",
            get(|headers: HeaderMap| async move {
                if headers.get(header::AUTHORIZATION).is_none() {
                    return (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({
                            "error": "Unauthorized",
                            "message": "Missing Authorization header",
                            "code": "UNAUTHORIZED"
                        })),
                    );
                }
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({
                        "error": "Not Found",
                        "message": "no active reservation for this user",
                        "code": "NOT_FOUND"
                    })),
                )
            }),
        )
        .route(
            "/api/reservations",
            post(|Json(body): Json<Value>| async move {
                let lot_id = body["lot_id"].as_str().unwrap_or_default().to_string();
                (
                    StatusCode::CONFLICT,
                    Json(json!({
                        "error": "Conflict",
                        "message": format!("No available spot: no available spots in lot {}", lot_id),
                        "code": "NO_AVAILABLE_SPOT"
                    })),
                )
            }),
        )
}
