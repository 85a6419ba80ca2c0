//! Handlers shared by every app instance

use actix_web::HttpResponse;

use cs_shared::ApiResponse;

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "craftsite-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default handler so unknown paths also answer with the envelope
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<()>::error(
        "The requested resource was not found",
    ))
}
