use actix_web::HttpResponse;

use crate::models::HealthResponse;

/// Health check endpoint
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        message: format!("vaultlink {} is running", crate::VERSION),
    })
}
