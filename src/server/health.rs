use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;

use super::store::JobStore;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    jobs: Option<usize>,
}

/// Health check endpoint
///
/// Reports how many jobs the in-memory store currently holds.
#[get("/health")]
async fn health_check(store: web::Data<JobStore>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        jobs: Some(store.len()),
    })
}

/// Liveness check endpoint
///
/// Simple check that the process is alive.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        jobs: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config.service(health_check).service(liveness_check);
}
