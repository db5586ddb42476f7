use actix_web::{get, web, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthStatus {
    fn up() -> Self {
        Self {
            status: "ok".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            timestamp: Utc::now(),
        }
    }
}

// Answers as long as the server loop runs; the store is never consulted.
#[get("/health")]
pub async fn health() -> impl Responder {
    web::Json(HealthStatus::up())
}
