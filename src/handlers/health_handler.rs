use actix_web::{get, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError, models::dto::response::HealthResponse};

#[get("/api/health")]
async fn health(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let database = match state.database.health_check().await {
        Ok(()) => "up",
        Err(e) => {
            log::warn!("Database health check failed: {}", e);
            "down"
        }
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        database: database.to_string(),
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health);
}
