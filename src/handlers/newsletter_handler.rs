use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{SubscribeRequest, UnsubscribeRequest, UpdatePreferencesRequest},
    models::dto::response::{ApiResponse, ListResponse},
};

#[post("/api/newsletter/subscribe")]
async fn subscribe(
    state: web::Data<AppState>,
    request: web::Json<SubscribeRequest>,
) -> Result<HttpResponse, AppError> {
    let subscriber = state.newsletter_service.subscribe(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new(
        "Subscribed; please verify your email",
        subscriber,
    )))
}

#[get("/api/newsletter/verify/{token}")]
async fn verify(
    state: web::Data<AppState>,
    token: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let subscriber = state.newsletter_service.verify(&token).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Subscription verified", subscriber)))
}

#[post("/api/newsletter/unsubscribe")]
async fn unsubscribe(
    state: web::Data<AppState>,
    request: web::Json<UnsubscribeRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let subscriber = state.newsletter_service.unsubscribe(&request.email).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Unsubscribed", subscriber)))
}

#[put("/api/newsletter/preferences/{email}")]
async fn update_preferences(
    state: web::Data<AppState>,
    email: web::Path<String>,
    request: web::Json<UpdatePreferencesRequest>,
) -> Result<HttpResponse, AppError> {
    let subscriber = state
        .newsletter_service
        .update_preferences(&email, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Preferences updated", subscriber)))
}

#[get("/api/newsletter/subscribers")]
async fn get_subscribers(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let subscribers = state.newsletter_service.list_active().await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Subscribers fetched", subscribers)))
}

#[delete("/api/newsletter/subscribers/{email}")]
async fn delete_subscriber(
    state: web::Data<AppState>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.newsletter_service.remove(&email).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message_only("Subscriber deleted")))
}

#[get("/api/newsletter/stats")]
async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let stats = state.newsletter_service.stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Newsletter stats fetched", stats)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(subscribe)
        .service(verify)
        .service(unsubscribe)
        .service(update_preferences)
        .service(get_subscribers)
        .service(delete_subscriber)
        .service(get_stats);
}
