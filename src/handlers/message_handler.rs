use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::domain::MessageStatus,
    models::dto::request::CreateMessageRequest,
    models::dto::response::{ApiResponse, ListResponse},
};

#[derive(Debug, Deserialize)]
struct MessageListQuery {
    status: Option<MessageStatus>,
}

#[post("/api/messages")]
async fn create_message(
    state: web::Data<AppState>,
    request: web::Json<CreateMessageRequest>,
) -> Result<HttpResponse, AppError> {
    let message = state.message_service.create(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Message created", message)))
}

#[get("/api/messages")]
async fn get_all_messages(
    state: web::Data<AppState>,
    query: web::Query<MessageListQuery>,
) -> Result<HttpResponse, AppError> {
    let messages = state.message_service.list(query.status).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Messages fetched", messages)))
}

#[get("/api/messages/stats")]
async fn get_message_stats(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let stats = state.message_service.stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Message stats fetched", stats)))
}

#[get("/api/messages/student/{student_id}")]
async fn get_student_feed(
    state: web::Data<AppState>,
    student_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let messages = state.message_service.feed_for_student(&student_id).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Messages fetched", messages)))
}

#[get("/api/messages/{id}")]
async fn get_message(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let message = state.message_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Message fetched", message)))
}

#[post("/api/messages/{id}/send")]
async fn send_message(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let message = state.message_service.send(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Message sent", message)))
}

#[delete("/api/messages/{id}")]
async fn delete_message(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.message_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message_only("Message deleted")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_message)
        .service(get_all_messages)
        .service(get_message_stats)
        .service(get_student_feed)
        .service(send_message)
        .service(get_message)
        .service(delete_message);
}
