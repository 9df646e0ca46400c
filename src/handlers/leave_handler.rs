use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::domain::LeaveStatus,
    models::dto::request::{ApplyLeaveRequest, UpdateLeaveStatusRequest},
    models::dto::response::{ApiResponse, ListResponse},
};

#[derive(Debug, Deserialize)]
struct LeaveListQuery {
    status: Option<LeaveStatus>,
}

#[post("/api/leaves")]
async fn apply_leave(
    state: web::Data<AppState>,
    request: web::Json<ApplyLeaveRequest>,
) -> Result<HttpResponse, AppError> {
    let leave = state.leave_service.apply(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Leave request submitted", leave)))
}

#[get("/api/leaves")]
async fn get_all_leaves(
    state: web::Data<AppState>,
    query: web::Query<LeaveListQuery>,
) -> Result<HttpResponse, AppError> {
    let leaves = state.leave_service.list(query.status).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Leave requests fetched", leaves)))
}

#[get("/api/leaves/user/{user_id}")]
async fn get_user_leaves(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let leaves = state.leave_service.for_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Leave requests fetched", leaves)))
}

#[get("/api/leaves/{id}")]
async fn get_leave(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let leave = state.leave_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Leave request fetched", leave)))
}

#[patch("/api/leaves/{id}/decision")]
async fn decide_leave(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateLeaveStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let leave = state.leave_service.decide(&id, request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Leave request decided", leave)))
}

#[delete("/api/leaves/{id}")]
async fn delete_leave(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.leave_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message_only("Leave request deleted")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(apply_leave)
        .service(get_all_leaves)
        .service(get_user_leaves)
        .service(decide_leave)
        .service(get_leave)
        .service(delete_leave);
}
