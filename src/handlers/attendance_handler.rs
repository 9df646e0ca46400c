use actix_web::{delete, get, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::MarkAttendanceRequest,
    models::dto::response::{ApiResponse, ListResponse},
};

#[derive(Debug, Deserialize)]
struct AttendanceRangeQuery {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    date: Option<DateTime<Utc>>,
}

#[post("/api/attendance")]
async fn mark_attendance(
    state: web::Data<AppState>,
    request: web::Json<MarkAttendanceRequest>,
) -> Result<HttpResponse, AppError> {
    let sheet = state.attendance_service.mark(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::new("Attendance marked", sheet)))
}

#[get("/api/attendance/class/{class_id}")]
async fn get_class_attendance(
    state: web::Data<AppState>,
    class_id: web::Path<String>,
    query: web::Query<AttendanceRangeQuery>,
) -> Result<HttpResponse, AppError> {
    if let Some(date) = query.date {
        let sheet = state.attendance_service.for_class_on(&class_id, date).await?;
        return Ok(HttpResponse::Ok().json(ApiResponse::new("Attendance fetched", sheet)));
    }

    let sheets = state
        .attendance_service
        .for_class(&class_id, query.from, query.to)
        .await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Attendance fetched", sheets)))
}

#[get("/api/attendance/student/{student_id}")]
async fn get_student_attendance(
    state: web::Data<AppState>,
    student_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let days = state.attendance_service.for_student(&student_id).await?;
    Ok(HttpResponse::Ok().json(ListResponse::new("Attendance history fetched", days)))
}

#[get("/api/attendance/student/{student_id}/stats")]
async fn get_student_attendance_stats(
    state: web::Data<AppState>,
    student_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let stats = state
        .attendance_service
        .stats_for_student(&student_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new("Attendance stats fetched", stats)))
}

#[delete("/api/attendance/{id}")]
async fn delete_attendance(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.attendance_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message_only("Attendance sheet deleted")))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(mark_attendance)
        .service(get_class_attendance)
        .service(get_student_attendance_stats)
        .service(get_student_attendance)
        .service(delete_attendance);
}
