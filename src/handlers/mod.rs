pub mod assignment_handler;
pub mod attendance_handler;
pub mod class_handler;
pub mod exam_schedule_handler;
pub mod health_handler;
pub mod leave_handler;
pub mod lesson_plan_handler;
pub mod message_handler;
pub mod newsletter_handler;
pub mod quiz_attempt_handler;
pub mod quiz_handler;
pub mod result_handler;
pub mod session_handler;
pub mod student_handler;
pub mod submission_handler;

use actix_web::web;

/// Registers every route. Fixed segments (e.g. `/students/promote`) are
/// registered before their `{id}` siblings so they are not captured as ids.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health_handler::configure(cfg);
    class_handler::configure(cfg);
    session_handler::configure(cfg);
    student_handler::configure(cfg);
    quiz_handler::configure(cfg);
    quiz_attempt_handler::configure(cfg);
    assignment_handler::configure(cfg);
    submission_handler::configure(cfg);
    attendance_handler::configure(cfg);
    result_handler::configure(cfg);
    exam_schedule_handler::configure(cfg);
    lesson_plan_handler::configure(cfg);
    leave_handler::configure(cfg);
    message_handler::configure(cfg);
    newsletter_handler::configure(cfg);
}
