pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

use crate::error::AppError;

/// Registers every endpoint plus extractor settings that route decode failures
/// through `AppError`, so all error bodies share the `{"error": ...}` shape.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AppError::NotFound("Record not found".into()).into()),
    )
    .service(health::health)
    .service(users::user_signup)
    .service(users::user_login)
    .service(users::update_user)
    .service(users::delete_user)
    .service(tasks::create_task)
    .service(tasks::get_all_tasks)
    .service(tasks::get_task_by_id)
    .service(tasks::update_task)
    .service(tasks::delete_task);
}
