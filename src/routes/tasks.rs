use crate::{
    auth::{AuthMiddleware, AuthenticatedUser},
    error::AppError,
    models::{Task, TaskInput},
    state::AppState,
};
use actix_web::{get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

/// Loads a task the caller may see.
///
/// Missing, deleted and foreign tasks all answer the same 404.
async fn owned_task(
    state: &AppState,
    task_id: Uuid,
    user: &AuthenticatedUser,
) -> Result<Task, AppError> {
    match state.tasks.find_task(task_id).await? {
        Some(task) if task.is_visible_to(user.user_id) => Ok(task),
        _ => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Creates a new task for the authenticated user.
///
/// The owner is always taken from the verified token, never from the body.
///
/// ## Responses:
/// - `201 Created`: `{"message": ..., "task_id": ...}`.
/// - `400 Bad Request`: Missing or invalid fields.
/// - `401 Unauthorized`: Missing or invalid token.
#[post("/createTask", wrap = "AuthMiddleware")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), user.user_id);
    state.tasks.create_task(&task).await?;

    log::info!("task {} created by user {}", task.id, user.user_id);
    Ok(HttpResponse::Created().json(json!({
        "message": "Task added successfully",
        "task_id": task.id
    })))
}

/// Lists the authenticated user's tasks, oldest first. Deleted tasks are left out.
#[get("/getAllTasks", wrap = "AuthMiddleware")]
pub async fn get_all_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.tasks_for_owner(user.user_id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves one of the authenticated user's tasks by id.
#[get("/getTaskById/{id}", wrap = "AuthMiddleware")]
pub async fn get_task_by_id(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = owned_task(&state, task_id.into_inner(), &user).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Replaces every mutable field of one of the authenticated user's tasks.
///
/// The body must be a complete `TaskInput`; there is no partial update.
///
/// ## Responses:
/// - `200 OK`: The updated task.
/// - `400 Bad Request`: Missing or invalid fields.
/// - `401 Unauthorized`: Missing or invalid token.
/// - `404 Not Found`: No such task for this user.
#[put("/updateTask/{id}", wrap = "AuthMiddleware")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task = owned_task(&state, task_id.into_inner(), &user).await?;

    match state
        .tasks
        .update_task(task.id, user.user_id, &task_data)
        .await?
    {
        Some(updated) => {
            log::info!("task {} updated", updated.id);
            Ok(HttpResponse::Ok().json(updated))
        }
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

/// Permanently removes one of the authenticated user's tasks.
#[put("/deleteTask/{id}", wrap = "AuthMiddleware")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = owned_task(&state, task_id.into_inner(), &user).await?;

    if !state.tasks.delete_task(task.id, user.user_id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }

    log::info!("task {} deleted", task.id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}
