use crate::{
    error::AppError,
    models::{TaskQuery, TaskRequest},
    tasks::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

/// Lists tasks, optionally for one owner.
///
/// ## Query Parameters:
/// - `userId` (optional): only tasks owned by this user.
///
/// ## Responses:
/// - `200 OK`: JSON array of tasks, ordered by id.
/// - `400 Bad Request`: `userId` is not a number.
#[get("")]
pub async fn get_tasks(
    service: web::Data<TaskService>,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let tasks = service.list(query.user_id).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Lists the tasks owned by `userId`.
#[get("/user/{user_id}")]
pub async fn get_tasks_by_user(
    service: web::Data<TaskService>,
    user_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let tasks = service.list(Some(user_id.into_inner())).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task for the user named by `userId` in the body.
///
/// ## Request Body:
/// - `title` (required, not blank)
/// - `status` (required): `PENDING`, `IN_PROGRESS` or `COMPLETED`
/// - `userId` (required): owner id, must exist
/// - `description` (optional)
/// - `dueDate` (optional): `YYYY-MM-DD`
///
/// ## Responses:
/// - `200 OK`: the created task.
/// - `400 Bad Request`: missing or malformed fields.
/// - `404 Not Found`: the owner does not exist.
#[post("")]
pub async fn create_task(
    service: web::Data<TaskService>,
    task_data: web::Json<TaskRequest>,
) -> Result<impl Responder, AppError> {
    let request = task_data.into_inner();
    let Some(owner_id) = request.user_id else {
        return Err(AppError::ValidationError("User id is required".into()));
    };
    let input = request.into_input()?;

    let task = service.create(input, owner_id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Retrieves a single task.
///
/// ## Responses:
/// - `200 OK`: the task.
/// - `404 Not Found`: no task with that id.
#[get("/{id}")]
pub async fn get_task(
    service: web::Data<TaskService>,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = service.get_by_id(task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Replaces title, description, status and due date of a task.
///
/// A `userId` in the body is ignored: tasks keep the owner they were created with.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: missing or malformed fields.
/// - `404 Not Found`: no task with that id.
#[put("/{id}")]
pub async fn update_task(
    service: web::Data<TaskService>,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskRequest>,
) -> Result<impl Responder, AppError> {
    let input = task_data.into_inner().into_input()?;
    let task = service.update(task_id.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `200 OK`: empty body.
/// - `404 Not Found`: no task with that id.
#[delete("/{id}")]
pub async fn delete_task(
    service: web::Data<TaskService>,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    service.delete(task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}
