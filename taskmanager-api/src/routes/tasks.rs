/// Task endpoints
///
/// All routes require a bearer token. The caller's id comes from the
/// [`AuthContext`] the auth layer inserted, never from the payload.
///
/// # Endpoints
///
/// - `GET /tasks`: List the caller's tasks
/// - `POST /tasks`: Create a task
/// - `GET /tasks/:task_id`: Show one task (owner only)
/// - `PATCH /tasks/:task_id`: Replace a task's fields (owner only)
/// - `DELETE /tasks/:task_id`: Delete a task (owner only)
///
/// # Ownership
///
/// Show compares the loaded row's owner here. Update and delete ask the
/// service, which checks ownership before touching the row; update checks
/// again under the row lock.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::auth::MessageResponse,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskmanager_shared::{
    auth::{authorization::require_ownership, middleware::AuthContext},
    models::task::{Task, TaskList},
    validation::task::{
        validate_create_task, validate_update_task, CreateTaskRequest, UpdateTaskRequest,
    },
};

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreTaskResponse {
    pub message: String,

    pub task: Task,
}

/// List handler
pub async fn index(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<TaskList>> {
    let tasks = state.services.tasks.get_tasks_list(auth.user_id).await?;

    Ok(Json(TaskList { tasks }))
}

/// Create handler
///
/// # Errors
///
/// - 422 if the body is malformed or fails validation
pub async fn store(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<StoreTaskResponse>> {
    let Json(req) = payload?;

    let validation = validate_create_task(&req);
    if !validation.validated {
        return Err(ApiError::Unprocessable(validation.message));
    }

    let task = state
        .services
        .tasks
        .store_task(auth.user_id, req.to_new_task()?)
        .await?;

    tracing::info!(task_id = task.id, user_id = auth.user_id, "Task created");

    Ok(Json(StoreTaskResponse {
        message: "successfully created a new task".to_string(),
        task,
    }))
}

/// Show handler
///
/// # Errors
///
/// - 404 if the task does not exist
/// - 401 if the caller does not own it
pub async fn show(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<Task>> {
    let task = state.services.tasks.show_task(task_id).await?;
    require_ownership(&auth, task.created_by)?;

    Ok(Json(task))
}

/// Update handler
///
/// # Errors
///
/// - 422 if the body is malformed or fails validation
/// - 401 if the caller does not own the task, or it does not exist
/// - 404 if the task disappeared between the ownership check and the lock
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<i64>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(req) = payload?;

    let validation = validate_update_task(&req);
    if !validation.validated {
        return Err(ApiError::Unprocessable(validation.message));
    }

    if !state
        .services
        .tasks
        .is_task_owner(auth.user_id, task_id)
        .await?
    {
        return Err(ApiError::Unauthorized(
            "user not authorized for this action".to_string(),
        ));
    }

    let task = state
        .services
        .tasks
        .update_task(auth.user_id, req.to_update_task(task_id)?)
        .await?;

    Ok(Json(task))
}

/// Delete handler
///
/// # Errors
///
/// - 401 if the caller does not own the task, or it does not exist
pub async fn destroy(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .services
        .tasks
        .delete_task(task_id, auth.user_id)
        .await?;

    tracing::info!(task_id, user_id = auth.user_id, "Task deleted");

    Ok(Json(MessageResponse {
        message: "task deleted successfully".to_string(),
    }))
}
