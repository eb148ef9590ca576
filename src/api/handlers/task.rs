//! Task HTTP handlers.
//!
//! This module provides handlers for the task marketplace:
//!
//! - `POST /api/task/create` - Create a task, reserving its escrow
//! - `GET /api/task/get_active_tasks` - The caller's active tasks
//! - `GET /api/task/get_archived_tasks` - The caller's archived and finished tasks
//! - `GET /api/task/get_tasks_with_type` - Tasks the caller can claim
//! - `GET /api/task/types` - The task type lookup table
//! - `POST /api/task/claim_task` - Complete a task and get paid
//! - `POST /api/task/finish_task` - Close a task, refunding unused escrow
//! - `POST /api/task/archive_task` - Cancel a task, refunding unused escrow
//!
//! Every route requires the init-data header.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use crate::api::dto::requests::{CreateTaskRequest, TaskActionRequest, TaskTypeQuery};
use crate::api::dto::responses::{
    ClaimResponse, ClosedTaskResponse, TaskResponse, TaskTypeResponse,
};
use crate::api::dto::transformers::{
    claim_to_response, closed_task_to_response, create_task_input, task_to_response,
    task_type_to_response, tasks_to_response,
};
use crate::api::extractors::CurrentUser;
use crate::api::middleware::error_handler::ApiErrorResponse;
use crate::application::{
    active_tasks, archive_task, archived_tasks, claim_task, claimable_tasks, create_task,
    finish_task, task_types,
};
use crate::domain::{TaskId, TaskTypeId};
use crate::infrastructure::AppDependencies;

/// POST /api/task/create - Create a task.
///
/// Reserves `total_clicks * reward_per_click` points from the caller's
/// balance for the lifetime of the task.
///
/// # Request Body
///
/// ```json
/// {
///     "task_type_id": 1,
///     "name": "Join our channel",
///     "link": "https://t.me/example",
///     "total_clicks": 10,
///     "reward_per_click": 50
/// }
/// ```
///
/// # Errors
///
/// Returns `ApiErrorResponse` if:
/// - The input is invalid (`VALIDATION_ERROR`)
/// - The caller cannot afford the escrow (`INSUFFICIENT_FUNDS`)
///
/// # Response
///
/// - `201 Created` - Task created
/// - `400 Bad Request` - Validation failure or insufficient funds
pub async fn create(
    State(dependencies): State<AppDependencies>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiErrorResponse> {
    let task = create_task(
        dependencies.store(),
        user.id,
        create_task_input(request),
        dependencies.now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task_to_response(&task))))
}

/// GET /api/task/get_active_tasks - The caller's active tasks.
///
/// # Errors
///
/// Returns `ApiErrorResponse` on storage failure.
pub async fn get_active_tasks(
    State(dependencies): State<AppDependencies>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<TaskResponse>>, ApiErrorResponse> {
    let tasks = active_tasks(dependencies.store(), user.id).await?;
    Ok(Json(tasks_to_response(&tasks)))
}

/// GET /api/task/get_archived_tasks - The caller's archived and finished tasks.
///
/// # Errors
///
/// Returns `ApiErrorResponse` on storage failure.
pub async fn get_archived_tasks(
    State(dependencies): State<AppDependencies>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<TaskResponse>>, ApiErrorResponse> {
    let tasks = archived_tasks(dependencies.store(), user.id).await?;
    Ok(Json(tasks_to_response(&tasks)))
}

/// GET /api/task/get_tasks_with_type - Tasks the caller can claim.
///
/// Optional query parameter `task_type_id` restricts the listing to one
/// type. Tasks created or already claimed by the caller and tasks without
/// remaining clicks are never listed.
///
/// # Errors
///
/// Returns `ApiErrorResponse` on storage failure.
pub async fn get_tasks_with_type(
    State(dependencies): State<AppDependencies>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<TaskTypeQuery>,
) -> Result<Json<Vec<TaskResponse>>, ApiErrorResponse> {
    let task_type = query.task_type_id.map(TaskTypeId::new);
    let tasks = claimable_tasks(dependencies.store(), user.id, task_type).await?;
    Ok(Json(tasks_to_response(&tasks)))
}

/// GET /api/task/types - The task type lookup table.
///
/// # Errors
///
/// Returns `ApiErrorResponse` on storage failure.
pub async fn get_task_types(
    State(dependencies): State<AppDependencies>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<TaskTypeResponse>>, ApiErrorResponse> {
    let types = task_types(dependencies.store()).await?;
    Ok(Json(types.iter().map(task_type_to_response).collect()))
}

/// POST /api/task/claim_task - Complete a task.
///
/// Records one click and pays the caller their share of the reward.
///
/// # Request Body
///
/// ```json
/// { "task_id": 17 }
/// ```
///
/// # Errors
///
/// Returns `ApiErrorResponse` if the task does not exist, is closed, is
/// full, belongs to the caller, or was already claimed by the caller.
///
/// # Response
///
/// - `200 OK` - Claim paid
/// - `400 Bad Request` - The claim was rejected
pub async fn claim(
    State(dependencies): State<AppDependencies>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<TaskActionRequest>,
) -> Result<Json<ClaimResponse>, ApiErrorResponse> {
    let receipt = claim_task(
        dependencies.store(),
        TaskId::new(request.task_id),
        user.id,
        dependencies.now(),
    )
    .await?;

    Ok(Json(claim_to_response(&receipt)))
}

/// POST /api/task/finish_task - Close one of the caller's tasks.
///
/// # Errors
///
/// Returns `ApiErrorResponse` if the caller owns no such task or it is
/// already closed.
///
/// # Response
///
/// - `200 OK` - Task finished; `refund` points returned to the caller
/// - `400 Bad Request` - `TASK_NOT_FOUND`, `ALREADY_FINISHED` or `INVALID_TRANSITION`
pub async fn finish(
    State(dependencies): State<AppDependencies>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<TaskActionRequest>,
) -> Result<Json<ClosedTaskResponse>, ApiErrorResponse> {
    let closed = finish_task(
        dependencies.store(),
        TaskId::new(request.task_id),
        user.id,
        dependencies.now(),
    )
    .await?;

    Ok(Json(closed_task_to_response(&closed)))
}

/// POST /api/task/archive_task - Cancel one of the caller's tasks.
///
/// # Errors
///
/// Returns `ApiErrorResponse` if the caller owns no such task or it is
/// already closed.
pub async fn archive(
    State(dependencies): State<AppDependencies>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<TaskActionRequest>,
) -> Result<Json<ClosedTaskResponse>, ApiErrorResponse> {
    let closed = archive_task(
        dependencies.store(),
        TaskId::new(request.task_id),
        user.id,
        dependencies.now(),
    )
    .await?;

    Ok(Json(closed_task_to_response(&closed)))
}
