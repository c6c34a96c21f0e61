// src/handlers/tasks.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CapTasksAuthor, CapTasksClose, CapTasksDelete, CapTasksRead, RequireCapability},
    },
    models::bulletin::{CreateTaskPayload, Task, TaskListQuery},
};

// GET /api/tasks
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "Tasks",
    params(TaskListQuery),
    responses(
        (status = 200, description = "Tareas filtradas", body = Vec<Task>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_tasks(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapTasksRead>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = app_state.bulletin_service.list_tasks(&query).await?;
    Ok(Json(tasks))
}

// POST /api/tasks
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "Tasks",
    request_body = CreateTaskPayload,
    responses(
        (status = 201, description = "Tarea creada", body = Task),
        (status = 400, description = "Datos inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_task(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapTasksAuthor>,
    AuthenticatedUser(author): AuthenticatedUser,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let task = app_state.bulletin_service.create_task(&author, &payload).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

// POST /api/tasks/{id}/publish
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/publish",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "ID de la tarea")),
    responses(
        (status = 200, description = "Tarea publicada", body = Task),
        (status = 404, description = "No encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn publish_task(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapTasksAuthor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, AppError> {
    let task = app_state.bulletin_service.publish_task(id).await?;
    Ok(Json(task))
}

// POST /api/tasks/{id}/close
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/close",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "ID de la tarea")),
    responses(
        (status = 200, description = "Tarea cerrada", body = Task),
        (status = 404, description = "No encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_task(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapTasksClose>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, AppError> {
    let task = app_state.bulletin_service.close_task(id).await?;
    Ok(Json(task))
}

// DELETE /api/tasks/{id}
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "ID de la tarea")),
    responses(
        (status = 204, description = "Tarea eliminada (idempotente)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_task(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapTasksDelete>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.bulletin_service.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
