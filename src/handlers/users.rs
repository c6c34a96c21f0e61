// src/handlers/users.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{CapUsersManage, RequireCapability},
    models::auth::{CreateUserPayload, UpdateUserPayload, User, UserWithSchool},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// Filtra por papel (admin, teacher ou student), sem diferenciar caixa
    pub role: Option<String>,
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Usuarios con su colegio", body = Vec<UserWithSchool>),
        (status = 400, description = "Rol inválido"),
        (status = 403, description = "Permisos insuficientes")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapUsersManage>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<UserWithSchool>>, AppError> {
    let users = app_state.user_service.list(query.role.as_deref()).await?;
    Ok(Json(users))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuario creado", body = User),
        (status = 400, description = "Datos inválidos"),
        (status = 409, description = "Email ya registrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapUsersManage>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.user_service.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// PATCH /api/users/{id}
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    tag = "Users",
    request_body = UpdateUserPayload,
    params(("id" = Uuid, Path, description = "ID del usuario")),
    responses(
        (status = 200, description = "Usuario actualizado", body = User),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapUsersManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.user_service.update(id, &payload).await?;

    Ok(Json(user))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID del usuario")),
    responses(
        (status = 204, description = "Usuario eliminado junto con sus vínculos"),
        (status = 404, description = "Usuario no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapUsersManage>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
