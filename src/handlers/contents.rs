// src/handlers/contents.rs

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
        rbac::{
            CapContentsAuthor, CapContentsDelete, CapContentsModerate, CapContentsRead,
            RequireCapability,
        },
    },
    models::bulletin::{Content, ContentListQuery, CreateContentPayload},
};

// GET /api/contents
#[utoipa::path(
    get,
    path = "/api/contents",
    tag = "Contents",
    params(ContentListQuery),
    responses(
        (status = 200, description = "Contenidos filtrados", body = Vec<Content>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_contents(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapContentsRead>,
    Query(query): Query<ContentListQuery>,
) -> Result<Json<Vec<Content>>, AppError> {
    let contents = app_state.bulletin_service.list_contents(&query).await?;
    Ok(Json(contents))
}

// POST /api/contents
#[utoipa::path(
    post,
    path = "/api/contents",
    tag = "Contents",
    request_body = CreateContentPayload,
    responses(
        (status = 201, description = "Contenido creado", body = Content),
        (status = 400, description = "Datos inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_content(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapContentsAuthor>,
    AuthenticatedUser(author): AuthenticatedUser,
    Json(payload): Json<CreateContentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let content = app_state
        .bulletin_service
        .create_content(&author, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(content)))
}

// POST /api/contents/{id}/publish
#[utoipa::path(
    post,
    path = "/api/contents/{id}/publish",
    tag = "Contents",
    params(("id" = Uuid, Path, description = "ID del contenido")),
    responses(
        (status = 200, description = "Contenido publicado", body = Content),
        (status = 404, description = "No encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn publish_content(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapContentsAuthor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Content>, AppError> {
    let content = app_state.bulletin_service.publish_content(id).await?;
    Ok(Json(content))
}

// POST /api/contents/{id}/request-approval
#[utoipa::path(
    post,
    path = "/api/contents/{id}/request-approval",
    tag = "Contents",
    params(("id" = Uuid, Path, description = "ID del contenido")),
    responses(
        (status = 200, description = "Aprobación solicitada; el alcance pasa a global", body = Content),
        (status = 404, description = "No encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn request_content_approval(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapContentsAuthor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Content>, AppError> {
    let content = app_state
        .bulletin_service
        .request_content_approval(id)
        .await?;
    Ok(Json(content))
}

// POST /api/contents/{id}/approve
#[utoipa::path(
    post,
    path = "/api/contents/{id}/approve",
    tag = "Contents",
    params(("id" = Uuid, Path, description = "ID del contenido")),
    responses(
        (status = 200, description = "Contenido aprobado", body = Content),
        (status = 404, description = "No encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_content(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapContentsModerate>,
    Path(id): Path<Uuid>,
) -> Result<Json<Content>, AppError> {
    let content = app_state.bulletin_service.approve_content(id).await?;
    Ok(Json(content))
}

// POST /api/contents/{id}/reject
#[utoipa::path(
    post,
    path = "/api/contents/{id}/reject",
    tag = "Contents",
    params(("id" = Uuid, Path, description = "ID del contenido")),
    responses(
        (status = 200, description = "Contenido rechazado", body = Content),
        (status = 404, description = "No encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_content(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapContentsModerate>,
    Path(id): Path<Uuid>,
) -> Result<Json<Content>, AppError> {
    let content = app_state.bulletin_service.reject_content(id).await?;
    Ok(Json(content))
}

// DELETE /api/contents/{id}
#[utoipa::path(
    delete,
    path = "/api/contents/{id}",
    tag = "Contents",
    params(("id" = Uuid, Path, description = "ID del contenido")),
    responses(
        (status = 204, description = "Contenido eliminado (idempotente)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_content(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapContentsDelete>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.bulletin_service.delete_content(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
