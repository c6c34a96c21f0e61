// src/handlers/schools.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{CapSchoolsManage, RequireCapability},
    models::school::{CreateSchoolPayload, School, UpdateSchoolPayload},
};

// GET /api/schools (público: o formulário de matrícula lista os colégios)
#[utoipa::path(
    get,
    path = "/api/schools",
    tag = "Schools",
    responses(
        (status = 200, description = "Colegios ordenados por nombre", body = Vec<School>)
    )
)]
pub async fn list_schools(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<School>>, AppError> {
    let schools = app_state.school_service.list().await?;
    Ok(Json(schools))
}

// POST /api/schools
#[utoipa::path(
    post,
    path = "/api/schools",
    tag = "Schools",
    request_body = CreateSchoolPayload,
    responses(
        (status = 201, description = "Colegio creado", body = School),
        (status = 400, description = "Nombre requerido"),
        (status = 403, description = "Permisos insuficientes")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_school(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapSchoolsManage>,
    Json(payload): Json<CreateSchoolPayload>,
) -> Result<impl IntoResponse, AppError> {
    let school = app_state.school_service.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(school)))
}

// PATCH /api/schools/{id}
#[utoipa::path(
    patch,
    path = "/api/schools/{id}",
    tag = "Schools",
    request_body = UpdateSchoolPayload,
    params(("id" = Uuid, Path, description = "ID del colegio")),
    responses(
        (status = 200, description = "Colegio actualizado", body = School),
        (status = 404, description = "Colegio no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_school(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapSchoolsManage>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSchoolPayload>,
) -> Result<Json<School>, AppError> {
    let school = app_state.school_service.update(id, &payload).await?;
    Ok(Json(school))
}
