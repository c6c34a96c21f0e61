// src/handlers/registrations.rs

use axum::{
    extract::{Path, State},
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
        rbac::{CapRegistrationsReview, RequireCapability},
    },
    models::registration::{
        Registration, RegistrationDetail, RegistrationPayload, RegistrationView,
        StatusUpdatePayload,
    },
};

// POST /api/registrations (público: é o formulário de matrícula do site)
#[utoipa::path(
    post,
    path = "/api/registrations",
    tag = "Registrations",
    request_body = RegistrationPayload,
    responses(
        (status = 201, description = "Solicitud recibida", body = Registration),
        (status = 400, description = "Datos inválidos"),
        (status = 409, description = "Ya existe una solicitud activa para este correo")
    )
)]
pub async fn submit_registration(
    State(app_state): State<AppState>,
    Json(payload): Json<RegistrationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let registration = app_state.registration_service.submit(&payload).await?;

    Ok((StatusCode::CREATED, Json(registration)))
}

// GET /api/registrations
#[utoipa::path(
    get,
    path = "/api/registrations",
    tag = "Registrations",
    responses(
        (status = 200, description = "Solicitudes con colegio y pagos", body = Vec<RegistrationView>),
        (status = 403, description = "Permisos insuficientes")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_registrations(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapRegistrationsReview>,
) -> Result<Json<Vec<RegistrationView>>, AppError> {
    let registrations = app_state.registration_service.list().await?;
    Ok(Json(registrations))
}

// GET /api/registrations/{id}
#[utoipa::path(
    get,
    path = "/api/registrations/{id}",
    tag = "Registrations",
    params(("id" = Uuid, Path, description = "ID de la solicitud")),
    responses(
        (status = 200, description = "Detalle con usuario vinculado", body = RegistrationDetail),
        (status = 404, description = "Registro no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_registration(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapRegistrationsReview>,
    Path(id): Path<Uuid>,
) -> Result<Json<RegistrationDetail>, AppError> {
    let detail = app_state.registration_service.get(id).await?;
    Ok(Json(detail))
}

// PATCH /api/registrations/{id}/status
#[utoipa::path(
    patch,
    path = "/api/registrations/{id}/status",
    tag = "Registrations",
    request_body = StatusUpdatePayload,
    params(("id" = Uuid, Path, description = "ID de la solicitud")),
    responses(
        (status = 200, description = "Estado actualizado; aprobar materializa la cuenta del estudiante", body = RegistrationView),
        (status = 400, description = "Estado requerido"),
        (status = 404, description = "Registro no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_registration_status(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapRegistrationsReview>,
    AuthenticatedUser(admin): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusUpdatePayload>,
) -> Result<Json<RegistrationView>, AppError> {
    let view = app_state
        .registration_service
        .transition_status(id, &payload, admin.id)
        .await?;
    Ok(Json(view))
}
