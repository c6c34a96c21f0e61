// src/handlers/dashboard.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CapDashboardView, CapRegistrationsReview, RequireCapability},
    },
    models::{
        dashboard::AdminStats,
        registration::{RegistrationDetail, RegistrationView, StatusUpdatePayload},
    },
};

// GET /api/admin/stats
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "Admin",
    responses(
        (status = 200, description = "Tarjetas del panel administrativo", body = AdminStats),
        (status = 403, description = "Permisos insuficientes")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapDashboardView>,
) -> Result<Json<AdminStats>, AppError> {
    let stats = app_state.dashboard_service.stats().await?;
    Ok(Json(stats))
}

// As rotas de matrícula do painel reaproveitam o mesmo serviço das rotas
// públicas de administração; só o prefixo muda.

// GET /api/admin/registrations
#[utoipa::path(
    get,
    path = "/api/admin/registrations",
    tag = "Admin",
    responses(
        (status = 200, description = "Solicitudes con colegio y pagos", body = Vec<RegistrationView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_list_registrations(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapRegistrationsReview>,
) -> Result<Json<Vec<RegistrationView>>, AppError> {
    let registrations = app_state.registration_service.list().await?;
    Ok(Json(registrations))
}

// GET /api/admin/registrations/{id}
#[utoipa::path(
    get,
    path = "/api/admin/registrations/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "ID de la solicitud")),
    responses(
        (status = 200, description = "Detalle con usuario vinculado", body = RegistrationDetail),
        (status = 404, description = "Registro no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_get_registration(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapRegistrationsReview>,
    Path(id): Path<Uuid>,
) -> Result<Json<RegistrationDetail>, AppError> {
    let detail = app_state.registration_service.get(id).await?;
    Ok(Json(detail))
}

// PATCH /api/admin/registrations/{id}/status
#[utoipa::path(
    patch,
    path = "/api/admin/registrations/{id}/status",
    tag = "Admin",
    request_body = StatusUpdatePayload,
    params(("id" = Uuid, Path, description = "ID de la solicitud")),
    responses(
        (status = 200, description = "Estado actualizado", body = RegistrationView),
        (status = 400, description = "Estado requerido"),
        (status = 404, description = "Registro no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_update_registration_status(
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
