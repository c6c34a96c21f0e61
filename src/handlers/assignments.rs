// src/handlers/assignments.rs

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
        rbac::{
            CapAssignmentsGrade, CapAssignmentsMap, CapAssignmentsOwn, CapAssignmentsRead,
            CapAssignmentsSubmit, RequireCapability,
        },
    },
    models::assignment::{
        AssignRosterPayload, AssignmentDetail, CreateGradedAssignmentPayload, GradePayload,
        GradeResponse, RosterView, SubmitResponse, TeacherRosterView,
    },
};

// POST /api/assignments (admin refaz o mapeamento docente -> alunos)
#[utoipa::path(
    post,
    path = "/api/assignments",
    tag = "Assignments",
    request_body = AssignRosterPayload,
    responses(
        (status = 201, description = "Mapeo reemplazado", body = RosterView),
        (status = 404, description = "Docente o estudiantes no encontrados")
    ),
    security(("api_jwt" = []))
)]
pub async fn map_roster(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapAssignmentsMap>,
    Json(payload): Json<AssignRosterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let roster = app_state.assignment_service.map_roster(&payload).await?;

    Ok((StatusCode::CREATED, Json(roster)))
}

// GET /api/assignments
#[utoipa::path(
    get,
    path = "/api/assignments",
    tag = "Assignments",
    responses(
        (status = 200, description = "Todos los mapeos", body = Vec<RosterView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_rosters(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapAssignmentsMap>,
) -> Result<Json<Vec<RosterView>>, AppError> {
    let rosters = app_state.assignment_service.list_rosters().await?;
    Ok(Json(rosters))
}

// GET /api/assignments/mine
#[utoipa::path(
    get,
    path = "/api/assignments/mine",
    tag = "Assignments",
    responses(
        (status = 200, description = "Mapeos del docente autenticado", body = Vec<TeacherRosterView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn my_rosters(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapAssignmentsOwn>,
    AuthenticatedUser(teacher): AuthenticatedUser,
) -> Result<Json<Vec<TeacherRosterView>>, AppError> {
    let rosters = app_state.assignment_service.my_rosters(&teacher).await?;
    Ok(Json(rosters))
}

// POST /api/assignments/graded (docente cria a atividade avaliável)
#[utoipa::path(
    post,
    path = "/api/assignments/graded",
    tag = "Assignments",
    request_body = CreateGradedAssignmentPayload,
    responses(
        (status = 201, description = "Actividad creada con vínculos pendientes", body = AssignmentDetail),
        (status = 404, description = "Algún estudiante no existe")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_graded(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapAssignmentsOwn>,
    AuthenticatedUser(teacher): AuthenticatedUser,
    Json(payload): Json<CreateGradedAssignmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detail = app_state
        .assignment_service
        .create_graded(&teacher, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/assignments/{id}
#[utoipa::path(
    get,
    path = "/api/assignments/{id}",
    tag = "Assignments",
    params(("id" = Uuid, Path, description = "ID de la asignación")),
    responses(
        (status = 200, description = "Detalle con estudiantes y estados", body = AssignmentDetail),
        (status = 403, description = "Permisos insuficientes"),
        (status = 404, description = "Asignación no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_assignment(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapAssignmentsRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AssignmentDetail>, AppError> {
    let detail = app_state.assignment_service.get_detail(id, &user).await?;
    Ok(Json(detail))
}

// POST /api/assignments/{id}/submit
#[utoipa::path(
    post,
    path = "/api/assignments/{id}/submit",
    tag = "Assignments",
    params(("id" = Uuid, Path, description = "ID de la asignación")),
    responses(
        (status = 200, description = "Entrega registrada", body = SubmitResponse),
        (status = 403, description = "No estás asignado a esta tarea"),
        (status = 404, description = "Asignación no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn submit_assignment(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapAssignmentsSubmit>,
    AuthenticatedUser(student): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>, AppError> {
    let receipt = app_state.assignment_service.submit(id, &student).await?;
    Ok(Json(receipt))
}

// PATCH /api/assignments/{id}/grade
#[utoipa::path(
    patch,
    path = "/api/assignments/{id}/grade",
    tag = "Assignments",
    request_body = GradePayload,
    params(("id" = Uuid, Path, description = "ID de la asignación")),
    responses(
        (status = 200, description = "Nota registrada", body = GradeResponse),
        (status = 403, description = "Solo el docente asignado puede calificar"),
        (status = 404, description = "Asignación o estudiante no encontrados")
    ),
    security(("api_jwt" = []))
)]
pub async fn grade_assignment(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapAssignmentsGrade>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<GradePayload>,
) -> Result<Json<GradeResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let result = app_state
        .assignment_service
        .grade(id, &actor, &payload)
        .await?;

    Ok(Json(result))
}

// DELETE /api/assignments/{id}/student/{student_id}
#[utoipa::path(
    delete,
    path = "/api/assignments/{id}/student/{student_id}",
    tag = "Assignments",
    params(
        ("id" = Uuid, Path, description = "ID de la asignación"),
        ("student_id" = Uuid, Path, description = "ID del estudiante")
    ),
    responses(
        (status = 204, description = "Estudiante desvinculado; la asignación cae al quedar vacía"),
        (status = 404, description = "El estudiante no está asignado")
    ),
    security(("api_jwt" = []))
)]
pub async fn unassign_student(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapAssignmentsMap>,
    Path((id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state.assignment_service.unassign(id, student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/assignments/{id}
#[utoipa::path(
    delete,
    path = "/api/assignments/{id}",
    tag = "Assignments",
    params(("id" = Uuid, Path, description = "ID de la asignación")),
    responses(
        (status = 204, description = "Asignación eliminada"),
        (status = 404, description = "Asignación no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_assignment(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapAssignmentsMap>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.assignment_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
