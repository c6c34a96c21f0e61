// src/handlers/profile.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CapProfileStudent, CapProfileTeacher, RequireCapability},
    },
    models::{
        assignment::{StudentAssignmentView, TeacherAssignmentView},
        auth::{UpdateProfilePayload, User, UserWithSchool},
        registration::RegistrationView,
    },
};

// GET /api/profile/me
#[utoipa::path(
    get,
    path = "/api/profile/me",
    tag = "Profile",
    responses(
        (status = 200, description = "Cuenta del usuario autenticado con su colegio", body = UserWithSchool),
        (status = 401, description = "No autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<UserWithSchool>, AppError> {
    let profile = app_state.user_service.get_profile(user.id).await?;
    Ok(Json(profile))
}

// PATCH /api/profile/me
#[utoipa::path(
    patch,
    path = "/api/profile/me",
    tag = "Profile",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Cuenta actualizada", body = User),
        (status = 400, description = "Sin cambios")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_me(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<User>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let updated = app_state
        .user_service
        .update_profile(user.id, &payload)
        .await?;

    Ok(Json(updated))
}

// GET /api/profile/student/registration
#[utoipa::path(
    get,
    path = "/api/profile/student/registration",
    tag = "Profile",
    responses(
        (status = 200, description = "Última solicitud de matrícula del estudiante", body = RegistrationView),
        (status = 404, description = "Registro no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn student_registration(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapProfileStudent>,
    AuthenticatedUser(student): AuthenticatedUser,
) -> Result<Json<RegistrationView>, AppError> {
    let registration = app_state
        .registration_service
        .profile_registration(&student)
        .await?;
    Ok(Json(registration))
}

// GET /api/profile/student/assignments
#[utoipa::path(
    get,
    path = "/api/profile/student/assignments",
    tag = "Profile",
    responses(
        (status = 200, description = "Actividades del estudiante con su docente", body = Vec<StudentAssignmentView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn student_assignments(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapProfileStudent>,
    AuthenticatedUser(student): AuthenticatedUser,
) -> Result<Json<Vec<StudentAssignmentView>>, AppError> {
    let assignments = app_state.assignment_service.student_profile(&student).await?;
    Ok(Json(assignments))
}

// GET /api/profile/teacher/assignments
#[utoipa::path(
    get,
    path = "/api/profile/teacher/assignments",
    tag = "Profile",
    responses(
        (status = 200, description = "Actividades del docente con sus estudiantes", body = Vec<TeacherAssignmentView>)
    ),
    security(("api_jwt" = []))
)]
pub async fn teacher_assignments(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapProfileTeacher>,
    AuthenticatedUser(teacher): AuthenticatedUser,
) -> Result<Json<Vec<TeacherAssignmentView>>, AppError> {
    let assignments = app_state.assignment_service.teacher_profile(&teacher).await?;
    Ok(Json(assignments))
}
