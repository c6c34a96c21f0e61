// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{AuthResponse, LoginPayload, RegisterPayload},
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Cuenta creada y sesión iniciada", body = AuthResponse),
        (status = 400, description = "Datos inválidos"),
        (status = 409, description = "Email ya registrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, user) = app_state.auth_service.register_user(&payload).await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sesión iniciada", body = AuthResponse),
        (status = 401, description = "Credenciales incorrectas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, user) = app_state.auth_service.login_user(&payload).await?;

    Ok(Json(AuthResponse { token, user }))
}
