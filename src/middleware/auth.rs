// src/middleware/auth.rs

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request},
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, middleware::rbac::CapabilitySet, models::auth::User};

// O middleware em si: valida o bearer token, carrega o usuário e deixa
// usuário + capacidades disponíveis nos extensions da requisição
pub async fn auth_guard(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let Some(token) = auth_header.and_then(|header| header.strip_prefix("Bearer ")) else {
        return Err(AppError::Unauthorized);
    };

    let user = state.auth_service.validate_token(token).await?;

    request
        .extensions_mut()
        .insert(CapabilitySet::for_role(user.role));
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::Unauthorized)
    }
}
