use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::registration::RegistrationStatus;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Datos inválidos")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Datos inválidos")]
    InvalidPayload,

    // Conflito de matrícula: a resposta carrega o registro já existente.
    #[error("Ya existe una solicitud activa para este correo")]
    ActiveRegistrationExists {
        registration_id: Uuid,
        status: RegistrationStatus,
    },

    #[error("Email ya registrado")]
    EmailAlreadyExists,

    #[error("Credenciales incorrectas")]
    InvalidCredentials,

    #[error("No autorizado")]
    Unauthorized,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permisos insuficientes")]
    Forbidden,

    #[error("Solo el docente asignado puede calificar")]
    NotAssignmentOwner,

    #[error("No estás asignado a esta tarea")]
    NotAssignedToTask,

    #[error("Registro no encontrado")]
    RegistrationNotFound,

    #[error("Pago no encontrado")]
    PaymentNotFound,

    #[error("Asignación no encontrada")]
    AssignmentNotFound,

    #[error("Usuario no encontrado")]
    UserNotFound,

    #[error("Colegio no encontrado")]
    SchoolNotFound,

    #[error("Docente no encontrado")]
    TeacherNotFound,

    #[error("Algún estudiante no existe")]
    StudentsNotFound,

    #[error("El estudiante no está asignado a esta tarea")]
    StudentNotLinked,

    #[error("El estudiante no está asignado")]
    StudentLinkNotFound,

    #[error("No encontrado")]
    ItemNotFound,

    #[error("Estado requerido")]
    StatusRequired,

    #[error("Nombre requerido")]
    NameRequired,

    #[error("Sin cambios")]
    EmptyUpdate,

    #[error("registrationId y method son requeridos")]
    CheckoutFieldsRequired,

    #[error("Stripe no configurado")]
    StripeNotConfigured,

    #[error("Wompi no configurado")]
    WompiNotConfigured,

    #[error("Firma requerida")]
    SignatureRequired,

    #[error("Firma inválida")]
    InvalidSignature,

    #[error("Payload inválido")]
    InvalidWebhookPayload,

    #[error("Referencia requerida")]
    MissingReference,

    #[error("No se pudo crear el pago en Stripe")]
    StripeCheckoutFailed,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Datos inválidos",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // O front usa registrationId/status para retomar a solicitação existente.
            AppError::ActiveRegistrationExists {
                registration_id,
                status,
            } => {
                let body = Json(json!({
                    "error": "Ya existe una solicitud activa para este correo",
                    "registrationId": registration_id,
                    "status": status,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }

            AppError::InvalidPayload => (StatusCode::BAD_REQUEST, "Datos inválidos"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Email ya registrado"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Credenciales incorrectas"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "No autorizado"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token inválido"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Permisos insuficientes"),
            AppError::NotAssignmentOwner => {
                (StatusCode::FORBIDDEN, "Solo el docente asignado puede calificar")
            }
            AppError::NotAssignedToTask => {
                (StatusCode::FORBIDDEN, "No estás asignado a esta tarea")
            }
            AppError::RegistrationNotFound => (StatusCode::NOT_FOUND, "Registro no encontrado"),
            AppError::PaymentNotFound => (StatusCode::NOT_FOUND, "Pago no encontrado"),
            AppError::AssignmentNotFound => (StatusCode::NOT_FOUND, "Asignación no encontrada"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuario no encontrado"),
            AppError::SchoolNotFound => (StatusCode::NOT_FOUND, "Colegio no encontrado"),
            AppError::TeacherNotFound => (StatusCode::NOT_FOUND, "Docente no encontrado"),
            AppError::StudentsNotFound => (StatusCode::NOT_FOUND, "Algún estudiante no existe"),
            AppError::StudentNotLinked => {
                (StatusCode::NOT_FOUND, "El estudiante no está asignado a esta tarea")
            }
            AppError::StudentLinkNotFound => {
                (StatusCode::NOT_FOUND, "El estudiante no está asignado")
            }
            AppError::ItemNotFound => (StatusCode::NOT_FOUND, "No encontrado"),
            AppError::StatusRequired => (StatusCode::BAD_REQUEST, "Estado requerido"),
            AppError::NameRequired => (StatusCode::BAD_REQUEST, "Nombre requerido"),
            AppError::EmptyUpdate => (StatusCode::BAD_REQUEST, "Sin cambios"),
            AppError::CheckoutFieldsRequired => {
                (StatusCode::BAD_REQUEST, "registrationId y method son requeridos")
            }
            AppError::StripeNotConfigured => (StatusCode::BAD_REQUEST, "Stripe no configurado"),
            AppError::WompiNotConfigured => (StatusCode::BAD_REQUEST, "Wompi no configurado"),
            AppError::SignatureRequired => (StatusCode::BAD_REQUEST, "Firma requerida"),
            AppError::InvalidSignature => (StatusCode::BAD_REQUEST, "Firma inválida"),
            AppError::InvalidWebhookPayload => (StatusCode::BAD_REQUEST, "Payload inválido"),
            AppError::MissingReference => (StatusCode::BAD_REQUEST, "Referencia requerida"),
            AppError::StripeCheckoutFailed => {
                (StatusCode::INTERNAL_SERVER_ERROR, "No se pudo crear el pago en Stripe")
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error interno del servidor")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
