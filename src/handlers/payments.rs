// src/handlers/payments.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CapPaymentsRead, CapPaymentsReview, RequireCapability},
    },
    models::payment::{CheckoutPayload, CheckoutResponse, PaymentWithRegistration},
};

// POST /api/payments/checkout (público: o formulário chama antes do login)
#[utoipa::path(
    post,
    path = "/api/payments/checkout",
    tag = "Payments",
    request_body = CheckoutPayload,
    responses(
        (status = 201, description = "Pago registrado y URL de checkout", body = CheckoutResponse),
        (status = 400, description = "registrationId y method son requeridos"),
        (status = 404, description = "Registro no encontrado"),
        (status = 500, description = "No se pudo crear el pago en Stripe")
    )
)]
pub async fn checkout(
    State(app_state): State<AppState>,
    Json(payload): Json<CheckoutPayload>,
) -> Result<impl IntoResponse, AppError> {
    let response = app_state.payment_service.checkout(&payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

// POST /api/payments/webhooks/stripe
//
// O corpo chega cru (Bytes): a assinatura cobre os bytes exatos que a
// Stripe enviou, qualquer reserialização invalida o HMAC.
#[utoipa::path(
    post,
    path = "/api/payments/webhooks/stripe",
    tag = "Payments",
    request_body = Vec<u8>,
    responses(
        (status = 200, description = "Evento recibido"),
        (status = 400, description = "Firma ausente o inválida")
    )
)]
pub async fn stripe_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok());

    app_state
        .payment_service
        .handle_stripe_webhook(signature, &body)
        .await?;

    Ok(Json(json!({ "received": true })))
}

// POST /api/payments/webhooks/wompi
#[utoipa::path(
    post,
    path = "/api/payments/webhooks/wompi",
    tag = "Payments",
    request_body = Vec<u8>,
    responses(
        (status = 200, description = "Evento recibido"),
        (status = 400, description = "Firma ausente o inválida")
    )
)]
pub async fn wompi_webhook(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let checksum = headers
        .get("x-message-integrity-checksum")
        .and_then(|value| value.to_str().ok());

    app_state
        .payment_service
        .handle_wompi_webhook(checksum, &body)
        .await?;

    Ok(Json(json!({ "received": true })))
}

// GET /api/payments
#[utoipa::path(
    get,
    path = "/api/payments",
    tag = "Payments",
    responses(
        (status = 200, description = "Pagos con su solicitud de matrícula", body = Vec<PaymentWithRegistration>),
        (status = 403, description = "Permisos insuficientes")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapPaymentsReview>,
) -> Result<Json<Vec<PaymentWithRegistration>>, AppError> {
    let payments = app_state.payment_service.list().await?;
    Ok(Json(payments))
}

// GET /api/payments/{id} (o dono da matrícula ou um admin)
#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID del pago")),
    responses(
        (status = 200, description = "Pago con su solicitud", body = PaymentWithRegistration),
        (status = 403, description = "Permisos insuficientes"),
        (status = 404, description = "Pago no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_payment(
    State(app_state): State<AppState>,
    _guard: RequireCapability<CapPaymentsRead>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentWithRegistration>, AppError> {
    let payment = app_state.payment_service.get(id, &user).await?;
    Ok(Json(payment))
}
