// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::registration::Registration;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card,
    Pse,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_provider", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    Stripe,
    Wompi,
}

impl PaymentProvider {
    // Cartão vai para a Stripe; PSE e transferência ficam com a Wompi
    pub fn for_method(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Card => PaymentProvider::Stripe,
            PaymentMethod::Pse | PaymentMethod::Transfer => PaymentProvider::Wompi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub provider: PaymentProvider,
    pub method: PaymentMethod,

    #[schema(example = "150000.00")]
    pub amount: Decimal,

    pub status: PaymentStatus,

    #[schema(example = "cs_test_a1b2c3")]
    pub provider_ref: Option<String>,

    pub created_at: DateTime<Utc>,
}

// Pagamento com a matrícula embutida (listagem e consulta)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWithRegistration {
    #[serde(flatten)]
    pub payment: Payment,
    pub registration: Registration,
}

// Os dois campos são opcionais no wire para respondermos a mensagem
// exata quando faltam, em vez do erro genérico do desserializador.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    pub registration_id: Option<Uuid>,
    pub method: Option<PaymentMethod>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub payment_id: Uuid,

    #[schema(example = "https://checkout.stripe.com/c/pay/cs_test_a1b2c3")]
    pub checkout_url: String,

    pub provider: PaymentProvider,

    #[schema(example = "Checkout creado")]
    pub message: String,
}

// --- Eventos de webhook (formato do provedor, só os campos que usamos) ---

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: StripeCheckoutObject,
}

#[derive(Debug, Deserialize)]
pub struct StripeCheckoutObject {
    pub id: String,
    #[serde(default)]
    pub metadata: Option<StripeMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeMetadata {
    pub registration_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WompiEvent {
    pub data: Option<WompiEventData>,
}

#[derive(Debug, Deserialize)]
pub struct WompiEventData {
    pub transaction: Option<WompiTransaction>,
}

#[derive(Debug, Deserialize)]
pub struct WompiTransaction {
    pub id: Option<String>,
    pub reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_goes_to_stripe_rest_goes_to_wompi() {
        assert_eq!(
            PaymentProvider::for_method(PaymentMethod::Card),
            PaymentProvider::Stripe
        );
        assert_eq!(
            PaymentProvider::for_method(PaymentMethod::Pse),
            PaymentProvider::Wompi
        );
        assert_eq!(
            PaymentProvider::for_method(PaymentMethod::Transfer),
            PaymentProvider::Wompi
        );
    }

    #[test]
    fn stripe_event_parses_with_camel_case_metadata() {
        let body = r#"{
            "type": "checkout.session.completed",
            "data": {
                "object": {
                    "id": "cs_test_123",
                    "metadata": { "registrationId": "3f0c3f2e-58c4-4f6b-9d35-53e4a1b2c3d4" }
                }
            }
        }"#;

        let event: StripeEvent = serde_json::from_str(body).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
        assert_eq!(event.data.object.id, "cs_test_123");
        assert_eq!(
            event.data.object.metadata.unwrap().registration_id.as_deref(),
            Some("3f0c3f2e-58c4-4f6b-9d35-53e4a1b2c3d4")
        );
    }

    #[test]
    fn stripe_event_without_metadata_still_parses() {
        let body = r#"{"type":"charge.refunded","data":{"object":{"id":"ch_1"}}}"#;
        let event: StripeEvent = serde_json::from_str(body).unwrap();
        assert!(event.data.object.metadata.is_none());
    }

    #[test]
    fn wompi_event_tolerates_missing_pieces() {
        let event: WompiEvent = serde_json::from_str(r#"{"data":{}}"#).unwrap();
        assert!(event.data.unwrap().transaction.is_none());

        let event: WompiEvent = serde_json::from_str(r#"{}"#).unwrap();
        assert!(event.data.is_none());
    }
}
