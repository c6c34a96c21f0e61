// src/services/stripe.rs
//
// Cliente mínimo da API da Stripe: só a criação de Checkout Session,
// via form-encoding, que é o formato que a API espera.

use std::time::Duration;

use reqwest::Client;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::Deserialize;

use crate::{common::error::AppError, models::registration::Registration};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Clone)]
pub struct StripeGateway {
    client: Client,
    secret_key: String,
    public_url: String,
}

impl StripeGateway {
    pub fn new(secret_key: String, public_url: String) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            secret_key,
            public_url,
        })
    }

    // Sessão de checkout hospedada. O id da matrícula viaja nos metadados
    // e volta no webhook de confirmação.
    pub async fn create_checkout_session(
        &self,
        registration: &Registration,
    ) -> Result<CheckoutSession, AppError> {
        // A Stripe trabalha em centavos
        let unit_amount = (registration.amount * Decimal::from(100))
            .to_i64()
            .ok_or_else(|| {
                anyhow::anyhow!("valor de matrícula fora do intervalo: {}", registration.amount)
            })?;

        let success_url = format!(
            "{}/?status=success&registration={}",
            self.public_url, registration.id
        );
        let cancel_url = format!(
            "{}/?status=cancel&registration={}",
            self.public_url, registration.id
        );
        let product_name = format!("Matrícula {}", registration.full_name);
        let registration_id = registration.id.to_string();
        let unit_amount_text = unit_amount.to_string();

        let params: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("payment_method_types[0]", "card"),
            ("success_url", &success_url),
            ("cancel_url", &cancel_url),
            ("customer_email", &registration.email),
            ("metadata[registrationId]", &registration_id),
            ("line_items[0][price_data][currency]", "cop"),
            ("line_items[0][price_data][unit_amount]", &unit_amount_text),
            ("line_items[0][price_data][product_data][name]", &product_name),
            ("line_items[0][quantity]", "1"),
        ];

        let response = self
            .client
            .post(format!("{STRIPE_API_BASE}/checkout/sessions"))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Erro criando checkout na Stripe: {e}");
                AppError::StripeCheckoutFailed
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Stripe respondeu {status}: {body}");
            return Err(AppError::StripeCheckoutFailed);
        }

        response.json::<CheckoutSession>().await.map_err(|e| {
            tracing::error!("Resposta da Stripe não parseável: {e}");
            AppError::StripeCheckoutFailed
        })
    }
}
