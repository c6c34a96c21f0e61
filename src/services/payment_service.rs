// src/services/payment_service.rs

use std::collections::HashMap;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        signatures::{verify_stripe_signature, verify_wompi_signature},
    },
    db::{PaymentRepository, RegistrationRepository},
    models::{
        auth::{Role, User},
        payment::{
            CheckoutPayload, CheckoutResponse, PaymentProvider, PaymentWithRegistration,
            StripeEvent, WompiEvent,
        },
        registration::Registration,
    },
    services::stripe::StripeGateway,
};

#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
    registration_repo: RegistrationRepository,
    stripe_gateway: Option<StripeGateway>,
    stripe_webhook_secret: Option<String>,
    wompi_webhook_secret: Option<String>,
    pool: PgPool,
}

impl PaymentService {
    pub fn new(
        payment_repo: PaymentRepository,
        registration_repo: RegistrationRepository,
        stripe_gateway: Option<StripeGateway>,
        stripe_webhook_secret: Option<String>,
        wompi_webhook_secret: Option<String>,
        pool: PgPool,
    ) -> Self {
        Self {
            payment_repo,
            registration_repo,
            stripe_gateway,
            stripe_webhook_secret,
            wompi_webhook_secret,
            pool,
        }
    }

    // Abre o fluxo de pagamento de uma matrícula. O registro nasce PENDING
    // antes de qualquer chamada externa; se a Stripe falhar, ele permanece
    // PENDING e o cliente pode tentar de novo.
    pub async fn checkout(&self, payload: &CheckoutPayload) -> Result<CheckoutResponse, AppError> {
        let (registration_id, method) = match (payload.registration_id, payload.method) {
            (Some(registration_id), Some(method)) => (registration_id, method),
            _ => return Err(AppError::CheckoutFieldsRequired),
        };

        let registration = self
            .registration_repo
            .find_by_id(registration_id)
            .await?
            .ok_or(AppError::RegistrationNotFound)?;

        let provider = PaymentProvider::for_method(method);

        let payment = self
            .payment_repo
            .create(registration_id, provider, method, registration.amount)
            .await?;

        let mut checkout_url = format!("https://checkout.example.com/{}", payment.id);

        if let (Some(gateway), PaymentProvider::Stripe) = (&self.stripe_gateway, provider) {
            let session = gateway.create_checkout_session(&registration).await?;
            if let Some(url) = session.url {
                checkout_url = url;
            }
            self.payment_repo
                .set_provider_ref(payment.id, &session.id)
                .await?;
        }

        let message = if self.stripe_gateway.is_some() {
            "Checkout creado"
        } else {
            "Pasarela simulada (configura llaves Stripe)"
        };

        Ok(CheckoutResponse {
            payment_id: payment.id,
            checkout_url,
            provider,
            message: message.to_string(),
        })
    }

    // Webhook da Stripe. A assinatura cobre "{timestamp}.{corpo bruto}";
    // só o checkout.session.completed liquida, e somente quando os metadados
    // trazem o id da matrícula.
    pub async fn handle_stripe_webhook(
        &self,
        signature: Option<&str>,
        body: &[u8],
    ) -> Result<(), AppError> {
        let secret = self
            .stripe_webhook_secret
            .as_deref()
            .ok_or(AppError::StripeNotConfigured)?;
        let signature = signature.ok_or(AppError::SignatureRequired)?;

        if !verify_stripe_signature(secret, signature, body, Utc::now().timestamp()) {
            return Err(AppError::InvalidSignature);
        }

        let event: StripeEvent =
            serde_json::from_slice(body).map_err(|_| AppError::InvalidWebhookPayload)?;

        if event.event_type == "checkout.session.completed" {
            let session = event.data.object;
            if let Some(reference) = session.metadata.and_then(|m| m.registration_id) {
                let registration_id =
                    Uuid::parse_str(&reference).map_err(|_| AppError::InvalidWebhookPayload)?;
                self.settle_registration(registration_id, Some(&session.id))
                    .await?;
            }
        }

        Ok(())
    }

    // Webhook da Wompi: HMAC hex do corpo bruto comparado com o checksum
    // do header. A referência da transação é o id da matrícula.
    pub async fn handle_wompi_webhook(
        &self,
        checksum: Option<&str>,
        body: &[u8],
    ) -> Result<(), AppError> {
        let secret = self
            .wompi_webhook_secret
            .as_deref()
            .ok_or(AppError::WompiNotConfigured)?;
        let provided = checksum.ok_or(AppError::SignatureRequired)?;

        if !verify_wompi_signature(secret, body, provided) {
            return Err(AppError::InvalidSignature);
        }

        let event: WompiEvent =
            serde_json::from_slice(body).map_err(|_| AppError::InvalidWebhookPayload)?;

        let transaction = event
            .data
            .and_then(|d| d.transaction)
            .ok_or(AppError::MissingReference)?;
        let reference = transaction.reference.ok_or(AppError::MissingReference)?;
        let registration_id =
            Uuid::parse_str(&reference).map_err(|_| AppError::InvalidWebhookPayload)?;

        self.settle_registration(registration_id, transaction.id.as_deref())
            .await
    }

    // Liquidação atômica: todos os pagamentos da matrícula viram PAID e a
    // matrícula vira PAID/APPROVED na mesma transação. Reprocessar o mesmo
    // evento reaplica o mesmo estado terminal.
    async fn settle_registration(
        &self,
        registration_id: Uuid,
        provider_ref: Option<&str>,
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        self.payment_repo
            .mark_paid_for_registration(&mut *tx, registration_id, provider_ref)
            .await?;

        let updated = self
            .registration_repo
            .mark_paid(&mut *tx, registration_id)
            .await?;
        if updated == 0 {
            // Matrícula desconhecida: rollback implícito no drop da transação
            return Err(AppError::RegistrationNotFound);
        }

        tx.commit().await?;
        tracing::info!("💰 Matrícula {} liquidada via webhook", registration_id);
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<PaymentWithRegistration>, AppError> {
        let payments = self.payment_repo.list().await?;
        let registrations = self.registrations_for(payments.iter().map(|p| p.registration_id)).await?;

        payments
            .into_iter()
            .map(|payment| {
                let registration = registrations
                    .get(&payment.registration_id)
                    .cloned()
                    .ok_or_else(|| {
                        anyhow::anyhow!("pagamento {} sem matrícula correspondente", payment.id)
                    })?;
                Ok(PaymentWithRegistration {
                    payment,
                    registration,
                })
            })
            .collect()
    }

    // Detalhe de um pagamento: admin vê tudo; os demais só quando a
    // matrícula é deles (vínculo por id ou por e-mail)
    pub async fn get(&self, id: Uuid, user: &User) -> Result<PaymentWithRegistration, AppError> {
        let payment = self
            .payment_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::PaymentNotFound)?;

        let registration = self
            .registration_repo
            .find_by_id(payment.registration_id)
            .await?
            .ok_or_else(|| {
                anyhow::anyhow!("pagamento {} sem matrícula correspondente", payment.id)
            })?;

        let owns_registration =
            registration.user_id == Some(user.id) || registration.email == user.email;
        if user.role != Role::Admin && !owns_registration {
            return Err(AppError::Forbidden);
        }

        Ok(PaymentWithRegistration {
            payment,
            registration,
        })
    }

    async fn registrations_for(
        &self,
        ids: impl Iterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, Registration>, AppError> {
        let mut unique: Vec<Uuid> = ids.collect();
        unique.sort_unstable();
        unique.dedup();

        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let regs = self.registration_repo.find_by_ids(&unique).await?;
        Ok(regs.into_iter().map(|r| (r.id, r)).collect())
    }
}
