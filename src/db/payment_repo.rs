// src/db/payment_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payment::{Payment, PaymentMethod, PaymentProvider},
};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // O registro nasce PENDING antes de qualquer chamada à pasarela
    pub async fn create(
        &self,
        registration_id: Uuid,
        provider: PaymentProvider,
        method: PaymentMethod,
        amount: Decimal,
    ) -> Result<Payment, AppError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (registration_id, provider, method, amount)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(registration_id)
        .bind(provider)
        .bind(method)
        .bind(amount)
        .fetch_one(&self.pool)
        .await?;
        Ok(payment)
    }

    // Guarda o id da sessão de checkout devolvido pela Stripe
    pub async fn set_provider_ref(&self, id: Uuid, provider_ref: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE payments SET provider_ref = $2 WHERE id = $1")
            .bind(id)
            .bind(provider_ref)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Payment>, AppError> {
        let payments =
            sqlx::query_as::<_, Payment>("SELECT * FROM payments ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(payments)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>, AppError> {
        let maybe_payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_payment)
    }

    // Busca em lote, para embutir os pagamentos nas visões de matrícula
    pub async fn find_by_registration_ids(
        &self,
        registration_ids: &[Uuid],
    ) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE registration_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(registration_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    // Liquidação via webhook: todos os pagamentos da matrícula viram PAID,
    // com o id do evento do provedor como última referência aplicada
    pub async fn mark_paid_for_registration<'e, E>(
        &self,
        executor: E,
        registration_id: Uuid,
        provider_ref: Option<&str>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = 'PAID', provider_ref = COALESCE($2, provider_ref)
            WHERE registration_id = $1
            "#,
        )
        .bind(registration_id)
        .bind(provider_ref)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
