// src/db/registration_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::registration::{Registration, RegistrationPayload, RegistrationStatus},
};

#[derive(Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Invariante de unicidade: no máximo uma solicitação PENDING/APPROVED por e-mail
    pub async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Registration>, AppError> {
        let maybe_reg = sqlx::query_as::<_, Registration>(
            r#"
            SELECT * FROM registrations
            WHERE email = $1 AND status IN ('PENDING', 'APPROVED')
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_reg)
    }

    pub async fn create(&self, payload: &RegistrationPayload) -> Result<Registration, AppError> {
        let reg = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (
                full_name, document, email, phone, birthdate, gender, address,
                school_id, grade, grade_name, guardian_name, guardian_phone,
                guardian_email, payment_method, amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(&payload.full_name)
        .bind(&payload.document)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(payload.birthdate)
        .bind(&payload.gender)
        .bind(&payload.address)
        .bind(payload.school_id)
        .bind(payload.grade)
        .bind(&payload.grade_name)
        .bind(&payload.guardian_name)
        .bind(&payload.guardian_phone)
        .bind(&payload.guardian_email)
        .bind(payload.payment_method)
        .bind(payload.amount)
        .fetch_one(&self.pool)
        .await?;
        Ok(reg)
    }

    pub async fn list(&self) -> Result<Vec<Registration>, AppError> {
        let regs =
            sqlx::query_as::<_, Registration>("SELECT * FROM registrations ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(regs)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>, AppError> {
        let maybe_reg = sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_reg)
    }

    // Busca em lote, para embutir a matrícula na listagem de pagamentos
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Registration>, AppError> {
        let regs = sqlx::query_as::<_, Registration>("SELECT * FROM registrations WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(regs)
    }

    // Matrícula mais recente do aluno autenticado (vínculo por id ou por e-mail)
    pub async fn find_latest_for_user(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<Option<Registration>, AppError> {
        let maybe_reg = sqlx::query_as::<_, Registration>(
            r#"
            SELECT * FROM registrations
            WHERE user_id = $1 OR email = $2
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_reg)
    }

    // Transição de estado com carimbos. approved_by/approved_at só são
    // sobrescritos quando o novo estado é APPROVED; rejected_at idem para
    // REJECTED. Voltar para PENDING não apaga carimbo nenhum.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: RegistrationStatus,
        user_id: Option<Uuid>,
        approved_by: Option<Uuid>,
    ) -> Result<Option<Registration>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_reg = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET status = $2,
                user_id = COALESCE($3, user_id),
                approved_by = CASE WHEN $2 = 'APPROVED'::registration_status THEN $4 ELSE approved_by END,
                approved_at = CASE WHEN $2 = 'APPROVED'::registration_status THEN now() ELSE approved_at END,
                rejected_at = CASE WHEN $2 = 'REJECTED'::registration_status THEN now() ELSE rejected_at END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(user_id)
        .bind(approved_by)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_reg)
    }

    // Liquidação via webhook: pagamento confirmado aprova a matrícula
    pub async fn mark_paid<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE registrations
            SET payment_status = 'PAID', status = 'APPROVED'
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    // Desvincula as matrículas de um usuário que está sendo removido
    pub async fn unlink_user<'e, E>(&self, executor: E, user_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE registrations SET user_id = NULL WHERE user_id = $1")
            .bind(user_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
