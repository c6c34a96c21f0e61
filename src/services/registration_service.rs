// src/services/registration_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PaymentRepository, RegistrationRepository, SchoolRepository, UserRepository},
    models::{
        auth::User,
        payment::Payment,
        registration::{
            Registration, RegistrationDetail, RegistrationPayload, RegistrationStatus,
            RegistrationView, StatusUpdatePayload,
        },
        school::School,
    },
    services::auth::hash_password,
};

// Senha provisória do estudante materializado na aprovação
const DEFAULT_STUDENT_PASSWORD: &str = "estudiante123";

#[derive(Clone)]
pub struct RegistrationService {
    registration_repo: RegistrationRepository,
    school_repo: SchoolRepository,
    payment_repo: PaymentRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl RegistrationService {
    pub fn new(
        registration_repo: RegistrationRepository,
        school_repo: SchoolRepository,
        payment_repo: PaymentRepository,
        user_repo: UserRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            registration_repo,
            school_repo,
            payment_repo,
            user_repo,
            pool,
        }
    }

    // Solicitação pública de matrícula. No máximo uma ativa por e-mail:
    // a segunda leva 409 com o id e o estado da existente.
    pub async fn submit(&self, payload: &RegistrationPayload) -> Result<Registration, AppError> {
        if let Some(existing) = self
            .registration_repo
            .find_active_by_email(&payload.email)
            .await?
        {
            return Err(AppError::ActiveRegistrationExists {
                registration_id: existing.id,
                status: existing.status,
            });
        }

        self.registration_repo.create(payload).await
    }

    pub async fn list(&self) -> Result<Vec<RegistrationView>, AppError> {
        let regs = self.registration_repo.list().await?;
        self.attach_relations(regs).await
    }

    pub async fn get(&self, id: Uuid) -> Result<RegistrationDetail, AppError> {
        let reg = self
            .registration_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::RegistrationNotFound)?;

        let user = match reg.user_id {
            Some(user_id) => self.user_repo.find_by_id(user_id).await?,
            None => None,
        };

        let view = self.attach_relations(vec![reg]).await?.remove(0);
        Ok(RegistrationDetail {
            registration: view.registration,
            school: view.school,
            payments: view.payments,
            user,
        })
    }

    // Matrícula mais recente do aluno autenticado, por vínculo ou e-mail
    pub async fn profile_registration(&self, user: &User) -> Result<RegistrationView, AppError> {
        let reg = self
            .registration_repo
            .find_latest_for_user(user.id, &user.email)
            .await?
            .ok_or(AppError::RegistrationNotFound)?;

        Ok(self.attach_relations(vec![reg]).await?.remove(0))
    }

    // Transição de estado disparada pelo admin, compartilhada pelos dois
    // grupos de rotas. Aprovar materializa o estudante de forma idempotente,
    // na mesma transação do carimbo: usuário já vinculado é reaproveitado,
    // e-mail já cadastrado é vinculado, caso contrário nasce um STUDENT com
    // a senha provisória.
    pub async fn transition_status(
        &self,
        id: Uuid,
        payload: &StatusUpdatePayload,
        acting_admin: Uuid,
    ) -> Result<RegistrationView, AppError> {
        let status = payload.status.ok_or(AppError::StatusRequired)?;

        let reg = self
            .registration_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::RegistrationNotFound)?;

        let needs_user = status == RegistrationStatus::Approved && reg.user_id.is_none();

        // O hash roda antes da transação para não segurar a conexão
        let default_hash = if needs_user {
            Some(hash_password(DEFAULT_STUDENT_PASSWORD).await?)
        } else {
            None
        };

        let mut tx = self.pool.begin().await?;

        let mut linked_user_id = None;
        if let Some(password_hash) = &default_hash {
            let user = match self
                .user_repo
                .create_student_if_absent(
                    &mut *tx,
                    &reg.full_name,
                    &reg.email,
                    password_hash,
                    reg.school_id,
                )
                .await?
            {
                Some(created) => created,
                // O e-mail já existia: vincula o usuário existente
                None => self
                    .user_repo
                    .find_by_email_with(&mut *tx, &reg.email)
                    .await?
                    .ok_or_else(|| {
                        anyhow::anyhow!("usuário de {} sumiu durante a materialização", reg.email)
                    })?,
            };
            linked_user_id = Some(user.id);
        }

        let updated = self
            .registration_repo
            .update_status(&mut *tx, id, status, linked_user_id, Some(acting_admin))
            .await?
            .ok_or(AppError::RegistrationNotFound)?;

        tx.commit().await?;

        Ok(self.attach_relations(vec![updated]).await?.remove(0))
    }

    // Monta as visões com colégio e pagamentos embutidos em duas buscas
    // em lote, em vez de uma consulta por linha
    async fn attach_relations(
        &self,
        regs: Vec<Registration>,
    ) -> Result<Vec<RegistrationView>, AppError> {
        let reg_ids: Vec<Uuid> = regs.iter().map(|r| r.id).collect();
        let mut school_ids: Vec<Uuid> = regs.iter().filter_map(|r| r.school_id).collect();
        school_ids.sort_unstable();
        school_ids.dedup();

        let schools: HashMap<Uuid, School> = if school_ids.is_empty() {
            HashMap::new()
        } else {
            self.school_repo
                .find_by_ids(&school_ids)
                .await?
                .into_iter()
                .map(|s| (s.id, s))
                .collect()
        };

        let payments = if reg_ids.is_empty() {
            Vec::new()
        } else {
            self.payment_repo
                .find_by_registration_ids(&reg_ids)
                .await?
        };
        let mut payments_by_reg = group_by_registration(payments);

        Ok(regs
            .into_iter()
            .map(|reg| {
                let school = reg.school_id.and_then(|id| schools.get(&id).cloned());
                let payments = payments_by_reg.remove(&reg.id).unwrap_or_default();
                RegistrationView {
                    registration: reg,
                    school,
                    payments,
                }
            })
            .collect())
    }
}

fn group_by_registration(payments: Vec<Payment>) -> HashMap<Uuid, Vec<Payment>> {
    let mut grouped: HashMap<Uuid, Vec<Payment>> = HashMap::new();
    for payment in payments {
        grouped.entry(payment.registration_id).or_default().push(payment);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payment::{PaymentMethod, PaymentProvider, PaymentStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn payment_for(registration_id: Uuid) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            registration_id,
            provider: PaymentProvider::Stripe,
            method: PaymentMethod::Card,
            amount: Decimal::new(150_000, 0),
            status: PaymentStatus::Pending,
            provider_ref: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn grouping_splits_payments_by_registration() {
        let reg_a = Uuid::new_v4();
        let reg_b = Uuid::new_v4();
        let payments = vec![payment_for(reg_a), payment_for(reg_b), payment_for(reg_a)];

        let grouped = group_by_registration(payments);

        assert_eq!(grouped.get(&reg_a).map(Vec::len), Some(2));
        assert_eq!(grouped.get(&reg_b).map(Vec::len), Some(1));
    }

    #[test]
    fn grouping_empty_input_yields_empty_map() {
        assert!(group_by_registration(Vec::new()).is_empty());
    }
}
