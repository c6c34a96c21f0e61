// src/services/user_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AssignmentRepository, RegistrationRepository, SchoolRepository, UserRepository},
    models::{
        auth::{CreateUserPayload, Role, UpdateProfilePayload, UpdateUserPayload, User, UserWithSchool},
        school::School,
    },
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    school_repo: SchoolRepository,
    registration_repo: RegistrationRepository,
    assignment_repo: AssignmentRepository,
    pool: PgPool,
}

impl UserService {
    pub fn new(
        user_repo: UserRepository,
        school_repo: SchoolRepository,
        registration_repo: RegistrationRepository,
        assignment_repo: AssignmentRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            school_repo,
            registration_repo,
            assignment_repo,
            pool,
        }
    }

    // Listagem administrativa com o colégio embutido.
    // O filtro `?role=` aceita qualquer capitalização; valor desconhecido é 400.
    pub async fn list(&self, role_param: Option<&str>) -> Result<Vec<UserWithSchool>, AppError> {
        let role = match role_param {
            Some(value) => Some(Role::from_param(value).ok_or(AppError::InvalidPayload)?),
            None => None,
        };

        let users = self.user_repo.list(role).await?;
        let schools = self.schools_for(&users).await?;

        Ok(users
            .into_iter()
            .map(|user| {
                let school = user.school_id.and_then(|id| schools.get(&id).cloned());
                UserWithSchool { user, school }
            })
            .collect())
    }

    pub async fn create(&self, payload: &CreateUserPayload) -> Result<User, AppError> {
        if self.user_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let hashed_password = hash_password(&payload.password).await?;

        self.user_repo
            .create_user(
                &self.pool,
                &payload.name,
                &payload.email,
                &hashed_password,
                payload.role,
                payload.school_id,
            )
            .await
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateUserPayload) -> Result<User, AppError> {
        let password_hash = match &payload.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        self.user_repo
            .update_user(
                id,
                payload.name.as_deref(),
                password_hash.as_deref(),
                payload.role,
                payload.school_id,
            )
            .await?
            .ok_or(AppError::UserNotFound)
    }

    // Remoção com cascata explícita, tudo na mesma transação:
    // vínculos como aluno, atribuições como docente, desvincula matrículas,
    // e só então a linha do usuário.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        self.assignment_repo
            .delete_links_by_student(&mut *tx, id)
            .await?;
        self.assignment_repo.delete_by_teacher(&mut *tx, id).await?;
        self.registration_repo.unlink_user(&mut *tx, id).await?;

        let deleted = self.user_repo.delete_user(&mut *tx, id).await?;
        if deleted == 0 {
            return Err(AppError::UserNotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    // Perfil do usuário autenticado, com o colégio embutido
    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserWithSchool, AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let school = match user.school_id {
            Some(school_id) => self
                .school_repo
                .find_by_ids(&[school_id])
                .await?
                .into_iter()
                .next(),
            None => None,
        };

        Ok(UserWithSchool { user, school })
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: &UpdateProfilePayload,
    ) -> Result<User, AppError> {
        if payload.is_empty() {
            return Err(AppError::EmptyUpdate);
        }

        let password_hash = match &payload.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        self.user_repo
            .update_profile(
                user_id,
                payload.name.as_deref(),
                payload.phone.as_deref(),
                password_hash.as_deref(),
            )
            .await?
            .ok_or(AppError::UserNotFound)
    }

    async fn schools_for(&self, users: &[User]) -> Result<HashMap<Uuid, School>, AppError> {
        let mut ids: Vec<Uuid> = users.iter().filter_map(|u| u.school_id).collect();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let schools = self.school_repo.find_by_ids(&ids).await?;
        Ok(schools.into_iter().map(|s| (s.id, s)).collect())
    }
}
