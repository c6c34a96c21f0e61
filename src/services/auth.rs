// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, LoginPayload, RegisterPayload, Role, User},
};

// O hashing do bcrypt é caro; roda fora do executor do tokio
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let hash_clone = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password_clone, &hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

// Emissão e validação do JWT como funções livres, para facilitar o teste
// sem montar o serviço inteiro
pub fn sign_token(secret: &str, user: &User, expires_in_days: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::days(expires_in_days);

    let claims = Claims {
        sub: user.id,
        role: user.role,
        email: user.email.clone(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let validation = Validation::default();
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map_err(|_| AppError::InvalidToken)?;
    Ok(token_data.claims)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_expires_in_days: i64,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        jwt_secret: String,
        token_expires_in_days: i64,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            jwt_secret,
            token_expires_in_days,
            pool,
        }
    }

    pub async fn register_user(&self, payload: &RegisterPayload) -> Result<(String, User), AppError> {
        // Checagem amigável antes do INSERT; a constraint única cobre a corrida
        if self.user_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        let hashed_password = hash_password(&payload.password).await?;
        let role = payload.role.unwrap_or(Role::Student);

        let new_user = self
            .user_repo
            .create_user(
                &self.pool,
                &payload.name,
                &payload.email,
                &hashed_password,
                role,
                payload.school_id,
            )
            .await?;

        let token = sign_token(&self.jwt_secret, &new_user, self.token_expires_in_days)?;
        Ok((token, new_user))
    }

    pub async fn login_user(&self, payload: &LoginPayload) -> Result<(String, User), AppError> {
        let user = self
            .user_repo
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&payload.password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let token = sign_token(&self.jwt_secret, &user, self.token_expires_in_days)?;
        Ok((token, user))
    }

    // Token de usuário removido também é inválido: o guard não distingue os casos
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(&self.jwt_secret, token)?;

        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Laura Gómez".into(),
            email: "laura@example.com".into(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".into(),
            role: Role::Teacher,
            phone: None,
            school_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn token_roundtrip_preserves_identity() {
        let user = sample_user();
        let token = sign_token("segredo-de-teste", &user, 7).unwrap();
        let claims = decode_token("segredo-de-teste", &token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, Role::Teacher);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_rejected_with_wrong_secret() {
        let user = sample_user();
        let token = sign_token("segredo-de-teste", &user, 7).unwrap();
        let result = decode_token("outro-segredo", &token);
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let user = sample_user();
        // Expiração negativa coloca exp no passado
        let token = sign_token("segredo-de-teste", &user, -1).unwrap();
        let result = decode_token("segredo-de-teste", &token);
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let result = decode_token("segredo-de-teste", "nao-e-um-jwt");
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }
}
