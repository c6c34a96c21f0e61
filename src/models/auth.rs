// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::school::School;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    // O filtro `?role=` aceita qualquer capitalização.
    pub fn from_param(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "TEACHER" => Some(Role::Teacher),
            "STUDENT" => Some(Role::Student),
            _ => None,
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    #[schema(example = "María García")]
    pub name: String,

    #[schema(example = "estudiante@plataforma.edu.co")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,

    #[schema(example = "3001112233")]
    pub phone: Option<String>,

    pub school_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

// Usuário com o colégio embutido (listagem e perfil)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserWithSchool {
    #[serde(flatten)]
    pub user: User,
    pub school: Option<School>,
}

// Dados para registro público de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(length(min = 3, message = "El nombre debe tener al menos 3 caracteres"))]
    #[schema(example = "María García")]
    pub name: String,

    #[validate(email(message = "El correo no es válido"))]
    #[schema(example = "estudiante@plataforma.edu.co")]
    pub email: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    #[schema(example = "estudiante123")]
    pub password: String,

    pub role: Option<Role>,
    pub school_id: Option<Uuid>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[validate(email(message = "El correo no es válido"))]
    #[schema(example = "admin@plataforma.edu.co")]
    pub email: String,

    #[validate(length(min = 4, message = "La contraseña debe tener al menos 4 caracteres"))]
    #[schema(example = "admin123")]
    pub password: String,
}

// Criação de usuário pelo painel administrativo
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 2, message = "El nombre debe tener al menos 2 caracteres"))]
    pub name: String,

    #[validate(email(message = "El correo no es válido"))]
    pub email: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: String,

    pub role: Role,
    pub school_id: Option<Uuid>,
}

// Atualização parcial (campos ausentes ficam como estão)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 2, message = "El nombre debe tener al menos 2 caracteres"))]
    pub name: Option<String>,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: Option<String>,

    pub role: Option<Role>,
    pub school_id: Option<Uuid>,
}

// Atualização do próprio perfil
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfilePayload {
    #[validate(length(min = 2, message = "El nombre debe tener al menos 2 caracteres"))]
    pub name: Option<String>,

    #[validate(length(min = 5, message = "El teléfono debe tener al menos 5 caracteres"))]
    pub phone: Option<String>,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres"))]
    pub password: Option<String>,
}

impl UpdateProfilePayload {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.password.is_none()
    }
}

// Resposta de autenticação com o token e o usuário
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,    // Subject (ID do usuário)
    pub role: Role,   // Papel no momento da emissão
    pub email: String,
    pub exp: usize,   // Expiration time (quando o token expira)
    pub iat: usize,   // Issued At (quando o token foi criado)
}
