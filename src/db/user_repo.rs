// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca em lote, usada na validação de estudantes e na montagem das visões
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    // Listagem administrativa, com filtro opcional por papel
    pub async fn list(&self, role: Option<Role>) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    // Cria um novo usuário no banco de dados
    // Com tratamento de erro específico para e-mails duplicados.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        school_id: Option<Uuid>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role, school_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(school_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    // Materialização de estudante na aprovação da matrícula.
    // ON CONFLICT DO NOTHING devolve None quando o e-mail já existe;
    // quem chama decide reaproveitar o usuário existente.
    pub async fn create_student_if_absent<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        password_hash: &str,
        school_id: Option<Uuid>,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role, school_id)
            VALUES ($1, $2, $3, 'STUDENT', $4)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(school_id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe_user)
    }

    // Variante do find_by_email que roda dentro da transação de aprovação
    pub async fn find_by_email_with<'e, E>(
        &self,
        executor: E,
        email: &str,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(executor)
            .await?;
        Ok(maybe_user)
    }

    // Atualização parcial: campos None mantêm o valor atual
    pub async fn update_user(
        &self,
        id: Uuid,
        name: Option<&str>,
        password_hash: Option<&str>,
        role: Option<Role>,
        school_id: Option<Uuid>,
    ) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash),
                role = COALESCE($4, role),
                school_id = COALESCE($5, school_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(password_hash)
        .bind(role)
        .bind(school_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Atualização do próprio perfil (nome, telefone, senha)
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(phone)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn delete_user<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
