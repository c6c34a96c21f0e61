// src/db/bulletin_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::bulletin::{Content, ContentScope, ContentStatus, Task, TaskStatus},
};

// Mural acadêmico: conteúdos e tarefas dos docentes
#[derive(Clone)]
pub struct BulletinRepository {
    pool: PgPool,
}

impl BulletinRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CONTEÚDOS
    // =========================================================================

    pub async fn list_contents(
        &self,
        scope: Option<ContentScope>,
        status: Option<ContentStatus>,
        author_id: Option<Uuid>,
    ) -> Result<Vec<Content>, AppError> {
        let contents = sqlx::query_as::<_, Content>(
            r#"
            SELECT * FROM contents
            WHERE ($1::content_scope IS NULL OR scope = $1)
              AND ($2::content_status IS NULL OR status = $2)
              AND ($3::uuid IS NULL OR author_id = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(scope)
        .bind(status)
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(contents)
    }

    pub async fn create_content(
        &self,
        title: &str,
        description: Option<&str>,
        scope: ContentScope,
        status: ContentStatus,
        author_id: Uuid,
    ) -> Result<Content, AppError> {
        let content = sqlx::query_as::<_, Content>(
            r#"
            INSERT INTO contents (title, description, scope, status, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(scope)
        .bind(status)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(content)
    }

    pub async fn set_content_status(
        &self,
        id: Uuid,
        status: ContentStatus,
    ) -> Result<Option<Content>, AppError> {
        let maybe = sqlx::query_as::<_, Content>(
            r#"
            UPDATE contents
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    // Pedir aprovação promove o escopo para global
    pub async fn request_content_approval(&self, id: Uuid) -> Result<Option<Content>, AppError> {
        let maybe = sqlx::query_as::<_, Content>(
            r#"
            UPDATE contents
            SET status = 'pendingApproval', scope = 'global', updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn delete_content(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  TAREFAS
    // =========================================================================

    pub async fn list_tasks(
        &self,
        status: Option<TaskStatus>,
        author_id: Option<Uuid>,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT * FROM tasks
            WHERE ($1::task_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR author_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    pub async fn create_task(
        &self,
        title: &str,
        description: Option<&str>,
        due_date: Option<DateTime<Utc>>,
        status: TaskStatus,
        author_id: Uuid,
    ) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, due_date, status, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(due_date)
        .bind(status)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    pub async fn set_task_status(
        &self,
        id: Uuid,
        status: TaskStatus,
    ) -> Result<Option<Task>, AppError> {
        let maybe = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
