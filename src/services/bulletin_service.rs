// src/services/bulletin_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::BulletinRepository,
    models::{
        auth::User,
        bulletin::{
            Content, ContentListQuery, ContentScope, ContentStatus, CreateContentPayload,
            CreateTaskPayload, Task, TaskListQuery, TaskStatus,
        },
    },
};

// Conteúdos e tarefas do boletim. O fluxo de aprovação é linear: o docente
// rascunha, pede aprovação (vira global) e o admin aprova ou rejeita.
#[derive(Clone)]
pub struct BulletinService {
    bulletin_repo: BulletinRepository,
}

impl BulletinService {
    pub fn new(bulletin_repo: BulletinRepository) -> Self {
        Self { bulletin_repo }
    }

    // ------------------------------------------------------------------
    //  CONTEÚDOS
    // ------------------------------------------------------------------

    pub async fn list_contents(&self, query: &ContentListQuery) -> Result<Vec<Content>, AppError> {
        self.bulletin_repo
            .list_contents(query.scope, query.status, query.author_id)
            .await
    }

    pub async fn create_content(
        &self,
        author: &User,
        payload: &CreateContentPayload,
    ) -> Result<Content, AppError> {
        self.bulletin_repo
            .create_content(
                &payload.title,
                payload.description.as_deref(),
                payload.scope.unwrap_or(ContentScope::Course),
                payload.status.unwrap_or(ContentStatus::Draft),
                author.id,
            )
            .await
    }

    pub async fn publish_content(&self, id: Uuid) -> Result<Content, AppError> {
        self.bulletin_repo
            .set_content_status(id, ContentStatus::Published)
            .await?
            .ok_or(AppError::ItemNotFound)
    }

    // Pedir aprovação também promove o escopo para global
    pub async fn request_content_approval(&self, id: Uuid) -> Result<Content, AppError> {
        self.bulletin_repo
            .request_content_approval(id)
            .await?
            .ok_or(AppError::ItemNotFound)
    }

    pub async fn approve_content(&self, id: Uuid) -> Result<Content, AppError> {
        self.bulletin_repo
            .set_content_status(id, ContentStatus::Approved)
            .await?
            .ok_or(AppError::ItemNotFound)
    }

    pub async fn reject_content(&self, id: Uuid) -> Result<Content, AppError> {
        self.bulletin_repo
            .set_content_status(id, ContentStatus::Rejected)
            .await?
            .ok_or(AppError::ItemNotFound)
    }

    // Remoção idempotente: apagar algo que já não existe segue sendo 204
    pub async fn delete_content(&self, id: Uuid) -> Result<(), AppError> {
        self.bulletin_repo.delete_content(id).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    //  TAREFAS
    // ------------------------------------------------------------------

    pub async fn list_tasks(&self, query: &TaskListQuery) -> Result<Vec<Task>, AppError> {
        self.bulletin_repo
            .list_tasks(query.status, query.author_id)
            .await
    }

    pub async fn create_task(
        &self,
        author: &User,
        payload: &CreateTaskPayload,
    ) -> Result<Task, AppError> {
        self.bulletin_repo
            .create_task(
                &payload.title,
                payload.description.as_deref(),
                payload.due_date,
                payload.status.unwrap_or(TaskStatus::Draft),
                author.id,
            )
            .await
    }

    pub async fn publish_task(&self, id: Uuid) -> Result<Task, AppError> {
        self.bulletin_repo
            .set_task_status(id, TaskStatus::Published)
            .await?
            .ok_or(AppError::ItemNotFound)
    }

    pub async fn close_task(&self, id: Uuid) -> Result<Task, AppError> {
        self.bulletin_repo
            .set_task_status(id, TaskStatus::Closed)
            .await?
            .ok_or(AppError::ItemNotFound)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), AppError> {
        self.bulletin_repo.delete_task(id).await?;
        Ok(())
    }
}
