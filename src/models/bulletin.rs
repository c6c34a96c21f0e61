// src/models/bulletin.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "content_scope", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentScope {
    Course,
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "content_status", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum ContentStatus {
    Draft,
    Published,
    PendingApproval,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Draft,
    Published,
    Closed,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: Uuid,

    #[schema(example = "Guía de lectura: Siglo de Oro")]
    pub title: String,

    pub description: Option<String>,
    pub scope: ContentScope,
    pub status: ContentStatus,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,

    #[schema(example = "Ensayo sobre la Independencia")]
    pub title: String,

    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentPayload {
    #[validate(length(min = 1, message = "El título es requerido"))]
    pub title: String,

    pub description: Option<String>,
    pub scope: Option<ContentScope>,
    pub status: Option<ContentStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    #[validate(length(min = 1, message = "El título es requerido"))]
    pub title: String,

    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

// --- Filtros de listagem ---

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ContentListQuery {
    pub scope: Option<ContentScope>,
    pub status: Option<ContentStatus>,
    pub author_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    pub author_id: Option<Uuid>,
}
