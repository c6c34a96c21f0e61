// src/models/school.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "school_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SchoolStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct School {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440010")]
    pub id: Uuid,

    #[schema(example = "Colegio San José")]
    pub name: String,

    #[schema(example = "Bogotá")]
    pub city: Option<String>,

    #[schema(example = "Calle 123 #45-67")]
    pub address: Option<String>,

    #[schema(example = "3001234567")]
    pub phone: Option<String>,

    pub status: SchoolStatus,

    pub created_at: DateTime<Utc>,
}

// O `name` é opcional no wire para podermos responder "Nombre requerido"
// em vez de deixar o desserializador rejeitar o corpo.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSchoolPayload {
    #[schema(example = "Colegio San José")]
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSchoolPayload {
    pub name: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub status: Option<SchoolStatus>,
}
