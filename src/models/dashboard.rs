// src/models/dashboard.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Os cards do painel administrativo
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[schema(example = 4)]
    pub pending: i64, // Matrículas aguardando revisão

    #[schema(example = 12)]
    pub approved: i64,

    #[schema(example = 3)]
    pub teachers: i64,

    #[schema(example = 2)]
    pub active_schools: i64,
}
