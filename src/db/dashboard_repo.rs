// src/db/dashboard_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::dashboard::AdminStats};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Contadores do painel administrativo, agregados no banco
    pub async fn collect_stats(&self) -> Result<AdminStats, AppError> {
        let stats = sqlx::query_as::<_, AdminStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM registrations WHERE status = 'PENDING') AS pending,
                (SELECT COUNT(*) FROM registrations WHERE status = 'APPROVED') AS approved,
                (SELECT COUNT(*) FROM users WHERE role = 'TEACHER') AS teachers,
                (SELECT COUNT(*) FROM schools WHERE status = 'active') AS active_schools
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
