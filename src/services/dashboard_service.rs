// src/services/dashboard_service.rs

use crate::{common::error::AppError, db::DashboardRepository, models::dashboard::AdminStats};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    pub async fn stats(&self) -> Result<AdminStats, AppError> {
        self.repo.collect_stats().await
    }
}
