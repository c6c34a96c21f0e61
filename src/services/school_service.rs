// src/services/school_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SchoolRepository,
    models::school::{CreateSchoolPayload, School, UpdateSchoolPayload},
};

#[derive(Clone)]
pub struct SchoolService {
    school_repo: SchoolRepository,
}

impl SchoolService {
    pub fn new(school_repo: SchoolRepository) -> Self {
        Self { school_repo }
    }

    pub async fn list(&self) -> Result<Vec<School>, AppError> {
        self.school_repo.list().await
    }

    pub async fn create(&self, payload: &CreateSchoolPayload) -> Result<School, AppError> {
        let name = payload
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or(AppError::NameRequired)?;

        self.school_repo
            .create(
                name,
                payload.city.as_deref(),
                payload.address.as_deref(),
                payload.phone.as_deref(),
            )
            .await
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateSchoolPayload) -> Result<School, AppError> {
        self.school_repo
            .update(
                id,
                payload.name.as_deref(),
                payload.city.as_deref(),
                payload.address.as_deref(),
                payload.phone.as_deref(),
                payload.status,
            )
            .await?
            .ok_or(AppError::SchoolNotFound)
    }
}
