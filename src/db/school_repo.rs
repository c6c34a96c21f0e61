// src/db/school_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::school::{School, SchoolStatus},
};

#[derive(Clone)]
pub struct SchoolRepository {
    pool: PgPool,
}

impl SchoolRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Diretório público, ordenado por nome
    pub async fn list(&self) -> Result<Vec<School>, AppError> {
        let schools = sqlx::query_as::<_, School>("SELECT * FROM schools ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(schools)
    }

    // Busca em lote, para embutir o colégio nas visões de matrícula
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<School>, AppError> {
        let schools = sqlx::query_as::<_, School>("SELECT * FROM schools WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(schools)
    }

    pub async fn create(
        &self,
        name: &str,
        city: Option<&str>,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<School, AppError> {
        let school = sqlx::query_as::<_, School>(
            r#"
            INSERT INTO schools (name, city, address, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(city)
        .bind(address)
        .bind(phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(school)
    }

    // Atualização parcial: campos None mantêm o valor atual
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        city: Option<&str>,
        address: Option<&str>,
        phone: Option<&str>,
        status: Option<SchoolStatus>,
    ) -> Result<Option<School>, AppError> {
        let maybe_school = sqlx::query_as::<_, School>(
            r#"
            UPDATE schools
            SET name = COALESCE($2, name),
                city = COALESCE($3, city),
                address = COALESCE($4, address),
                phone = COALESCE($5, phone),
                status = COALESCE($6, status)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(city)
        .bind(address)
        .bind(phone)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_school)
    }
}
