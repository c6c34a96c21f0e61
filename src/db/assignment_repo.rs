// src/db/assignment_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::assignment::{
        Assignment, AssignmentKind, AssignmentStudent, StudentAssignmentRow, StudentLinkRow,
    },
};

#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ATRIBUIÇÕES
    // =========================================================================

    pub async fn create<'e, E>(
        &self,
        executor: E,
        title: &str,
        description: Option<&str>,
        kind: AssignmentKind,
        due_date: Option<DateTime<Utc>>,
        teacher_id: Uuid,
    ) -> Result<Assignment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (title, description, kind, due_date, teacher_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(kind)
        .bind(due_date)
        .bind(teacher_id)
        .fetch_one(executor)
        .await?;
        Ok(assignment)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Assignment>, AppError> {
        let maybe = sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe)
    }

    pub async fn list_by_kind(&self, kind: AssignmentKind) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE kind = $1 ORDER BY created_at DESC",
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(assignments)
    }

    pub async fn list_by_teacher_and_kind(
        &self,
        teacher_id: Uuid,
        kind: AssignmentKind,
    ) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT * FROM assignments
            WHERE teacher_id = $1 AND kind = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(teacher_id)
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(assignments)
    }

    // Todas as atribuições do docente, qualquer tipo (perfil do docente)
    pub async fn list_by_teacher(&self, teacher_id: Uuid) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE teacher_id = $1 ORDER BY created_at DESC",
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(assignments)
    }

    // O mapeamento de turma é substituído, nunca mesclado: remove as
    // atribuições anteriores do docente (os vínculos caem em cascata)
    pub async fn delete_roster_for_teacher<'e, E>(
        &self,
        executor: E,
        teacher_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result =
            sqlx::query("DELETE FROM assignments WHERE teacher_id = $1 AND kind = 'ROSTER_MAPPING'")
                .bind(teacher_id)
                .execute(executor)
                .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // Remoção de usuário: apaga as atribuições que ele possui como docente
    pub async fn delete_by_teacher<'e, E>(
        &self,
        executor: E,
        teacher_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM assignments WHERE teacher_id = $1")
            .bind(teacher_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  VÍNCULOS ALUNO x ATRIBUIÇÃO
    // =========================================================================

    pub async fn link_students<'e, E>(
        &self,
        executor: E,
        assignment_id: Uuid,
        student_ids: &[Uuid],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO assignment_students (assignment_id, student_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT (assignment_id, student_id) DO NOTHING
            "#,
        )
        .bind(assignment_id)
        .bind(student_ids)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_link(
        &self,
        assignment_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<AssignmentStudent>, AppError> {
        let maybe = sqlx::query_as::<_, AssignmentStudent>(
            "SELECT * FROM assignment_students WHERE assignment_id = $1 AND student_id = $2",
        )
        .bind(assignment_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn submit_link(
        &self,
        assignment_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<AssignmentStudent>, AppError> {
        let maybe = sqlx::query_as::<_, AssignmentStudent>(
            r#"
            UPDATE assignment_students
            SET status = 'submitted', submitted_at = now()
            WHERE assignment_id = $1 AND student_id = $2
            RETURNING *
            "#,
        )
        .bind(assignment_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn grade_link(
        &self,
        assignment_id: Uuid,
        student_id: Uuid,
        grade: f64,
    ) -> Result<Option<AssignmentStudent>, AppError> {
        let maybe = sqlx::query_as::<_, AssignmentStudent>(
            r#"
            UPDATE assignment_students
            SET grade = $3, status = 'graded'
            WHERE assignment_id = $1 AND student_id = $2
            RETURNING *
            "#,
        )
        .bind(assignment_id)
        .bind(student_id)
        .bind(grade)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn delete_link(
        &self,
        assignment_id: Uuid,
        student_id: Uuid,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM assignment_students WHERE assignment_id = $1 AND student_id = $2",
        )
        .bind(assignment_id)
        .bind(student_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn count_links(&self, assignment_id: Uuid) -> Result<i64, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM assignment_students WHERE assignment_id = $1")
                .bind(assignment_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    // Remoção de usuário: apaga os vínculos que ele possui como aluno
    pub async fn delete_links_by_student<'e, E>(
        &self,
        executor: E,
        student_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM assignment_students WHERE student_id = $1")
            .bind(student_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  JOINS PARA AS VISÕES NORMALIZADAS
    // =========================================================================

    // Vínculos + dados do aluno, para um conjunto de atribuições
    pub async fn links_with_students(
        &self,
        assignment_ids: &[Uuid],
    ) -> Result<Vec<StudentLinkRow>, AppError> {
        let rows = sqlx::query_as::<_, StudentLinkRow>(
            r#"
            SELECT s.assignment_id, s.student_id, u.name, u.email,
                   s.status, s.submitted_at, s.grade
            FROM assignment_students s
            JOIN users u ON u.id = s.student_id
            WHERE s.assignment_id = ANY($1)
            ORDER BY u.name ASC
            "#,
        )
        .bind(assignment_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Vínculos do aluno com a atribuição e o docente, para o perfil
    pub async fn links_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<StudentAssignmentRow>, AppError> {
        let rows = sqlx::query_as::<_, StudentAssignmentRow>(
            r#"
            SELECT s.assignment_id, a.title, a.due_date, a.teacher_id,
                   t.name AS teacher_name, t.email AS teacher_email,
                   s.status, s.submitted_at, s.grade
            FROM assignment_students s
            JOIN assignments a ON a.id = s.assignment_id
            JOIN users t ON t.id = a.teacher_id
            WHERE s.student_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
