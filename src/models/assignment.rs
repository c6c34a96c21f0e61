// src/models/assignment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "assignment_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentKind {
    RosterMapping,
    Graded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "assignment_student_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStudentStatus {
    Pending,
    Submitted,
    Graded,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,

    #[schema(example = "Taller de fracciones")]
    pub title: String,

    pub description: Option<String>,
    pub kind: AssignmentKind,
    pub due_date: Option<DateTime<Utc>>,
    pub teacher_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStudent {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub status: AssignmentStudentStatus,
    pub submitted_at: Option<DateTime<Utc>>,

    #[schema(example = 85.0)]
    pub grade: Option<f64>,
}

// Linha do join vínculo + aluno, para montar as visões normalizadas
#[derive(Debug, Clone, FromRow)]
pub struct StudentLinkRow {
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub name: String,
    pub email: String,
    pub status: AssignmentStudentStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub grade: Option<f64>,
}

// Linha do join vínculo + atribuição + docente, para o perfil do aluno
#[derive(Debug, Clone, FromRow)]
pub struct StudentAssignmentRow {
    pub assignment_id: Uuid,
    pub title: String,
    pub due_date: Option<DateTime<Utc>>,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub teacher_email: String,
    pub status: AssignmentStudentStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub grade: Option<f64>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRosterPayload {
    pub teacher_id: Uuid,

    #[validate(length(min = 1, message = "Debe incluir al menos un estudiante"))]
    pub student_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGradedAssignmentPayload {
    #[validate(length(min = 1, message = "El título es requerido"))]
    #[schema(example = "Taller de fracciones")]
    pub title: String,

    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, message = "Debe incluir al menos un estudiante"))]
    pub student_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradePayload {
    pub student_id: Uuid,

    #[validate(range(min = 0.0, max = 100.0, message = "La nota debe estar entre 0 y 100"))]
    #[schema(example = 85.0)]
    pub grade: f64,
}

// --- Visões normalizadas (o formato que o front consome) ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

// Mapeamento admin: só o vínculo docente -> alunos
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterView {
    pub id: Uuid,
    pub teacher: Option<PersonRef>,
    pub students: Vec<PersonRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Visão do docente: inclui título e descrição
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherRosterView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub teacher: Option<PersonRef>,
    pub students: Vec<PersonRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentLinkView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: AssignmentStudentStatus,
    pub submitted_at: Option<DateTime<Utc>>,
    pub grade: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetail {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub teacher: Option<PersonRef>,
    pub students: Vec<StudentLinkView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub status: AssignmentStudentStatus,
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeResponse {
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub status: AssignmentStudentStatus,
    pub grade: Option<f64>,
}

// Visão do aluno no próprio perfil
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssignmentView {
    pub id: Uuid,
    pub title: String,
    pub teacher: Option<PersonRef>,
    pub status: AssignmentStudentStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub grade: Option<f64>,
}

// Visão do docente no próprio perfil
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherAssignmentView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub students: Vec<StudentStatusRef>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatusRef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: AssignmentStudentStatus,
}
