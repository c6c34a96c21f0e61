// src/services/assignment_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AssignmentRepository, UserRepository},
    models::{
        assignment::{
            AssignRosterPayload, Assignment, AssignmentDetail, AssignmentKind,
            AssignmentStudentStatus, CreateGradedAssignmentPayload, GradePayload, GradeResponse,
            PersonRef, RosterView, StudentAssignmentView, StudentLinkRow, StudentLinkView,
            StudentStatusRef, SubmitResponse, TeacherAssignmentView, TeacherRosterView,
        },
        auth::{Role, User},
    },
};

// Título fixo do mapeamento de turma criado pelo admin
const ROSTER_TITLE: &str = "Asignación de estudiantes";

#[derive(Clone)]
pub struct AssignmentService {
    assignment_repo: AssignmentRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl AssignmentService {
    pub fn new(
        assignment_repo: AssignmentRepository,
        user_repo: UserRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            assignment_repo,
            user_repo,
            pool,
        }
    }

    // Mapeamento docente -> alunos, substituído por inteiro a cada chamada:
    // as atribuições anteriores do docente caem na mesma transação que cria
    // a nova. Repetir a chamada produz o mesmo estado final.
    pub async fn map_roster(&self, payload: &AssignRosterPayload) -> Result<RosterView, AppError> {
        let teacher = self
            .user_repo
            .find_by_id(payload.teacher_id)
            .await?
            .ok_or(AppError::TeacherNotFound)?;

        let students = self.require_students(&payload.student_ids).await?;

        let mut tx = self.pool.begin().await?;
        self.assignment_repo
            .delete_roster_for_teacher(&mut *tx, teacher.id)
            .await?;
        let assignment = self
            .assignment_repo
            .create(
                &mut *tx,
                ROSTER_TITLE,
                None,
                AssignmentKind::RosterMapping,
                None,
                teacher.id,
            )
            .await?;
        self.assignment_repo
            .link_students(&mut *tx, assignment.id, &payload.student_ids)
            .await?;
        tx.commit().await?;

        Ok(RosterView {
            id: assignment.id,
            teacher: Some(person_ref(&teacher)),
            students: students.iter().map(person_ref).collect(),
            created_at: assignment.created_at,
            updated_at: assignment.updated_at,
        })
    }

    pub async fn list_rosters(&self) -> Result<Vec<RosterView>, AppError> {
        let assignments = self
            .assignment_repo
            .list_by_kind(AssignmentKind::RosterMapping)
            .await?;
        let (teachers, mut links) = self.relations_for(&assignments).await?;

        Ok(assignments
            .into_iter()
            .map(|a| RosterView {
                id: a.id,
                teacher: teachers.get(&a.teacher_id).cloned(),
                students: links
                    .remove(&a.id)
                    .unwrap_or_default()
                    .iter()
                    .map(student_ref)
                    .collect(),
                created_at: a.created_at,
                updated_at: a.updated_at,
            })
            .collect())
    }

    // Mapeamentos do próprio docente, com título e descrição
    pub async fn my_rosters(&self, teacher: &User) -> Result<Vec<TeacherRosterView>, AppError> {
        let assignments = self
            .assignment_repo
            .list_by_teacher_and_kind(teacher.id, AssignmentKind::RosterMapping)
            .await?;
        let (teachers, mut links) = self.relations_for(&assignments).await?;

        Ok(assignments
            .into_iter()
            .map(|a| TeacherRosterView {
                id: a.id,
                title: a.title,
                description: a.description,
                teacher: teachers.get(&a.teacher_id).cloned(),
                students: links
                    .remove(&a.id)
                    .unwrap_or_default()
                    .iter()
                    .map(student_ref)
                    .collect(),
                created_at: a.created_at,
                updated_at: a.updated_at,
            })
            .collect())
    }

    // Atividade avaliável criada pelo próprio docente; os vínculos nascem
    // pendentes
    pub async fn create_graded(
        &self,
        teacher: &User,
        payload: &CreateGradedAssignmentPayload,
    ) -> Result<AssignmentDetail, AppError> {
        let students = self.require_students(&payload.student_ids).await?;

        let mut tx = self.pool.begin().await?;
        let assignment = self
            .assignment_repo
            .create(
                &mut *tx,
                &payload.title,
                payload.description.as_deref(),
                AssignmentKind::Graded,
                payload.due_date,
                teacher.id,
            )
            .await?;
        self.assignment_repo
            .link_students(&mut *tx, assignment.id, &payload.student_ids)
            .await?;
        tx.commit().await?;

        Ok(AssignmentDetail {
            id: assignment.id,
            title: assignment.title,
            description: assignment.description,
            due_date: assignment.due_date,
            teacher: Some(person_ref(teacher)),
            students: students
                .iter()
                .map(|s| StudentLinkView {
                    id: s.id,
                    name: s.name.clone(),
                    email: s.email.clone(),
                    status: AssignmentStudentStatus::Pending,
                    submitted_at: None,
                    grade: None,
                })
                .collect(),
            created_at: assignment.created_at,
            updated_at: assignment.updated_at,
        })
    }

    // Detalhe com visibilidade restrita: admin, o docente dono, ou um aluno
    // vinculado
    pub async fn get_detail(&self, id: Uuid, user: &User) -> Result<AssignmentDetail, AppError> {
        let assignment = self
            .assignment_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::AssignmentNotFound)?;

        let links = self.assignment_repo.links_with_students(&[id]).await?;

        let is_admin = user.role == Role::Admin;
        let is_teacher_owner = user.role == Role::Teacher && assignment.teacher_id == user.id;
        let is_student_assigned =
            user.role == Role::Student && links.iter().any(|l| l.student_id == user.id);

        if !is_admin && !is_teacher_owner && !is_student_assigned {
            return Err(AppError::Forbidden);
        }

        let teacher = self.user_repo.find_by_id(assignment.teacher_id).await?;

        Ok(AssignmentDetail {
            id: assignment.id,
            title: assignment.title,
            description: assignment.description,
            due_date: assignment.due_date,
            teacher: teacher.as_ref().map(person_ref),
            students: links
                .into_iter()
                .map(|l| StudentLinkView {
                    id: l.student_id,
                    name: l.name,
                    email: l.email,
                    status: l.status,
                    submitted_at: l.submitted_at,
                    grade: l.grade,
                })
                .collect(),
            created_at: assignment.created_at,
            updated_at: assignment.updated_at,
        })
    }

    pub async fn submit(&self, assignment_id: Uuid, student: &User) -> Result<SubmitResponse, AppError> {
        self.assignment_repo
            .find_by_id(assignment_id)
            .await?
            .ok_or(AppError::AssignmentNotFound)?;

        let link = self
            .assignment_repo
            .submit_link(assignment_id, student.id)
            .await?
            .ok_or(AppError::NotAssignedToTask)?;

        Ok(SubmitResponse {
            assignment_id,
            student_id: link.student_id,
            status: link.status,
            submitted_at: link.submitted_at,
        })
    }

    // Nota de 0 a 100. Docente só califica a própria atribuição; admin
    // califica qualquer uma.
    pub async fn grade(
        &self,
        assignment_id: Uuid,
        actor: &User,
        payload: &GradePayload,
    ) -> Result<GradeResponse, AppError> {
        let assignment = self
            .assignment_repo
            .find_by_id(assignment_id)
            .await?
            .ok_or(AppError::AssignmentNotFound)?;

        if actor.role == Role::Teacher && assignment.teacher_id != actor.id {
            return Err(AppError::NotAssignmentOwner);
        }

        let link = self
            .assignment_repo
            .grade_link(assignment_id, payload.student_id, payload.grade)
            .await?
            .ok_or(AppError::StudentNotLinked)?;

        Ok(GradeResponse {
            assignment_id,
            student_id: link.student_id,
            status: link.status,
            grade: link.grade,
        })
    }

    // Desvincula um aluno; quando o último sai, a atribuição é removida
    pub async fn unassign(&self, assignment_id: Uuid, student_id: Uuid) -> Result<(), AppError> {
        let removed = self
            .assignment_repo
            .delete_link(assignment_id, student_id)
            .await?;
        if removed == 0 {
            return Err(AppError::StudentLinkNotFound);
        }

        if self.assignment_repo.count_links(assignment_id).await? == 0 {
            self.assignment_repo.delete(assignment_id).await?;
        }

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let removed = self.assignment_repo.delete(id).await?;
        if removed == 0 {
            return Err(AppError::AssignmentNotFound);
        }
        Ok(())
    }

    // Atividades do aluno no próprio perfil
    pub async fn student_profile(
        &self,
        student: &User,
    ) -> Result<Vec<StudentAssignmentView>, AppError> {
        let rows = self.assignment_repo.links_for_student(student.id).await?;

        Ok(rows
            .into_iter()
            .map(|row| StudentAssignmentView {
                id: row.assignment_id,
                title: row.title,
                teacher: Some(PersonRef {
                    id: row.teacher_id,
                    name: row.teacher_name,
                    email: row.teacher_email,
                }),
                status: row.status,
                due_date: row.due_date,
                submitted_at: row.submitted_at,
                grade: row.grade,
            })
            .collect())
    }

    // Atividades do docente no próprio perfil, de qualquer tipo
    pub async fn teacher_profile(
        &self,
        teacher: &User,
    ) -> Result<Vec<TeacherAssignmentView>, AppError> {
        let assignments = self.assignment_repo.list_by_teacher(teacher.id).await?;
        let assignment_ids: Vec<Uuid> = assignments.iter().map(|a| a.id).collect();

        let links = if assignment_ids.is_empty() {
            Vec::new()
        } else {
            self.assignment_repo
                .links_with_students(&assignment_ids)
                .await?
        };
        let mut grouped = group_links(links);

        Ok(assignments
            .into_iter()
            .map(|a| TeacherAssignmentView {
                id: a.id,
                title: a.title,
                description: a.description,
                due_date: a.due_date,
                students: grouped
                    .remove(&a.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|l| StudentStatusRef {
                        id: l.student_id,
                        name: l.name,
                        email: l.email,
                        status: l.status,
                    })
                    .collect(),
            })
            .collect())
    }

    // Todos os ids precisam existir; duplicatas na entrada também contam
    // como divergência
    async fn require_students(&self, student_ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        let students = self.user_repo.find_by_ids(student_ids).await?;
        if students.len() != student_ids.len() {
            return Err(AppError::StudentsNotFound);
        }
        Ok(students)
    }

    // Docentes e vínculos das atribuições, em duas buscas em lote
    async fn relations_for(
        &self,
        assignments: &[Assignment],
    ) -> Result<(HashMap<Uuid, PersonRef>, HashMap<Uuid, Vec<StudentLinkRow>>), AppError> {
        let mut teacher_ids: Vec<Uuid> = assignments.iter().map(|a| a.teacher_id).collect();
        teacher_ids.sort_unstable();
        teacher_ids.dedup();

        let teachers: HashMap<Uuid, PersonRef> = if teacher_ids.is_empty() {
            HashMap::new()
        } else {
            self.user_repo
                .find_by_ids(&teacher_ids)
                .await?
                .iter()
                .map(|u| (u.id, person_ref(u)))
                .collect()
        };

        let assignment_ids: Vec<Uuid> = assignments.iter().map(|a| a.id).collect();
        let links = if assignment_ids.is_empty() {
            Vec::new()
        } else {
            self.assignment_repo
                .links_with_students(&assignment_ids)
                .await?
        };

        Ok((teachers, group_links(links)))
    }
}

fn person_ref(user: &User) -> PersonRef {
    PersonRef {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
    }
}

fn student_ref(row: &StudentLinkRow) -> PersonRef {
    PersonRef {
        id: row.student_id,
        name: row.name.clone(),
        email: row.email.clone(),
    }
}

fn group_links(links: Vec<StudentLinkRow>) -> HashMap<Uuid, Vec<StudentLinkRow>> {
    let mut grouped: HashMap<Uuid, Vec<StudentLinkRow>> = HashMap::new();
    for link in links {
        grouped.entry(link.assignment_id).or_default().push(link);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link_row(assignment_id: Uuid, name: &str) -> StudentLinkRow {
        StudentLinkRow {
            assignment_id,
            student_id: Uuid::new_v4(),
            name: name.into(),
            email: format!("{name}@example.com"),
            status: AssignmentStudentStatus::Pending,
            submitted_at: None,
            grade: None,
        }
    }

    #[test]
    fn links_are_grouped_by_assignment() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let links = vec![link_row(a, "ana"), link_row(b, "bruno"), link_row(a, "carla")];

        let grouped = group_links(links);

        assert_eq!(grouped.get(&a).map(Vec::len), Some(2));
        assert_eq!(grouped.get(&b).map(Vec::len), Some(1));
        assert!(grouped.get(&Uuid::new_v4()).is_none());
    }
}
