// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, models::auth::Role};

/// 1. O Trait que define o que é uma Capacidade
pub trait CapabilityDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

// Tabelas estáticas por papel. Os papéis são um enum fechado, então o
// conjunto é resolvido uma única vez no auth_guard, sem ida ao banco.
const ADMIN_CAPS: &[&str] = &[
    "users:manage",
    "schools:manage",
    "registrations:review",
    "payments:review",
    "payments:read",
    "assignments:map",
    "assignments:read",
    "assignments:grade",
    "contents:read",
    "contents:moderate",
    "contents:delete",
    "tasks:read",
    "tasks:close",
    "tasks:delete",
    "dashboard:view",
];

const TEACHER_CAPS: &[&str] = &[
    "payments:read",
    "assignments:own",
    "assignments:read",
    "assignments:grade",
    "contents:read",
    "contents:author",
    "contents:delete",
    "tasks:read",
    "tasks:author",
    "tasks:close",
    "tasks:delete",
    "profile:teacher",
];

const STUDENT_CAPS: &[&str] = &[
    "payments:read",
    "assignments:read",
    "assignments:submit",
    "profile:student",
];

/// Conjunto de capacidades do usuário logado, inserido nos extensions
/// pelo auth_guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySet {
    slugs: &'static [&'static str],
}

impl CapabilitySet {
    pub fn for_role(role: Role) -> Self {
        let slugs = match role {
            Role::Admin => ADMIN_CAPS,
            Role::Teacher => TEACHER_CAPS,
            Role::Student => STUDENT_CAPS,
        };
        Self { slugs }
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.slugs.contains(&slug)
    }
}

/// 2. O Extractor (Guardião)
pub struct RequireCapability<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequireCapability<T>
where
    T: CapabilityDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let caps = parts
            .extensions
            .get::<CapabilitySet>()
            .ok_or(AppError::Unauthorized)?;

        if !caps.contains(T::slug()) {
            return Err(AppError::Forbidden);
        }

        Ok(RequireCapability(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS CAPACIDADES (TIPOS)
// ---

pub struct CapUsersManage;
impl CapabilityDef for CapUsersManage {
    fn slug() -> &'static str { "users:manage" }
}

pub struct CapSchoolsManage;
impl CapabilityDef for CapSchoolsManage {
    fn slug() -> &'static str { "schools:manage" }
}

pub struct CapRegistrationsReview;
impl CapabilityDef for CapRegistrationsReview {
    fn slug() -> &'static str { "registrations:review" }
}

pub struct CapPaymentsReview;
impl CapabilityDef for CapPaymentsReview {
    fn slug() -> &'static str { "payments:review" }
}

pub struct CapPaymentsRead;
impl CapabilityDef for CapPaymentsRead {
    fn slug() -> &'static str { "payments:read" }
}

pub struct CapAssignmentsMap;
impl CapabilityDef for CapAssignmentsMap {
    fn slug() -> &'static str { "assignments:map" }
}

pub struct CapAssignmentsOwn;
impl CapabilityDef for CapAssignmentsOwn {
    fn slug() -> &'static str { "assignments:own" }
}

pub struct CapAssignmentsRead;
impl CapabilityDef for CapAssignmentsRead {
    fn slug() -> &'static str { "assignments:read" }
}

pub struct CapAssignmentsGrade;
impl CapabilityDef for CapAssignmentsGrade {
    fn slug() -> &'static str { "assignments:grade" }
}

pub struct CapAssignmentsSubmit;
impl CapabilityDef for CapAssignmentsSubmit {
    fn slug() -> &'static str { "assignments:submit" }
}

pub struct CapContentsRead;
impl CapabilityDef for CapContentsRead {
    fn slug() -> &'static str { "contents:read" }
}

pub struct CapContentsAuthor;
impl CapabilityDef for CapContentsAuthor {
    fn slug() -> &'static str { "contents:author" }
}

pub struct CapContentsModerate;
impl CapabilityDef for CapContentsModerate {
    fn slug() -> &'static str { "contents:moderate" }
}

pub struct CapContentsDelete;
impl CapabilityDef for CapContentsDelete {
    fn slug() -> &'static str { "contents:delete" }
}

pub struct CapTasksRead;
impl CapabilityDef for CapTasksRead {
    fn slug() -> &'static str { "tasks:read" }
}

pub struct CapTasksAuthor;
impl CapabilityDef for CapTasksAuthor {
    fn slug() -> &'static str { "tasks:author" }
}

pub struct CapTasksClose;
impl CapabilityDef for CapTasksClose {
    fn slug() -> &'static str { "tasks:close" }
}

pub struct CapTasksDelete;
impl CapabilityDef for CapTasksDelete {
    fn slug() -> &'static str { "tasks:delete" }
}

pub struct CapDashboardView;
impl CapabilityDef for CapDashboardView {
    fn slug() -> &'static str { "dashboard:view" }
}

pub struct CapProfileTeacher;
impl CapabilityDef for CapProfileTeacher {
    fn slug() -> &'static str { "profile:teacher" }
}

pub struct CapProfileStudent;
impl CapabilityDef for CapProfileStudent {
    fn slug() -> &'static str { "profile:student" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_manages_users_and_schools() {
        let caps = CapabilitySet::for_role(Role::Admin);
        assert!(caps.contains(CapUsersManage::slug()));
        assert!(caps.contains(CapSchoolsManage::slug()));
        assert!(caps.contains(CapDashboardView::slug()));
        assert!(!caps.contains(CapAssignmentsOwn::slug()));
        assert!(!caps.contains(CapAssignmentsSubmit::slug()));
    }

    #[test]
    fn teacher_authors_but_does_not_moderate() {
        let caps = CapabilitySet::for_role(Role::Teacher);
        assert!(caps.contains(CapContentsAuthor::slug()));
        assert!(caps.contains(CapTasksAuthor::slug()));
        assert!(caps.contains(CapAssignmentsGrade::slug()));
        assert!(!caps.contains(CapContentsModerate::slug()));
        assert!(!caps.contains(CapUsersManage::slug()));
        assert!(!caps.contains(CapAssignmentsMap::slug()));
    }

    #[test]
    fn student_only_submits_and_reads() {
        let caps = CapabilitySet::for_role(Role::Student);
        assert!(caps.contains(CapAssignmentsSubmit::slug()));
        assert!(caps.contains(CapAssignmentsRead::slug()));
        assert!(caps.contains(CapPaymentsRead::slug()));
        assert!(caps.contains(CapProfileStudent::slug()));
        assert!(!caps.contains(CapContentsRead::slug()));
        assert!(!caps.contains(CapTasksRead::slug()));
        assert!(!caps.contains(CapAssignmentsGrade::slug()));
    }

    #[test]
    fn everyone_reads_own_payments() {
        for role in [Role::Admin, Role::Teacher, Role::Student] {
            assert!(CapabilitySet::for_role(role).contains(CapPaymentsRead::slug()));
        }
    }

    #[test]
    fn close_task_is_teacher_and_admin_only() {
        assert!(CapabilitySet::for_role(Role::Teacher).contains(CapTasksClose::slug()));
        assert!(CapabilitySet::for_role(Role::Admin).contains(CapTasksClose::slug()));
        assert!(!CapabilitySet::for_role(Role::Student).contains(CapTasksClose::slug()));
    }
}
