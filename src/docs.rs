// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Schools ---
        handlers::schools::list_schools,
        handlers::schools::create_school,
        handlers::schools::update_school,

        // --- Registrations ---
        handlers::registrations::submit_registration,
        handlers::registrations::list_registrations,
        handlers::registrations::get_registration,
        handlers::registrations::update_registration_status,

        // --- Payments ---
        handlers::payments::checkout,
        handlers::payments::stripe_webhook,
        handlers::payments::wompi_webhook,
        handlers::payments::list_payments,
        handlers::payments::get_payment,

        // --- Admin ---
        handlers::dashboard::get_stats,
        handlers::dashboard::admin_list_registrations,
        handlers::dashboard::admin_get_registration,
        handlers::dashboard::admin_update_registration_status,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Assignments ---
        handlers::assignments::map_roster,
        handlers::assignments::list_rosters,
        handlers::assignments::my_rosters,
        handlers::assignments::create_graded,
        handlers::assignments::get_assignment,
        handlers::assignments::submit_assignment,
        handlers::assignments::grade_assignment,
        handlers::assignments::unassign_student,
        handlers::assignments::delete_assignment,

        // --- Profile ---
        handlers::profile::get_me,
        handlers::profile::update_me,
        handlers::profile::student_registration,
        handlers::profile::student_assignments,
        handlers::profile::teacher_assignments,

        // --- Contents ---
        handlers::contents::list_contents,
        handlers::contents::create_content,
        handlers::contents::publish_content,
        handlers::contents::request_content_approval,
        handlers::contents::approve_content,
        handlers::contents::reject_content,
        handlers::contents::delete_content,

        // --- Tasks ---
        handlers::tasks::list_tasks,
        handlers::tasks::create_task,
        handlers::tasks::publish_task,
        handlers::tasks::close_task,
        handlers::tasks::delete_task,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::UserWithSchool,
            models::auth::RegisterPayload,
            models::auth::LoginPayload,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::UpdateProfilePayload,
            models::auth::AuthResponse,

            // --- Schools ---
            models::school::SchoolStatus,
            models::school::School,
            models::school::CreateSchoolPayload,
            models::school::UpdateSchoolPayload,

            // --- Registrations ---
            models::registration::RegistrationStatus,
            models::registration::RegistrationPaymentStatus,
            models::registration::Registration,
            models::registration::RegistrationView,
            models::registration::RegistrationDetail,
            models::registration::RegistrationPayload,
            models::registration::StatusUpdatePayload,

            // --- Payments ---
            models::payment::PaymentMethod,
            models::payment::PaymentProvider,
            models::payment::PaymentStatus,
            models::payment::Payment,
            models::payment::PaymentWithRegistration,
            models::payment::CheckoutPayload,
            models::payment::CheckoutResponse,

            // --- Assignments ---
            models::assignment::AssignmentKind,
            models::assignment::AssignmentStudentStatus,
            models::assignment::AssignRosterPayload,
            models::assignment::CreateGradedAssignmentPayload,
            models::assignment::GradePayload,
            models::assignment::PersonRef,
            models::assignment::RosterView,
            models::assignment::TeacherRosterView,
            models::assignment::StudentLinkView,
            models::assignment::AssignmentDetail,
            models::assignment::SubmitResponse,
            models::assignment::GradeResponse,
            models::assignment::StudentAssignmentView,
            models::assignment::TeacherAssignmentView,
            models::assignment::StudentStatusRef,

            // --- Bulletin ---
            models::bulletin::ContentScope,
            models::bulletin::ContentStatus,
            models::bulletin::TaskStatus,
            models::bulletin::Content,
            models::bulletin::Task,
            models::bulletin::CreateContentPayload,
            models::bulletin::CreateTaskPayload,

            // --- Admin ---
            models::dashboard::AdminStats,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticación y registro de cuentas"),
        (name = "Schools", description = "Colegios de la red"),
        (name = "Registrations", description = "Solicitudes de matrícula"),
        (name = "Payments", description = "Checkout y webhooks de pago"),
        (name = "Admin", description = "Panel administrativo"),
        (name = "Users", description = "Gestión de cuentas"),
        (name = "Assignments", description = "Asignaciones docente-estudiante y actividades"),
        (name = "Profile", description = "Perfil del usuario autenticado"),
        (name = "Contents", description = "Contenidos del boletín"),
        (name = "Tasks", description = "Tareas del boletín")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
