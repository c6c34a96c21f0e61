// src/services.rs

pub mod assignment_service;
pub mod auth;
pub mod bulletin_service;
pub mod dashboard_service;
pub mod payment_service;
pub mod registration_service;
pub mod school_service;
pub mod stripe;
pub mod user_service;

pub use assignment_service::AssignmentService;
pub use auth::AuthService;
pub use bulletin_service::BulletinService;
pub use dashboard_service::DashboardService;
pub use payment_service::PaymentService;
pub use registration_service::RegistrationService;
pub use school_service::SchoolService;
pub use user_service::UserService;
