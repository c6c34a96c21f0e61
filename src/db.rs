pub mod user_repo;
pub use user_repo::UserRepository;
pub mod school_repo;
pub use school_repo::SchoolRepository;
pub mod registration_repo;
pub use registration_repo::RegistrationRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod assignment_repo;
pub use assignment_repo::AssignmentRepository;
pub mod bulletin_repo;
pub use bulletin_repo::BulletinRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
