pub mod assignment;
pub mod auth;
pub mod bulletin;
pub mod dashboard;
pub mod payment;
pub mod registration;
pub mod school;
