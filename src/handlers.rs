// src/handlers.rs

pub mod assignments;
pub mod auth;
pub mod contents;
pub mod dashboard;
pub mod payments;
pub mod profile;
pub mod registrations;
pub mod schools;
pub mod tasks;
pub mod users;
