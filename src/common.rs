pub mod error;
pub mod signatures;
pub use error::AppError;
