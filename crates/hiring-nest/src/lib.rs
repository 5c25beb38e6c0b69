//! Job-board core: public job search and the application lifecycle.

pub mod applications;
pub mod config;
pub mod domain;
pub mod error;
pub mod identity;
pub mod jobs;
pub mod seed;
pub mod store;
pub mod telemetry;

pub use error::AppError;
