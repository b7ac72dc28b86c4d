pub mod config;
pub mod detector;
pub mod error;
pub mod model;
pub mod problem;
pub mod report;
pub mod schema;

pub use error::{DoctorError, DoctorResult};
