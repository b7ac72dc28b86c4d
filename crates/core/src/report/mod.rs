pub mod types;

pub use types::{DetectorReport, ReportedProblem, SuiteReport};
