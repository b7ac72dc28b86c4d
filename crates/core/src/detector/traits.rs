use super::context::AnalysisContext;
use super::settings::Setting;
use crate::error::DoctorResult;
use crate::problem::{Problem, Problems};

/// Core trait for all schema detectors.
/// Implementors inspect the schema through the context and emit problems.
pub trait Detector: Send + Sync {
    /// Unique identifier, the snake_case form of the type name
    /// (e.g. "table_without_primary_key")
    fn name(&self) -> &str;

    /// Human-readable description of what this detector checks
    fn description(&self) -> &str;

    /// Settings this detector recognizes. Every one needs a default.
    fn settings(&self) -> Vec<Setting> {
        Vec::new()
    }

    /// Analyze the schema, calling `problems.emit` for each finding.
    /// Finding nothing is not an error.
    fn detect(&self, ctx: &AnalysisContext<'_>, problems: &mut Problems) -> DoctorResult<()>;

    /// Render one problem as a single line of text.
    fn message(&self, problem: &Problem) -> String;
}
